//! FFmpeg execution adapter
//!
//! Cuts the clip window out of the downloaded source and re-encodes it to
//! H.264/AAC mp4, the format the publish target accepts.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::domain::errors::*;
use crate::ports::*;
use crate::utils::stderr_tail;

/// Longest stderr tail kept in an error message
const MAX_STDERR_TAIL: usize = 500;

/// Encoder settings for the published clip
#[derive(Debug, Clone)]
pub struct EncodeSettings {
    pub video_codec: String,
    pub preset: String,
    pub crf: u8,
    pub audio_codec: String,
    pub audio_bitrate: String,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            preset: "veryfast".to_string(),
            crf: 23,
            audio_codec: "aac".to_string(),
            audio_bitrate: "128k".to_string(),
        }
    }
}

/// FFmpeg-based trim adapter
pub struct FfmpegTrimAdapter {
    program: PathBuf,
    settings: EncodeSettings,
}

impl FfmpegTrimAdapter {
    /// Create new FFmpeg adapter
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            settings: EncodeSettings::default(),
        }
    }

    /// Override the encoder settings
    pub fn with_settings(mut self, settings: EncodeSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Seek before the input so only the window is decoded
    fn build_args(
        &self,
        source: &Path,
        destination: &Path,
        start_seconds: u64,
        length_seconds: u64,
    ) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-v".to_string(),
            "error".to_string(),
            "-ss".to_string(),
            start_seconds.to_string(),
            "-i".to_string(),
            source.to_string_lossy().to_string(),
            "-t".to_string(),
            length_seconds.to_string(),
            "-c:v".to_string(),
            self.settings.video_codec.clone(),
            "-preset".to_string(),
            self.settings.preset.clone(),
            "-crf".to_string(),
            self.settings.crf.to_string(),
            "-c:a".to_string(),
            self.settings.audio_codec.clone(),
            "-b:a".to_string(),
            self.settings.audio_bitrate.clone(),
            "-movflags".to_string(),
            "+faststart".to_string(),
            destination.to_string_lossy().to_string(),
        ]
    }
}

#[async_trait]
impl TranscodePort for FfmpegTrimAdapter {
    async fn trim(
        &self,
        source: &Path,
        destination: &Path,
        start_seconds: u64,
        length_seconds: u64,
    ) -> Result<(), DomainError> {
        let args = self.build_args(source, destination, start_seconds, length_seconds);
        info!(
            start = start_seconds,
            length = length_seconds,
            output = %destination.display(),
            "Trimming"
        );
        debug!(program = %self.program.display(), ?args, "Running ffmpeg");

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| DomainError::ToolFail(format!("Failed to start ffmpeg: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DomainError::ToolFail(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                stderr_tail(&stderr, MAX_STDERR_TAIL)
            )));
        }

        Ok(())
    }
}
