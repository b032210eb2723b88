//! yt-dlp download adapter
//!
//! Runs `yt-dlp` as a child process and locates the merged output file.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::domain::errors::*;
use crate::ports::*;
use crate::utils::path::find_downloaded_file;
use crate::utils::stderr_tail;

/// Longest stderr tail kept in an error message
const MAX_STDERR_TAIL: usize = 500;

/// yt-dlp-backed download adapter
pub struct YtDlpDownloadAdapter {
    program: PathBuf,
}

impl YtDlpDownloadAdapter {
    /// Create new adapter running the given yt-dlp executable
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Arguments for one download, best video+audio merged into mp4
    fn build_args(source_url: &str, destination_dir: &Path) -> Vec<String> {
        let template = destination_dir.join("%(id)s.%(ext)s");
        vec![
            "-f".to_string(),
            "bestvideo+bestaudio/best".to_string(),
            "--merge-output-format".to_string(),
            "mp4".to_string(),
            "--no-playlist".to_string(),
            "--no-progress".to_string(),
            "-o".to_string(),
            template.to_string_lossy().to_string(),
            source_url.to_string(),
        ]
    }
}

#[async_trait]
impl DownloadPort for YtDlpDownloadAdapter {
    async fn download(
        &self,
        source_url: &str,
        source_id: &str,
        destination_dir: &Path,
    ) -> Result<Option<PathBuf>, DomainError> {
        let args = Self::build_args(source_url, destination_dir);
        info!(url = source_url, "Downloading");
        debug!(program = %self.program.display(), ?args, "Running yt-dlp");

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| DomainError::ToolFail(format!("Failed to start yt-dlp: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DomainError::ToolFail(format!(
                "yt-dlp exited with {}: {}",
                output.status,
                stderr_tail(&stderr, MAX_STDERR_TAIL)
            )));
        }

        Ok(find_downloaded_file(destination_dir, source_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_args_uses_id_template() {
        let args = YtDlpDownloadAdapter::build_args(
            "https://www.youtube.com/watch?v=abc",
            Path::new("work/abc"),
        );

        let template_index = args.iter().position(|a| a == "-o").unwrap() + 1;
        assert!(args[template_index].ends_with("%(id)s.%(ext)s"));
        assert!(args.contains(&"--no-playlist".to_string()));
        assert_eq!(args.last().unwrap(), "https://www.youtube.com/watch?v=abc");
    }
}
