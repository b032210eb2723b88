//! Configuration initialization and hierarchy management
//!
//! Precedence: CLI flags and their environment variables > settings file >
//! built-in defaults.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::adapters::exec_ffmpeg::EncodeSettings;
use crate::adapters::facebook_publish::{DEFAULT_GRAPH_URL, DEFAULT_GRAPH_VERSION};
use crate::adapters::toml_config::FileConfig;
use crate::adapters::youtube_search::DEFAULT_BASE_URL;
use crate::cli::args::{HistoryArgs, RunArgs};
use crate::domain::model::{RunConfig, OPEN_LICENSE_TAG};
use crate::error::{ReposterError, ReposterResult};

/// Search terms used when none are configured
pub const DEFAULT_KEYWORDS: &[&str] = &["nature", "drone", "timelapse", "B-roll", "stock footage"];
pub const DEFAULT_MIN_CLIP_SECONDS: u64 = 30;
pub const DEFAULT_MAX_CLIP_SECONDS: u64 = 40;
pub const DEFAULT_RESULTS_PER_TERM: u32 = 25;
pub const DEFAULT_WORK_DIR: &str = "work";
pub const DEFAULT_STATE_FILE: &str = "posted.json";

/// Credentials for the search provider and publish target
#[derive(Clone)]
pub struct Credentials {
    pub youtube_api_key: String,
    pub facebook_page_id: String,
    pub facebook_page_token: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("youtube_api_key", &"<redacted>")
            .field("facebook_page_id", &self.facebook_page_id)
            .field("facebook_page_token", &"<redacted>")
            .finish()
    }
}

/// Fully resolved settings for the `run` command
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub run: RunConfig,
    pub credentials: Credentials,
    pub youtube_api_url: String,
    pub graph_url: String,
    pub graph_version: String,
    pub work_dir: PathBuf,
    pub state_file: PathBuf,
    pub ytdlp_program: PathBuf,
    pub ffmpeg_program: PathBuf,
    pub encode: EncodeSettings,
    pub seed: Option<u64>,
}

impl AppConfig {
    /// Merge flags, environment and file settings.
    ///
    /// Missing credentials are reported together before anything else is
    /// validated.
    pub fn resolve(args: RunArgs, file: FileConfig) -> ReposterResult<Self> {
        let youtube_api_key = non_empty(args.yt_api_key).or(non_empty(file.search.api_key));
        let facebook_page_id = non_empty(args.fb_page_id).or(non_empty(file.facebook.page_id));
        let facebook_page_token =
            non_empty(args.fb_page_token).or(non_empty(file.facebook.page_token));

        let mut missing = Vec::new();
        if youtube_api_key.is_none() {
            missing.push("YT_API_KEY".to_string());
        }
        if facebook_page_id.is_none() {
            missing.push("FB_PAGE_ID".to_string());
        }
        if facebook_page_token.is_none() {
            missing.push("FB_PAGE_ACCESS_TOKEN".to_string());
        }
        let (Some(youtube_api_key), Some(facebook_page_id), Some(facebook_page_token)) =
            (youtube_api_key, facebook_page_id, facebook_page_token)
        else {
            return Err(ReposterError::MissingConfiguration { names: missing });
        };

        let keywords = args
            .keywords
            .or(file.search.keywords)
            .unwrap_or_else(|| DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect());

        let run = RunConfig::new(
            keywords,
            args.min_clip_sec
                .or(file.clip.min_seconds)
                .unwrap_or(DEFAULT_MIN_CLIP_SECONDS),
            args.max_clip_sec
                .or(file.clip.max_seconds)
                .unwrap_or(DEFAULT_MAX_CLIP_SECONDS),
            args.license
                .or(file.search.license)
                .unwrap_or_else(|| OPEN_LICENSE_TAG.to_string()),
            args.results_per_term
                .or(file.search.results_per_term)
                .unwrap_or(DEFAULT_RESULTS_PER_TERM),
        )
        .map_err(|e| ReposterError::InvalidConfiguration {
            message: e.to_string(),
        })?;

        let mut encode = EncodeSettings::default();
        if let Some(crf) = file.clip.crf {
            if crf > 51 {
                return Err(ReposterError::InvalidConfiguration {
                    message: "CRF value cannot exceed 51".to_string(),
                });
            }
            encode.crf = crf;
        }
        if let Some(preset) = non_empty(file.clip.preset) {
            encode.preset = preset;
        }

        let config = Self {
            run,
            credentials: Credentials {
                youtube_api_key,
                facebook_page_id,
                facebook_page_token,
            },
            youtube_api_url: non_empty(args.yt_api_url)
                .or(non_empty(file.search.api_url))
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            graph_url: non_empty(args.graph_url)
                .or(non_empty(file.facebook.graph_url))
                .unwrap_or_else(|| DEFAULT_GRAPH_URL.to_string()),
            graph_version: non_empty(args.graph_version)
                .or(non_empty(file.facebook.graph_version))
                .unwrap_or_else(|| DEFAULT_GRAPH_VERSION.to_string()),
            work_dir: args
                .work_dir
                .or(file.storage.work_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_WORK_DIR)),
            state_file: args
                .state_file
                .or(file.storage.state_file)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE)),
            ytdlp_program: args
                .ytdlp
                .or(file.tools.ytdlp)
                .unwrap_or_else(|| PathBuf::from("yt-dlp")),
            ffmpeg_program: args
                .ffmpeg
                .or(file.tools.ffmpeg)
                .unwrap_or_else(|| PathBuf::from("ffmpeg")),
            encode,
            seed: args.seed,
        };

        debug!(?config, "Configuration resolved");
        Ok(config)
    }

    /// Resolve the external tools to absolute paths
    pub fn locate_tools(&mut self) -> ReposterResult<()> {
        self.ytdlp_program = locate(&self.ytdlp_program)?;
        self.ffmpeg_program = locate(&self.ffmpeg_program)?;
        info!(
            ytdlp = %self.ytdlp_program.display(),
            ffmpeg = %self.ffmpeg_program.display(),
            "External tools found"
        );
        Ok(())
    }
}

/// Dedup record location for the `history` command
pub fn resolve_state_file(args: &HistoryArgs, file: &FileConfig) -> PathBuf {
    args.state_file
        .clone()
        .or_else(|| file.storage.state_file.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE))
}

fn locate(program: &Path) -> ReposterResult<PathBuf> {
    which::which(program).map_err(|_| ReposterError::MissingTool {
        tool: program.display().to_string(),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
