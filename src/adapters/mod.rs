// Adapters - External system implementations

pub mod exec_ffmpeg;
pub mod facebook_publish;
pub mod toml_config;
pub mod youtube_search;
pub mod ytdlp_download;

// Re-export adapters
pub use exec_ffmpeg::{EncodeSettings, FfmpegTrimAdapter};
pub use facebook_publish::FacebookPublishAdapter;
pub use toml_config::FileConfig;
pub use youtube_search::YoutubeSearchAdapter;
pub use ytdlp_download::YtDlpDownloadAdapter;
