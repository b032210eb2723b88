//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Arguments for the run command
#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// YouTube Data API key
    #[arg(long, env = "YT_API_KEY", hide_env_values = true)]
    pub yt_api_key: Option<String>,

    /// Facebook page to publish to
    #[arg(long, env = "FB_PAGE_ID")]
    pub fb_page_id: Option<String>,

    /// Page access token for the Facebook page
    #[arg(long, env = "FB_PAGE_ACCESS_TOKEN", hide_env_values = true)]
    pub fb_page_token: Option<String>,

    /// Comma-separated search terms
    #[arg(long, env = "KEYWORDS", value_delimiter = ',')]
    pub keywords: Option<Vec<String>>,

    /// Shortest clip length in seconds
    #[arg(long, env = "MIN_CLIP_SEC")]
    pub min_clip_sec: Option<u64>,

    /// Longest clip length in seconds
    #[arg(long, env = "MAX_CLIP_SEC")]
    pub max_clip_sec: Option<u64>,

    /// Licence tag a candidate must carry
    #[arg(long, env = "LICENSE_FILTER")]
    pub license: Option<String>,

    /// Search results requested per term (1-50)
    #[arg(long, env = "RESULTS_PER_TERM")]
    pub results_per_term: Option<u32>,

    /// Directory for downloads and clips
    #[arg(long, env = "WORKDIR")]
    pub work_dir: Option<PathBuf>,

    /// Record of already-published source ids
    #[arg(long, env = "POSTED_FILE")]
    pub state_file: Option<PathBuf>,

    /// YouTube Data API root
    #[arg(long, env = "YT_API_URL")]
    pub yt_api_url: Option<String>,

    /// Graph API root
    #[arg(long, env = "FB_GRAPH_URL")]
    pub graph_url: Option<String>,

    /// Graph API version
    #[arg(long, env = "FB_GRAPH_VERSION")]
    pub graph_version: Option<String>,

    /// yt-dlp executable
    #[arg(long, env = "YTDLP_PATH")]
    pub ytdlp: Option<PathBuf>,

    /// ffmpeg executable
    #[arg(long, env = "FFMPEG_PATH")]
    pub ffmpeg: Option<PathBuf>,

    /// Seed for candidate order and clip window, for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Arguments for the history command
#[derive(Args, Debug, Default, Clone)]
pub struct HistoryArgs {
    /// Record of already-published source ids
    #[arg(long, env = "POSTED_FILE")]
    pub state_file: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
