// Ports - Interface definitions (contracts)

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Port for video discovery and metadata lookup
#[async_trait]
pub trait SearchPort: Send + Sync {
    /// Search openly-licensed videos matching `term`
    async fn search(&self, term: &str, max_results: u32) -> Result<Vec<SearchHit>, DomainError>;

    /// Fetch licence and duration for one video; `None` when the provider
    /// no longer knows it
    async fn fetch_details(&self, source_id: &str) -> Result<Option<VideoDetails>, DomainError>;
}

/// Port for fetching the full source video
#[async_trait]
pub trait DownloadPort: Send + Sync {
    /// Download `source_url` into `destination_dir`.
    ///
    /// Returns the path of the finished file, or `None` when the tool ran but
    /// no complete file for `source_id` can be found.
    async fn download(
        &self,
        source_url: &str,
        source_id: &str,
        destination_dir: &Path,
    ) -> Result<Option<PathBuf>, DomainError>;
}

/// Port for cutting and re-encoding a clip
#[async_trait]
pub trait TranscodePort: Send + Sync {
    /// Write `length_seconds` of `source` starting at `start_seconds` to
    /// `destination`, in a format the publish target accepts
    async fn trim(
        &self,
        source: &Path,
        destination: &Path,
        start_seconds: u64,
        length_seconds: u64,
    ) -> Result<(), DomainError>;
}

/// Port for the social video endpoint
#[async_trait]
pub trait PublishPort: Send + Sync {
    /// Upload a finished clip. Destination and credentials belong to the
    /// adapter.
    async fn upload(&self, request: &UploadRequest) -> Result<PublishReceipt, DomainError>;
}

/// Clip ready to be published
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    pub file_path: PathBuf,
    pub title: String,
    pub description: String,
}

/// Acknowledgement from the publish target.
///
/// Any accepted upload yields a receipt; `post_id` is `None` when the target
/// accepted the clip without naming the new post.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishReceipt {
    pub post_id: Option<String>,
}
