// Domain errors - Error types for the domain layer

use std::fmt;

/// Domain-specific error types
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Invalid arguments provided
    BadArgs(String),
    /// Search provider or publish target rejected the request
    RemoteFail(String),
    /// Remote response could not be understood
    InvalidResponse(String),
    /// External tool exited unsuccessfully or could not be started
    ToolFail(String),
    /// File system operation failed
    FsFail(String),
    /// Internal error
    InternalError(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::BadArgs(msg) => write!(f, "Bad arguments: {}", msg),
            DomainError::RemoteFail(msg) => write!(f, "Remote call failed: {}", msg),
            DomainError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
            DomainError::ToolFail(msg) => write!(f, "External tool failed: {}", msg),
            DomainError::FsFail(msg) => write!(f, "File system error: {}", msg),
            DomainError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

/// Why a candidate was abandoned
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// Details lookup failed or the provider no longer knows the video
    DetailsUnavailable(String),
    /// Licence tag is present and not the open one
    LicenseRejected { license: String },
    /// Source is shorter than the minimum clip length
    TooShort { total_seconds: u64, min_seconds: u64 },
    /// Downloader failed
    DownloadFailed(String),
    /// Downloader finished but left no usable file behind
    DownloadMissing,
    /// Transcoder failed or produced nothing
    TrimFailed(String),
    /// Publish target refused the clip
    UploadFailed(String),
}

impl SkipReason {
    /// Pipeline stage the reason belongs to
    pub fn stage(&self) -> &'static str {
        match self {
            SkipReason::DetailsUnavailable(_)
            | SkipReason::LicenseRejected { .. }
            | SkipReason::TooShort { .. } => "detail_check",
            SkipReason::DownloadFailed(_) | SkipReason::DownloadMissing => "downloading",
            SkipReason::TrimFailed(_) => "trimming",
            SkipReason::UploadFailed(_) => "uploading",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::DetailsUnavailable(msg) => write!(f, "details unavailable: {}", msg),
            SkipReason::LicenseRejected { license } => write!(f, "license={}", license),
            SkipReason::TooShort {
                total_seconds,
                min_seconds,
            } => write!(f, "too short ({}s < {}s)", total_seconds, min_seconds),
            SkipReason::DownloadFailed(msg) => write!(f, "download failed: {}", msg),
            SkipReason::DownloadMissing => write!(f, "downloaded file not found"),
            SkipReason::TrimFailed(msg) => write!(f, "trim failed: {}", msg),
            SkipReason::UploadFailed(msg) => write!(f, "upload failed: {}", msg),
        }
    }
}

/// Outcome of a failed pipeline stage.
///
/// `Skip` abandons the current candidate and moves on to the next one;
/// `Fatal` aborts the whole run.
#[derive(Debug, Clone, PartialEq)]
pub enum StageError {
    Skip(SkipReason),
    Fatal(DomainError),
}

impl From<SkipReason> for StageError {
    fn from(reason: SkipReason) -> Self {
        StageError::Skip(reason)
    }
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageError::Skip(reason) => write!(f, "skipped: {}", reason),
            StageError::Fatal(err) => write!(f, "fatal: {}", err),
        }
    }
}

impl std::error::Error for StageError {}
