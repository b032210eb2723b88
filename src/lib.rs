//! Clip Reposter Library
//!
//! Finds openly-licensed videos, cuts a short random clip from one of them and
//! publishes it to a social page, keeping a record so no source is used twice.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod ports;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use app::{AppContainer, DefaultAppContainer, PublishPipeline};
pub use config_initialization::AppConfig;
pub use domain::errors::{DomainError, SkipReason, StageError};
pub use domain::model::{ClipWindow, PublishedClip, RunConfig, RunOutcome, SearchHit, VideoDetails};
pub use error::{ReposterError, ReposterResult};
pub use store::DedupStore;
