// Domain models - Core types and data structures

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Licence tag the search provider uses for reusable content
pub const OPEN_LICENSE_TAG: &str = "creativeCommon";

/// Upper bound the search provider accepts for one results page
pub const MAX_RESULTS_LIMIT: u32 = 50;

/// Public watch page prefix, also used in attribution text
const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";

/// One discovery result returned by a search call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub source_id: String,
    pub title: String,
    pub author_name: String,
    pub thumbnail_url: Option<String>,
}

impl SearchHit {
    pub fn new(
        source_id: impl Into<String>,
        title: impl Into<String>,
        author_name: impl Into<String>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            title: title.into(),
            author_name: author_name.into(),
            thumbnail_url: None,
        }
    }

    /// Public URL of the source video
    pub fn watch_url(&self) -> String {
        format!("{}{}", WATCH_URL_PREFIX, self.source_id)
    }
}

/// Per-video metadata fetched lazily during the retry loop
#[derive(Debug, Clone, PartialEq)]
pub struct VideoDetails {
    pub source_id: String,
    /// Empty when the provider did not populate it
    pub license_tag: String,
    pub total_duration_seconds: u64,
}

impl VideoDetails {
    pub fn new(
        source_id: impl Into<String>,
        license_tag: impl Into<String>,
        total_duration_seconds: u64,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            license_tag: license_tag.into(),
            total_duration_seconds,
        }
    }
}

/// Sub-range of a source video selected for extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipWindow {
    pub start_seconds: u64,
    pub length_seconds: u64,
}

impl ClipWindow {
    /// Exclusive end of the window
    pub fn end_seconds(&self) -> u64 {
        self.start_seconds + self.length_seconds
    }

    /// Check the window lies inside a source of the given duration
    pub fn fits_within(&self, total_duration_seconds: u64) -> bool {
        self.length_seconds > 0 && self.end_seconds() <= total_duration_seconds
    }
}

impl fmt::Display for ClipWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "start={}s len={}s", self.start_seconds, self.length_seconds)
    }
}

/// Immutable settings for a single run
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    search_terms: Vec<String>,
    min_clip_seconds: u64,
    max_clip_seconds: u64,
    license_filter: String,
    max_results_per_term: u32,
}

impl RunConfig {
    /// Create a validated run configuration.
    ///
    /// Blank search terms are dropped and the rest are trimmed; at least one
    /// must remain.
    pub fn new(
        search_terms: Vec<String>,
        min_clip_seconds: u64,
        max_clip_seconds: u64,
        license_filter: impl Into<String>,
        max_results_per_term: u32,
    ) -> Result<Self, DomainError> {
        let search_terms: Vec<String> = search_terms
            .iter()
            .map(|term| term.trim())
            .filter(|term| !term.is_empty())
            .map(str::to_string)
            .collect();

        if search_terms.is_empty() {
            return Err(DomainError::BadArgs(
                "At least one search term is required".to_string(),
            ));
        }
        if min_clip_seconds == 0 {
            return Err(DomainError::BadArgs(
                "Minimum clip length must be positive".to_string(),
            ));
        }
        if min_clip_seconds > max_clip_seconds {
            return Err(DomainError::BadArgs(format!(
                "Minimum clip length ({}s) exceeds maximum ({}s)",
                min_clip_seconds, max_clip_seconds
            )));
        }

        let license_filter = license_filter.into();
        if license_filter.trim().is_empty() {
            return Err(DomainError::BadArgs(
                "License filter cannot be empty".to_string(),
            ));
        }
        if max_results_per_term == 0 || max_results_per_term > MAX_RESULTS_LIMIT {
            return Err(DomainError::BadArgs(format!(
                "Results per search term must be between 1 and {}",
                MAX_RESULTS_LIMIT
            )));
        }

        Ok(Self {
            search_terms,
            min_clip_seconds,
            max_clip_seconds,
            license_filter,
            max_results_per_term,
        })
    }

    pub fn search_terms(&self) -> &[String] {
        &self.search_terms
    }

    pub fn min_clip_seconds(&self) -> u64 {
        self.min_clip_seconds
    }

    pub fn max_clip_seconds(&self) -> u64 {
        self.max_clip_seconds
    }

    pub fn license_filter(&self) -> &str {
        &self.license_filter
    }

    pub fn max_results_per_term(&self) -> u32 {
        self.max_results_per_term
    }
}

/// A clip that made it all the way through the pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishedClip {
    pub source_id: String,
    pub title: String,
    pub window: ClipWindow,
    /// Identifier assigned by the publish target, when it reported one
    pub post_id: Option<String>,
    pub published_at: DateTime<Utc>,
}

/// Why a run ended without publishing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NothingReason {
    /// No new candidates after deduplication
    EmptyPool,
    /// Every candidate was tried and abandoned
    Exhausted { attempted: usize },
}

impl fmt::Display for NothingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NothingReason::EmptyPool => write!(f, "no new candidates found"),
            NothingReason::Exhausted { attempted } => {
                write!(f, "no candidate succeeded ({} attempted)", attempted)
            }
        }
    }
}

/// Result of one run
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Published(PublishedClip),
    NothingPublished(NothingReason),
}

impl RunOutcome {
    pub fn is_published(&self) -> bool {
        matches!(self, RunOutcome::Published(_))
    }
}

#[cfg(test)]
mod tests;
