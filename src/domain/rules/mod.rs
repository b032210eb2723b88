// Domain rules - Candidate selection policies

use std::collections::{HashSet, VecDeque};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Eligibility rules applied to a candidate once its details are known
pub struct LicenseDurationFilter;

impl LicenseDurationFilter {
    /// Check whether a candidate may be republished
    pub fn accepts(details: &VideoDetails, config: &RunConfig) -> bool {
        Self::evaluate(details, config).is_ok()
    }

    /// Same as [`accepts`](Self::accepts) but reports the rejection reason.
    ///
    /// An empty licence tag means the provider did not populate it and is
    /// accepted.
    pub fn evaluate(details: &VideoDetails, config: &RunConfig) -> Result<(), SkipReason> {
        let license = details.license_tag.trim();
        if !license.is_empty() && license != config.license_filter() {
            return Err(SkipReason::LicenseRejected {
                license: license.to_string(),
            });
        }

        if details.total_duration_seconds < config.min_clip_seconds() {
            return Err(SkipReason::TooShort {
                total_seconds: details.total_duration_seconds,
                min_seconds: config.min_clip_seconds(),
            });
        }

        Ok(())
    }
}

/// Picks the sub-range of a source video to extract
pub struct ClipWindowPlanner;

impl ClipWindowPlanner {
    /// Draw a clip window for a source of `total_duration_seconds`.
    ///
    /// The length is uniform over `[min_len, max_len]` and capped at the
    /// source duration; the start is uniform over every position that keeps
    /// the window inside the source.
    pub fn plan<R: Rng + ?Sized>(
        total_duration_seconds: u64,
        min_len: u64,
        max_len: u64,
        rng: &mut R,
    ) -> Result<ClipWindow, DomainError> {
        if min_len == 0 || min_len > max_len {
            return Err(DomainError::BadArgs(format!(
                "Invalid clip length bounds: {}..={}",
                min_len, max_len
            )));
        }
        if total_duration_seconds < min_len {
            return Err(DomainError::BadArgs(format!(
                "Source of {}s is shorter than the minimum clip length of {}s",
                total_duration_seconds, min_len
            )));
        }

        let drawn = rng.random_range(min_len..=max_len);
        let length_seconds = drawn.min(total_duration_seconds);

        let max_start = total_duration_seconds.saturating_sub(length_seconds);
        let start_seconds = if max_start == 0 {
            0
        } else {
            rng.random_range(0..=max_start)
        };

        Ok(ClipWindow {
            start_seconds,
            length_seconds,
        })
    }
}

/// Ordered, deduplicated set of candidates for one run
#[derive(Debug, Clone, Default)]
pub struct CandidatePool {
    candidates: VecDeque<SearchHit>,
}

impl CandidatePool {
    /// Build the pool from per-term search results.
    ///
    /// A source id appears at most once, ids already in `published` are
    /// dropped, and the survivors are shuffled with `rng`.
    pub fn build<I, R>(results_by_term: I, published: &HashSet<String>, rng: &mut R) -> Self
    where
        I: IntoIterator<Item = (String, Vec<SearchHit>)>,
        R: Rng + ?Sized,
    {
        let mut seen: HashSet<String> = HashSet::new();
        let mut candidates: Vec<SearchHit> = Vec::new();

        for (_term, hits) in results_by_term {
            for hit in hits {
                if published.contains(&hit.source_id) {
                    continue;
                }
                if seen.insert(hit.source_id.clone()) {
                    candidates.push(hit);
                }
            }
        }

        candidates.shuffle(rng);

        Self {
            candidates: candidates.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Source ids in attempt order
    pub fn source_ids(&self) -> Vec<&str> {
        self.candidates
            .iter()
            .map(|hit| hit.source_id.as_str())
            .collect()
    }
}

impl Iterator for CandidatePool {
    type Item = SearchHit;

    fn next(&mut self) -> Option<Self::Item> {
        self.candidates.pop_front()
    }
}
