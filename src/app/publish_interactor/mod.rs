// Publish interactor - Orchestrates one discovery-to-publish run

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::ports::*;
use crate::store::DedupStore;
use crate::utils::path::{sanitize_component, ScopedDir};
use crate::utils::time::format_seconds;

/// Candidate selection and retry pipeline.
///
/// Tries pooled candidates one at a time through detail check, download,
/// trim and upload. Any stage failure abandons the candidate and moves on;
/// the first successful upload ends the run.
pub struct PublishPipeline {
    search_port: Arc<dyn SearchPort>,
    download_port: Arc<dyn DownloadPort>,
    transcode_port: Arc<dyn TranscodePort>,
    publish_port: Arc<dyn PublishPort>,
    config: RunConfig,
    work_dir: PathBuf,
}

impl PublishPipeline {
    /// Create new pipeline with injected ports
    pub fn new(
        search_port: Arc<dyn SearchPort>,
        download_port: Arc<dyn DownloadPort>,
        transcode_port: Arc<dyn TranscodePort>,
        publish_port: Arc<dyn PublishPort>,
        config: RunConfig,
        work_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            search_port,
            download_port,
            transcode_port,
            publish_port,
            config,
            work_dir: work_dir.into(),
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Execute one run against `store`.
    ///
    /// `store` is only written after a successful upload. Errors are
    /// reserved for defects that make continuing pointless; a run that
    /// publishes nothing is an `Ok` outcome.
    pub async fn run<R: Rng + Send + ?Sized>(
        &self,
        store: &mut DedupStore,
        rng: &mut R,
    ) -> Result<RunOutcome, DomainError> {
        let results = self.discover().await;
        let pool = CandidatePool::build(results, store.as_set(), rng);

        if pool.is_empty() {
            info!("No new candidates found");
            return Ok(RunOutcome::NothingPublished(NothingReason::EmptyPool));
        }
        info!(candidates = pool.len(), "Candidate pool built");

        std::fs::create_dir_all(&self.work_dir).map_err(|e| {
            DomainError::FsFail(format!(
                "Failed to create working directory {}: {}",
                self.work_dir.display(),
                e
            ))
        })?;

        let mut attempted = 0;
        for candidate in pool {
            attempted += 1;
            let span = info_span!("candidate", source_id = %candidate.source_id);

            match self.attempt(&candidate, rng).instrument(span).await {
                Ok(published) => {
                    store.add(published.source_id.clone());
                    if let Err(e) = store.persist() {
                        error!(
                            source_id = %published.source_id,
                            error = %e,
                            "Clip was published but the dedup record could not be saved"
                        );
                        return Err(e);
                    }
                    info!(
                        source_id = %published.source_id,
                        post_id = published.post_id.as_deref().unwrap_or("unknown"),
                        "Published clip"
                    );
                    return Ok(RunOutcome::Published(published));
                }
                Err(StageError::Skip(reason)) => {
                    warn!(
                        source_id = %candidate.source_id,
                        stage = reason.stage(),
                        "Skipping candidate: {}",
                        reason
                    );
                }
                Err(StageError::Fatal(e)) => {
                    error!(source_id = %candidate.source_id, error = %e, "Run aborted");
                    return Err(e);
                }
            }
        }

        info!(attempted, "Done. No candidate succeeded");
        Ok(RunOutcome::NothingPublished(NothingReason::Exhausted {
            attempted,
        }))
    }

    /// Query every search term; a failing term contributes no hits
    async fn discover(&self) -> Vec<(String, Vec<SearchHit>)> {
        let mut results = Vec::with_capacity(self.config.search_terms().len());

        for term in self.config.search_terms() {
            match self
                .search_port
                .search(term, self.config.max_results_per_term())
                .await
            {
                Ok(hits) => {
                    debug!(term = %term, hits = hits.len(), "Search finished");
                    results.push((term.clone(), hits));
                }
                Err(e) => warn!(term = %term, error = %e, "Search failed, ignoring term"),
            }
        }

        results
    }

    /// Run one candidate through every stage
    async fn attempt<R: Rng + Send + ?Sized>(
        &self,
        candidate: &SearchHit,
        rng: &mut R,
    ) -> Result<PublishedClip, StageError> {
        let details = self.check_details(candidate).await?;

        // Removed on every exit path from this attempt
        let scratch = ScopedDir::create(
            self.work_dir.join(sanitize_component(&candidate.source_id)),
        )
        .map_err(StageError::Fatal)?;

        let source = self.download(candidate, scratch.path()).await?;
        let (clip, window) = self
            .trim(candidate, &details, &source, scratch.path(), rng)
            .await?;
        let receipt = self.upload(candidate, &clip).await?;

        Ok(PublishedClip {
            source_id: candidate.source_id.clone(),
            title: candidate.title.clone(),
            window,
            post_id: receipt.post_id,
            published_at: Utc::now(),
        })
    }

    async fn check_details(&self, candidate: &SearchHit) -> Result<VideoDetails, StageError> {
        let details = self
            .search_port
            .fetch_details(&candidate.source_id)
            .await
            .map_err(|e| SkipReason::DetailsUnavailable(e.to_string()))?
            .ok_or_else(|| SkipReason::DetailsUnavailable("video not found".to_string()))?;

        LicenseDurationFilter::evaluate(&details, &self.config)?;
        debug!(
            license = %details.license_tag,
            duration = %format_seconds(details.total_duration_seconds),
            "Candidate eligible"
        );
        Ok(details)
    }

    async fn download(&self, candidate: &SearchHit, dir: &Path) -> Result<PathBuf, StageError> {
        let path = self
            .download_port
            .download(&candidate.watch_url(), &candidate.source_id, dir)
            .await
            .map_err(|e| SkipReason::DownloadFailed(e.to_string()))?
            .ok_or(SkipReason::DownloadMissing)?;

        if !path.is_file() {
            return Err(SkipReason::DownloadMissing.into());
        }
        Ok(path)
    }

    async fn trim<R: Rng + Send + ?Sized>(
        &self,
        candidate: &SearchHit,
        details: &VideoDetails,
        source: &Path,
        dir: &Path,
        rng: &mut R,
    ) -> Result<(PathBuf, ClipWindow), StageError> {
        let window = ClipWindowPlanner::plan(
            details.total_duration_seconds,
            self.config.min_clip_seconds(),
            self.config.max_clip_seconds(),
            rng,
        )
        .map_err(|e| StageError::Fatal(DomainError::InternalError(e.to_string())))?;

        let clip = dir.join(format!("{}_clip.mp4", sanitize_component(&candidate.source_id)));
        info!(
            window = %window,
            from = %format_seconds(window.start_seconds),
            "Cutting clip"
        );

        self.transcode_port
            .trim(source, &clip, window.start_seconds, window.length_seconds)
            .await
            .map_err(|e| SkipReason::TrimFailed(e.to_string()))?;

        let produced = std::fs::metadata(&clip)
            .map(|meta| meta.is_file() && meta.len() > 0)
            .unwrap_or(false);
        if !produced {
            return Err(SkipReason::TrimFailed("transcoder produced no output".to_string()).into());
        }

        Ok((clip, window))
    }

    async fn upload(
        &self,
        candidate: &SearchHit,
        clip: &Path,
    ) -> Result<PublishReceipt, StageError> {
        let request = UploadRequest {
            file_path: clip.to_path_buf(),
            title: candidate.title.clone(),
            description: attribution(candidate),
        };

        self.publish_port
            .upload(&request)
            .await
            .map_err(|e| SkipReason::UploadFailed(e.to_string()).into())
    }
}

/// Attribution text required by the source licence
pub fn attribution(candidate: &SearchHit) -> String {
    format!(
        "Clip from \"{}\" by {}\nOriginal: {}\n\nAuto-posted from a Creative Commons source.",
        candidate.title,
        candidate.author_name,
        candidate.watch_url()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribution_names_source_and_author() {
        let hit = SearchHit::new("abc123", "Sunrise", "Jo Doe");
        let text = attribution(&hit);

        assert!(text.contains("\"Sunrise\""));
        assert!(text.contains("by Jo Doe"));
        assert!(text.contains("https://www.youtube.com/watch?v=abc123"));
    }
}
