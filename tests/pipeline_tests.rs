//! End-to-end runs of the publish pipeline with in-memory ports

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use clip_reposter::adapters::FacebookPublishAdapter;
use clip_reposter::domain::errors::DomainError;
use clip_reposter::domain::model::{NothingReason, RunConfig, RunOutcome, SearchHit, VideoDetails};
use clip_reposter::ports::*;
use clip_reposter::{DedupStore, PublishPipeline};

fn ids(values: &[&str]) -> HashSet<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Search fake: fixed hits per term, fixed details per id
#[derive(Default)]
struct FakeSearch {
    hits: HashMap<String, Vec<SearchHit>>,
    failing_terms: HashSet<String>,
    details: HashMap<String, VideoDetails>,
    broken_details: HashSet<String>,
    detail_calls: Mutex<Vec<String>>,
}

impl FakeSearch {
    fn with_term(mut self, term: &str, ids: &[&str]) -> Self {
        self.hits.insert(
            term.to_string(),
            ids.iter()
                .map(|id| SearchHit::new(*id, format!("Title {}", id), "Some Channel"))
                .collect(),
        );
        self
    }

    fn with_failing_term(mut self, term: &str) -> Self {
        self.failing_terms.insert(term.to_string());
        self
    }

    fn with_details(mut self, id: &str, license: &str, seconds: u64) -> Self {
        self.details
            .insert(id.to_string(), VideoDetails::new(id, license, seconds));
        self
    }

    /// Details lookup for `id` errors out
    fn with_broken_details(mut self, id: &str) -> Self {
        self.broken_details.insert(id.to_string());
        self
    }
}

#[async_trait]
impl SearchPort for FakeSearch {
    async fn search(&self, term: &str, _max_results: u32) -> Result<Vec<SearchHit>, DomainError> {
        if self.failing_terms.contains(term) {
            return Err(DomainError::RemoteFail("quota exceeded".to_string()));
        }
        Ok(self.hits.get(term).cloned().unwrap_or_default())
    }

    async fn fetch_details(&self, source_id: &str) -> Result<Option<VideoDetails>, DomainError> {
        self.detail_calls.lock().unwrap().push(source_id.to_string());
        if self.broken_details.contains(source_id) {
            return Err(DomainError::RemoteFail("HTTP 500".to_string()));
        }
        Ok(self.details.get(source_id).cloned())
    }
}

/// Download fake: writes a small file unless the id is marked otherwise
#[derive(Default)]
struct FakeDownload {
    /// Tool fails
    failing: HashSet<String>,
    /// Tool succeeds but no file is found
    missing: HashSet<String>,
    /// Tool reports a path that was never written
    dangling: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeDownload {
    fn failing(source_ids: &[&str]) -> Self {
        Self {
            failing: ids(source_ids),
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DownloadPort for FakeDownload {
    async fn download(
        &self,
        _source_url: &str,
        source_id: &str,
        destination_dir: &Path,
    ) -> Result<Option<PathBuf>, DomainError> {
        self.calls.lock().unwrap().push(source_id.to_string());
        if self.failing.contains(source_id) {
            return Err(DomainError::ToolFail("HTTP Error 403: Forbidden".to_string()));
        }
        if self.missing.contains(source_id) {
            return Ok(None);
        }
        let path = destination_dir.join(format!("{}.mp4", source_id));
        if !self.dangling.contains(source_id) {
            std::fs::write(&path, b"source video").unwrap();
        }
        Ok(Some(path))
    }
}

/// Transcode fake: records the window and writes a non-empty clip.
///
/// Sources are matched on their file stem, which is the source id.
#[derive(Default)]
struct FakeTranscode {
    /// ffmpeg exits non-zero
    failing: HashSet<String>,
    /// ffmpeg exits zero without writing the clip
    silent: HashSet<String>,
    windows: Mutex<Vec<(u64, u64)>>,
}

#[async_trait]
impl TranscodePort for FakeTranscode {
    async fn trim(
        &self,
        source: &Path,
        destination: &Path,
        start_seconds: u64,
        length_seconds: u64,
    ) -> Result<(), DomainError> {
        assert!(source.is_file());
        let id = source
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default();
        self.windows
            .lock()
            .unwrap()
            .push((start_seconds, length_seconds));

        if self.failing.contains(&id) {
            return Err(DomainError::ToolFail("Invalid data found".to_string()));
        }
        if !self.silent.contains(&id) {
            std::fs::write(destination, b"clip").unwrap();
        }
        Ok(())
    }
}

/// Publish fake: optionally rejects every upload
#[derive(Default)]
struct FakePublish {
    reject: bool,
    uploads: Mutex<Vec<UploadRequest>>,
}

impl FakePublish {
    fn titles(&self) -> Vec<String> {
        self.uploads
            .lock()
            .unwrap()
            .iter()
            .map(|request| request.title.clone())
            .collect()
    }
}

#[async_trait]
impl PublishPort for FakePublish {
    async fn upload(&self, request: &UploadRequest) -> Result<PublishReceipt, DomainError> {
        assert!(request.file_path.is_file());
        self.uploads.lock().unwrap().push(request.clone());
        if self.reject {
            return Err(DomainError::RemoteFail("(#200) permissions error".to_string()));
        }
        Ok(PublishReceipt {
            post_id: Some("post-1".to_string()),
        })
    }
}

struct Harness {
    search: Arc<FakeSearch>,
    download: Arc<FakeDownload>,
    transcode: Arc<FakeTranscode>,
    publish: Arc<FakePublish>,
    work: TempDir,
}

impl Harness {
    fn new(search: FakeSearch, download: FakeDownload, publish: FakePublish) -> Self {
        Self {
            search: Arc::new(search),
            download: Arc::new(download),
            transcode: Arc::new(FakeTranscode::default()),
            publish: Arc::new(publish),
            work: TempDir::new().unwrap(),
        }
    }

    fn with_transcode(mut self, transcode: FakeTranscode) -> Self {
        self.transcode = Arc::new(transcode);
        self
    }

    fn pipeline(&self, terms: &[&str]) -> PublishPipeline {
        self.pipeline_publishing_to(terms, self.publish.clone())
    }

    fn pipeline_publishing_to(
        &self,
        terms: &[&str],
        publish: Arc<dyn PublishPort>,
    ) -> PublishPipeline {
        let config = RunConfig::new(
            terms.iter().map(|t| t.to_string()).collect(),
            30,
            40,
            "creativeCommon",
            25,
        )
        .unwrap();

        PublishPipeline::new(
            self.search.clone(),
            self.download.clone(),
            self.transcode.clone(),
            publish,
            config,
            self.work.path().join("work"),
        )
    }

    fn store(&self) -> DedupStore {
        DedupStore::load(self.work.path().join("posted.json"))
    }

    fn work_dir_is_empty(&self) -> bool {
        std::fs::read_dir(self.work.path().join("work"))
            .map(|mut entries| entries.next().is_none())
            .unwrap_or(true)
    }
}

#[tokio::test]
async fn test_retries_until_a_candidate_publishes() {
    let harness = Harness::new(
        FakeSearch::default()
            .with_term("nature", &["a", "b", "c"])
            .with_details("a", "creativeCommon", 600)
            .with_details("b", "creativeCommon", 600)
            .with_details("c", "creativeCommon", 600),
        FakeDownload::failing(&["a", "b"]),
        FakePublish::default(),
    );
    let mut store = harness.store();

    // Seed 1 orders the pool so both failing downloads come before "c"
    let outcome = harness
        .pipeline(&["nature"])
        .run(&mut store, &mut StdRng::seed_from_u64(1))
        .await
        .unwrap();

    let RunOutcome::Published(clip) = outcome else {
        panic!("expected a published clip, got {:?}", outcome);
    };
    assert_eq!(clip.source_id, "c");
    assert_eq!(clip.post_id.as_deref(), Some("post-1"));
    assert!(clip.window.fits_within(600));
    assert!((30..=40).contains(&clip.window.length_seconds));

    let calls = harness.download.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[2], "c");
    assert_eq!(
        calls[..2].iter().cloned().collect::<HashSet<_>>(),
        ids(&["a", "b"])
    );
    assert_eq!(harness.publish.titles(), vec!["Title c"]);

    let reloaded = harness.store();
    assert_eq!(reloaded.ids(), vec!["c"]);
    assert!(harness.work_dir_is_empty());
}

#[tokio::test]
async fn test_all_candidates_already_published() {
    let harness = Harness::new(
        FakeSearch::default()
            .with_term("nature", &["a", "b"])
            .with_term("drone", &["b"]),
        FakeDownload::default(),
        FakePublish::default(),
    );
    let mut store = harness.store();
    store.add("a");
    store.add("b");
    store.persist().unwrap();
    let before = std::fs::read_to_string(store.path()).unwrap();

    let outcome = harness
        .pipeline(&["nature", "drone"])
        .run(&mut store, &mut StdRng::seed_from_u64(3))
        .await
        .unwrap();

    assert_eq!(outcome, RunOutcome::NothingPublished(NothingReason::EmptyPool));
    assert!(harness.search.detail_calls.lock().unwrap().is_empty());
    assert!(harness.download.calls().is_empty());
    assert_eq!(std::fs::read_to_string(store.path()).unwrap(), before);
}

#[tokio::test]
async fn test_proprietary_license_skipped_before_download() {
    let harness = Harness::new(
        FakeSearch::default()
            .with_term("nature", &["yt"])
            .with_details("yt", "youtube", 600),
        FakeDownload::default(),
        FakePublish::default(),
    );
    let mut store = harness.store();

    let outcome = harness
        .pipeline(&["nature"])
        .run(&mut store, &mut StdRng::seed_from_u64(5))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        RunOutcome::NothingPublished(NothingReason::Exhausted { attempted: 1 })
    );
    assert!(harness.download.calls().is_empty());
    assert!(!store.path().exists());
}

#[tokio::test]
async fn test_short_and_unknown_videos_skipped() {
    let harness = Harness::new(
        FakeSearch::default()
            .with_term("nature", &["short", "gone", "ok"])
            .with_details("short", "creativeCommon", 12)
            .with_details("ok", "", 90),
        FakeDownload::default(),
        FakePublish::default(),
    );
    let mut store = harness.store();

    let outcome = harness
        .pipeline(&["nature"])
        .run(&mut store, &mut StdRng::seed_from_u64(8))
        .await
        .unwrap();

    match outcome {
        RunOutcome::Published(clip) => assert_eq!(clip.source_id, "ok"),
        other => panic!("expected a published clip, got {:?}", other),
    }
    assert_eq!(harness.download.calls(), vec!["ok"]);
}

/// Every candidate except "ok" fails at a different stage
fn stage_failure_harness(publish: FakePublish) -> Harness {
    let all = ["details", "none", "dangling", "trim_err", "trim_empty", "ok"];
    let mut search = FakeSearch::default()
        .with_term("nature", &all)
        .with_broken_details("details");
    for id in &all[1..] {
        search = search.with_details(id, "creativeCommon", 300);
    }

    Harness::new(
        search,
        FakeDownload {
            missing: ids(&["none"]),
            dangling: ids(&["dangling"]),
            ..FakeDownload::default()
        },
        publish,
    )
    .with_transcode(FakeTranscode {
        failing: ids(&["trim_err"]),
        silent: ids(&["trim_empty"]),
        ..FakeTranscode::default()
    })
}

#[tokio::test]
async fn test_stage_failures_move_on_to_next_candidate() {
    for seed in 0..8 {
        let harness = stage_failure_harness(FakePublish::default());
        let mut store = harness.store();

        let outcome = harness
            .pipeline(&["nature"])
            .run(&mut store, &mut StdRng::seed_from_u64(seed))
            .await
            .unwrap();

        match outcome {
            RunOutcome::Published(clip) => assert_eq!(clip.source_id, "ok"),
            other => panic!("seed {}: expected a published clip, got {:?}", seed, other),
        }
        assert_eq!(harness.publish.titles(), vec!["Title ok"]);
        assert!(!harness.download.calls().contains(&"details".to_string()));
        assert_eq!(harness.store().ids(), vec!["ok"]);
        assert!(harness.work_dir_is_empty());
    }
}

#[tokio::test]
async fn test_stage_failures_never_reach_upload() {
    let harness = stage_failure_harness(FakePublish::default());
    let mut store = harness.store();
    store.add("ok");

    let outcome = harness
        .pipeline(&["nature"])
        .run(&mut store, &mut StdRng::seed_from_u64(4))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        RunOutcome::NothingPublished(NothingReason::Exhausted { attempted: 5 })
    );
    assert_eq!(
        harness.download.calls().into_iter().collect::<HashSet<_>>(),
        ids(&["none", "dangling", "trim_err", "trim_empty"])
    );
    assert_eq!(harness.transcode.windows.lock().unwrap().len(), 2);
    assert!(harness.publish.titles().is_empty());
    assert!(!store.path().exists());
    assert!(harness.work_dir_is_empty());
}

#[tokio::test]
async fn test_failing_search_term_is_ignored() {
    let harness = Harness::new(
        FakeSearch::default()
            .with_failing_term("drone")
            .with_term("nature", &["a"])
            .with_details("a", "creativeCommon", 300),
        FakeDownload::default(),
        FakePublish::default(),
    );
    let mut store = harness.store();

    let outcome = harness
        .pipeline(&["drone", "nature"])
        .run(&mut store, &mut StdRng::seed_from_u64(1))
        .await
        .unwrap();

    assert!(outcome.is_published());
    assert!(store.contains("a"));
}

#[tokio::test]
async fn test_rejected_uploads_leave_record_untouched() {
    let harness = Harness::new(
        FakeSearch::default()
            .with_term("nature", &["a", "b"])
            .with_details("a", "creativeCommon", 300)
            .with_details("b", "creativeCommon", 300),
        FakeDownload::default(),
        FakePublish {
            reject: true,
            ..FakePublish::default()
        },
    );
    let mut store = harness.store();

    let outcome = harness
        .pipeline(&["nature"])
        .run(&mut store, &mut StdRng::seed_from_u64(2))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        RunOutcome::NothingPublished(NothingReason::Exhausted { attempted: 2 })
    );
    assert_eq!(harness.publish.uploads.lock().unwrap().len(), 2);
    assert!(store.is_empty());
    assert!(!store.path().exists());
    assert!(harness.work_dir_is_empty());
}

#[tokio::test]
async fn test_upload_accepted_without_id_ends_run() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v17.0/page/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let harness = Harness::new(
        FakeSearch::default()
            .with_term("nature", &["a", "b"])
            .with_details("a", "creativeCommon", 300)
            .with_details("b", "creativeCommon", 300),
        FakeDownload::default(),
        FakePublish::default(),
    );
    let facebook = Arc::new(
        FacebookPublishAdapter::new("page".to_string(), "token".to_string())
            .with_endpoint(server.uri(), "v17.0".to_string()),
    );
    let mut store = harness.store();

    let outcome = harness
        .pipeline_publishing_to(&["nature"], facebook)
        .run(&mut store, &mut StdRng::seed_from_u64(6))
        .await
        .unwrap();

    let RunOutcome::Published(clip) = outcome else {
        panic!("expected a published clip, got {:?}", outcome);
    };
    assert!(clip.post_id.is_none());
    assert_eq!(harness.store().ids(), vec![clip.source_id.as_str()]);
    assert_eq!(harness.download.calls().len(), 1);
}

#[tokio::test]
async fn test_upload_carries_attribution() {
    let harness = Harness::new(
        FakeSearch::default()
            .with_term("nature", &["vid42"])
            .with_details("vid42", "creativeCommon", 35),
        FakeDownload::default(),
        FakePublish::default(),
    );
    let mut store = harness.store();

    harness
        .pipeline(&["nature"])
        .run(&mut store, &mut StdRng::seed_from_u64(9))
        .await
        .unwrap();

    let uploads = harness.publish.uploads.lock().unwrap();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].title, "Title vid42");
    assert!(uploads[0]
        .description
        .contains("https://www.youtube.com/watch?v=vid42"));

    // Source shorter than the drawn length: clip is clamped to the whole video
    let windows = harness.transcode.windows.lock().unwrap();
    let (start, length) = windows[0];
    assert!(start + length <= 35);
    assert!(length >= 30);
}
