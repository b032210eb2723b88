// Unit tests for domain models

use crate::domain::errors::*;
use crate::domain::model::*;

fn terms(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[test]
fn test_run_config_trims_and_drops_blank_terms() {
    let config = RunConfig::new(
        terms(&["nature", "  drone ", "", "   "]),
        30,
        40,
        OPEN_LICENSE_TAG,
        25,
    )
    .unwrap();

    assert_eq!(config.search_terms(), &["nature".to_string(), "drone".to_string()]);
    assert_eq!(config.min_clip_seconds(), 30);
    assert_eq!(config.max_clip_seconds(), 40);
    assert_eq!(config.license_filter(), "creativeCommon");
}

#[test]
fn test_run_config_requires_terms() {
    let result = RunConfig::new(terms(&[" ", ""]), 30, 40, OPEN_LICENSE_TAG, 25);
    assert!(matches!(result, Err(DomainError::BadArgs(_))));
}

#[test]
fn test_run_config_rejects_inverted_bounds() {
    assert!(RunConfig::new(terms(&["nature"]), 41, 40, OPEN_LICENSE_TAG, 25).is_err());
    assert!(RunConfig::new(terms(&["nature"]), 0, 40, OPEN_LICENSE_TAG, 25).is_err());
    // Equal bounds are a fixed clip length
    assert!(RunConfig::new(terms(&["nature"]), 40, 40, OPEN_LICENSE_TAG, 25).is_ok());
}

#[test]
fn test_run_config_result_limit() {
    assert!(RunConfig::new(terms(&["nature"]), 30, 40, OPEN_LICENSE_TAG, 0).is_err());
    assert!(RunConfig::new(terms(&["nature"]), 30, 40, OPEN_LICENSE_TAG, 51).is_err());
    assert!(RunConfig::new(terms(&["nature"]), 30, 40, "", 25).is_err());
}

#[test]
fn test_search_hit_watch_url() {
    let hit = SearchHit::new("abc123", "Waterfall", "Someone");
    assert_eq!(hit.watch_url(), "https://www.youtube.com/watch?v=abc123");
    assert!(hit.thumbnail_url.is_none());
}

#[test]
fn test_clip_window_bounds() {
    let window = ClipWindow {
        start_seconds: 20,
        length_seconds: 30,
    };
    assert_eq!(window.end_seconds(), 50);
    assert!(window.fits_within(50));
    assert!(!window.fits_within(49));
    assert_eq!(window.to_string(), "start=20s len=30s");
}

#[test]
fn test_nothing_reason_display() {
    assert_eq!(NothingReason::EmptyPool.to_string(), "no new candidates found");
    assert_eq!(
        NothingReason::Exhausted { attempted: 3 }.to_string(),
        "no candidate succeeded (3 attempted)"
    );
}

#[test]
fn test_skip_reason_stage() {
    assert_eq!(SkipReason::DownloadMissing.stage(), "downloading");
    assert_eq!(
        SkipReason::LicenseRejected {
            license: "youtube".to_string()
        }
        .stage(),
        "detail_check"
    );
    assert_eq!(SkipReason::UploadFailed("500".to_string()).stage(), "uploading");
}
