//! Log-to-file output tests
//!
//! Installs the global subscriber, so this is the only test in the binary that
//! calls `init_logging`.

use super::test_utils::with_env;
use std::fs;
use storefront_sync::error::SyncError;
use storefront_sync::logging::{init_logging, LoggingConfig};
use tempfile::TempDir;

#[test]
fn test_file_output_appends_json_lines() {
    let temp_dir = TempDir::new().unwrap();
    let log_dir = temp_dir.path().join("logs");
    fs::create_dir_all(&log_dir).unwrap();
    let log_file = log_dir.join("storefront-sync.log");
    fs::write(&log_file, "previous run\n").unwrap();

    let config = LoggingConfig {
        format: "json".to_string(),
        output: "file".to_string(),
        file: log_file.clone(),
        ..LoggingConfig::default()
    };

    let result = with_env(
        &[
            ("STOREFRONT_SYNC_LOG", None),
            ("STOREFRONT_SYNC_LOG_FORMAT", None),
            ("STOREFRONT_SYNC_LOG_OUTPUT", None),
            ("STOREFRONT_SYNC_LOG_MODULES", None),
        ],
        || init_logging(Some(&config)),
    );
    result.unwrap();

    tracing::info!(surface = "top", "search surface registered");

    let content = fs::read_to_string(&log_file).unwrap();
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("previous run"));

    let entry = lines
        .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
        .find(|entry| entry["fields"]["message"] == "search surface registered")
        .expect("logged event should be appended as JSON");
    assert_eq!(entry["level"], "INFO");
    assert_eq!(entry["fields"]["surface"], "top");

    // A second subscriber cannot be installed over the first.
    assert!(matches!(init_logging(None), Err(SyncError::Config(_))));
}
