//! QA tests for content snapshots.
//!
//! Snapshots are written to a temporary directory and read back, exercising
//! the version and domain checks and the closed category enums at the JSON
//! boundary.

use medref_core::content::education::{education_repository, ComplexityLevel, EducationalContent};
use medref_core::content::labs::{lab_test_repository, LabTest};
use medref_core::content::oncology::{oncology_repository, OncologyCondition};
use medref_core::persist::{peek_domain, ContentSnapshot, PersistError, SNAPSHOT_VERSION};
use medref_core::Domain;
use std::path::Path;
use tempfile::TempDir;

async fn write_raw(path: &Path, value: &serde_json::Value) {
    tokio::fs::write(path, serde_json::to_string_pretty(value).expect("serialize"))
        .await
        .expect("Failed to write file");
}

// =============================================================================
// Round trips
// =============================================================================

#[tokio::test]
async fn test_oncology_round_trip() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("oncology.json");

    let snapshot = ContentSnapshot::from_repository(oncology_repository());
    snapshot.save_json(&path).await.expect("Failed to save snapshot");
    assert!(path.exists(), "Snapshot file should exist after saving");

    let loaded = ContentSnapshot::<OncologyCondition>::load_json(&path)
        .await
        .expect("Failed to load snapshot");
    assert_eq!(loaded.version, SNAPSHOT_VERSION);
    assert_eq!(loaded.domain, Domain::Oncology);
    assert_eq!(loaded.exported_at, snapshot.exported_at);

    let repo = loaded.into_repository();
    assert_eq!(repo.count(), oncology_repository().count());
    for entry in oncology_repository() {
        assert_eq!(repo.get(&entry.id), Some(entry));
    }
    assert_eq!(
        repo.search("lymph").len(),
        oncology_repository().search("lymph").len()
    );
}

#[tokio::test]
async fn test_education_round_trip_keeps_levels() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("education.json");

    ContentSnapshot::from_repository(education_repository())
        .save_json(&path)
        .await
        .expect("Failed to save snapshot");

    let repo = ContentSnapshot::<EducationalContent>::load_json(&path)
        .await
        .expect("Failed to load snapshot")
        .into_repository();
    let dialysis = repo.get("condition-dialysis").expect("dialysis should survive");
    assert_eq!(dialysis.available_levels(), ComplexityLevel::ALL.to_vec());
    assert_eq!(
        Some(dialysis),
        education_repository().get("condition-dialysis")
    );
}

#[tokio::test]
async fn test_peek_domain() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("labs.json");

    ContentSnapshot::from_repository(lab_test_repository())
        .save_json(&path)
        .await
        .expect("Failed to save snapshot");

    let info = peek_domain(&path).await.expect("Failed to peek snapshot");
    assert_eq!(info.domain, Domain::LabTests);
    assert_eq!(info.version, SNAPSHOT_VERSION);
    assert_eq!(info.entry_count, lab_test_repository().count());
}

// =============================================================================
// Rejections
// =============================================================================

#[tokio::test]
async fn test_wrong_domain_is_rejected() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("labs.json");

    ContentSnapshot::from_repository(lab_test_repository())
        .save_json(&path)
        .await
        .expect("Failed to save snapshot");

    let err = ContentSnapshot::<OncologyCondition>::load_json(&path)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PersistError::DomainMismatch {
            expected: Domain::Oncology,
            found: Domain::LabTests,
        }
    ));
}

#[tokio::test]
async fn test_version_mismatch_is_rejected() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("future.json");

    let mut value = serde_json::to_value(ContentSnapshot::from_repository(lab_test_repository()))
        .expect("serialize");
    value["version"] = serde_json::json!(99);
    write_raw(&path, &value).await;

    let err = ContentSnapshot::<LabTest>::load_json(&path).await.unwrap_err();
    assert!(matches!(
        err,
        PersistError::VersionMismatch { expected: 1, found: 99 }
    ));
    assert!(matches!(
        peek_domain(&path).await,
        Err(PersistError::VersionMismatch { .. })
    ));
}

#[tokio::test]
async fn test_unknown_category_is_rejected() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("bad-category.json");

    let mut value = serde_json::to_value(ContentSnapshot::from_repository(oncology_repository()))
        .expect("serialize");
    value["entries"][0]["category"] = serde_json::json!("benign");
    write_raw(&path, &value).await;

    let err = ContentSnapshot::<OncologyCondition>::load_json(&path)
        .await
        .unwrap_err();
    assert!(matches!(err, PersistError::Json(_)));
}

#[tokio::test]
async fn test_missing_file_is_io_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let err = ContentSnapshot::<LabTest>::load_json(temp_dir.path().join("absent.json"))
        .await
        .unwrap_err();
    assert!(matches!(err, PersistError::Io(_)));
}
