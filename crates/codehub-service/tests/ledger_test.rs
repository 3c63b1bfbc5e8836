//! Version ledger invariants: monotonic labels, single-latest, snapshot
//! capture, and the conflict retry/fallback protocol.

mod helpers;

use bytes::Bytes;
use codehub_core::types::UserId;
use codehub_entity::version::VersionAction;
use codehub_service::IncomingUpload;

use helpers::TestApp;

#[tokio::test]
async fn test_labels_are_sequential_and_unique() {
    let app = TestApp::new();
    let owner = UserId::new();
    let project = app.seed_project(owner, "Alpha").await;

    for i in 0..5 {
        let version = app
            .orchestrator
            .record(
                &project,
                owner,
                VersionAction::Manual,
                format!("save {i}"),
                None,
            )
            .await
            .expect("record");
        assert_eq!(version.label, format!("v{}", i + 2));
        assert!(version.is_latest);
    }

    let rows = app.versions.all_for_project(project.id);
    assert_eq!(rows.len(), 6);
    let mut labels: Vec<_> = rows.iter().map(|r| r.label.clone()).collect();
    labels.sort();
    labels.dedup();
    assert_eq!(labels.len(), 6);
    assert_eq!(rows.iter().filter(|r| r.is_latest).count(), 1);
}

#[tokio::test]
async fn test_new_version_takes_over_latest_flag() {
    let app = TestApp::new();
    let owner = UserId::new();
    let project = app.seed_project(owner, "Alpha").await;

    let v2 = app
        .orchestrator
        .record(&project, owner, VersionAction::Manual, "second", None)
        .await
        .expect("record");

    let rows = app.versions.all_for_project(project.id);
    let v1 = rows.iter().find(|r| r.label == "v1").expect("v1");
    assert!(!v1.is_latest);
    assert!(v2.is_latest);
}

#[tokio::test]
async fn test_snapshot_reflects_listing_at_creation_time() {
    let app = TestApp::new();
    let owner = UserId::new();
    let project = app.seed_project(owner, "Alpha").await;

    let rows = app.versions.all_for_project(project.id);
    assert_eq!(rows[0].snapshot.total_files, 0);

    let outcome = app
        .file_service
        .upload_files(
            owner,
            project.id,
            vec![
                IncomingUpload {
                    name: "main.rs".to_string(),
                    data: Bytes::from_static(b"fn main() {}"),
                },
                IncomingUpload {
                    name: "README.md".to_string(),
                    data: Bytes::from_static(b"# Alpha"),
                },
            ],
        )
        .await
        .expect("upload");

    let version = outcome.version.expect("version recorded");
    assert_eq!(version.snapshot.total_files, 2);
    let names: Vec<_> = version.snapshot.files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["main.rs", "README.md"]);

    // The earlier snapshot is untouched by the new upload.
    let rows = app.versions.all_for_project(project.id);
    let v1 = rows.iter().find(|r| r.label == "v1").expect("v1");
    assert_eq!(v1.snapshot.total_files, 0);
}

#[tokio::test]
async fn test_concurrent_appends_get_distinct_labels() {
    let app = TestApp::new();
    let owner = UserId::new();
    let project = app.seed_project(owner, "Alpha").await;

    let mut handles = Vec::new();
    for i in 0..24 {
        let orchestrator = app.orchestrator.clone();
        let project = project.clone();
        handles.push(tokio::spawn(async move {
            orchestrator
                .record(
                    &project,
                    owner,
                    VersionAction::Manual,
                    format!("concurrent {i}"),
                    None,
                )
                .await
        }));
    }
    for handle in handles {
        handle.await.expect("join").expect("record");
    }

    let rows = app.versions.all_for_project(project.id);
    assert_eq!(rows.len(), 25);
    let mut labels: Vec<_> = rows.iter().map(|r| r.label.clone()).collect();
    labels.sort();
    labels.dedup();
    assert_eq!(labels.len(), 25, "every append got a distinct label");
    assert_eq!(rows.iter().filter(|r| r.is_latest).count(), 1);
}

#[tokio::test]
async fn test_label_race_retry_recovers_sequentially() {
    let app = TestApp::new();
    let owner = UserId::new();
    let project = app.seed_project(owner, "Alpha").await;

    app.versions.force_conflicts(1);
    let version = app
        .orchestrator
        .record(&project, owner, VersionAction::Manual, "retried", None)
        .await
        .expect("record");
    assert_eq!(version.label, "v2");
}

#[tokio::test]
async fn test_exhausted_retries_fall_back_to_timestamp_label() {
    let app = TestApp::new();
    let owner = UserId::new();
    let project = app.seed_project(owner, "Alpha").await;

    app.versions.force_conflicts(3);
    let version = app
        .orchestrator
        .record(&project, owner, VersionAction::Manual, "contended", None)
        .await
        .expect("record succeeds via fallback");

    assert!(version.label.starts_with('v'));
    assert_ne!(version.label, "v2");
    assert!(
        version.label[1..].parse::<u64>().is_err(),
        "fallback label stays outside the sequence"
    );
    assert!(version.is_latest);

    // The fallback label does not disturb subsequent allocation.
    let next = app
        .orchestrator
        .record(&project, owner, VersionAction::Manual, "after", None)
        .await
        .expect("record");
    assert_eq!(next.label, "v2");
}

#[tokio::test]
async fn test_explicit_duplicate_label_is_rejected_not_retried() {
    let app = TestApp::new();
    let owner = UserId::new();
    let project = app.seed_project(owner, "Alpha").await;

    let err = app
        .orchestrator
        .record_with_label(&project, owner, "v1", "dup", None)
        .await
        .expect_err("duplicate label");
    assert_eq!(err.kind, codehub_core::error::ErrorKind::Validation);
    assert_eq!(err.message, "Version v1 already exists for this project");
}
