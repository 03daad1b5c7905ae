use crate::backend::{ApprovalStatus, Backend, MemoryBackend, ProfileRepository, Role};
use crate::cli::commands::teacher::*;
use crate::cli::error::CliError;
use crate::test_support::profile;

fn seeded() -> MemoryBackend {
    let backend = MemoryBackend::new();
    let mut pending = profile("t-1", Role::Teacher, Some(ApprovalStatus::Pending));
    pending.full_name = Some("Rivka Cohen".to_string());
    backend.seed_profile(pending);
    backend.seed_profile(profile("t-2", Role::Teacher, Some(ApprovalStatus::Approved)));
    backend.seed_profile(profile("s-1", Role::Student, None));
    backend
}

#[test]
fn test_pending_display_falls_back_to_dashes() {
    let display = PendingTeacherDisplay::from(&profile("t-3", Role::Teacher, None));
    assert_eq!(display.id, "t-3");
    assert_eq!(display.name, "-");
    assert_eq!(display.email, "t-3@example.com");
    assert_eq!(display.created_at, "-");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_pending_table() {
    let backend = seeded();

    let output = list_pending(backend.profiles(), "table").await.unwrap();
    assert!(output.contains("Rivka Cohen"));
    assert!(output.contains("t-1@example.com"));
    assert!(!output.contains("t-2"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_pending_json() {
    let backend = seeded();

    let output = list_pending(backend.profiles(), "json").await.unwrap();
    let rows: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 1);
    assert_eq!(rows[0]["id"], "t-1");
    assert_eq!(rows[0]["approval_status"], "pending");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_pending_empty() {
    let backend = MemoryBackend::new();

    let output = list_pending(backend.profiles(), "table").await.unwrap();
    assert_eq!(output, "No teachers awaiting approval.");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_approve_and_reject() {
    let backend = seeded();

    let output = approve(backend.profiles(), "t-1").await.unwrap();
    assert_eq!(output, "✓ Teacher Rivka Cohen is now approved");

    let output = reject(backend.profiles(), "t-2").await.unwrap();
    assert_eq!(output, "✓ Teacher t-2@example.com is now rejected");

    let t2 = backend.profiles().get("t-2").await.unwrap();
    assert_eq!(t2.approval_status, Some(ApprovalStatus::Rejected));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_approve_rejects_non_teacher() {
    let backend = seeded();

    let err = approve(backend.profiles(), "s-1").await.unwrap_err();
    assert!(matches!(err, CliError::InvalidInput { .. }));

    let err = approve(backend.profiles(), "nobody").await.unwrap_err();
    assert!(matches!(err, CliError::Backend(ref e) if e.is_not_found()));
}
