use super::*;
use crate::errors::StepFailure;
use crate::runner::{Step, StepResult};
use booker_client::StatusCode;
use chrono::{TimeZone, Utc};
use serial_test::serial;
use std::time::Duration;
use uuid::Uuid;

fn sample_report() -> SuiteReport {
    SuiteReport {
        run_id: Uuid::nil(),
        started_at: Utc.with_ymd_and_hms(2024, 1, 1, 12, 30, 0).unwrap(),
        base_url: "http://localhost:3001".to_string(),
        results: vec![
            StepResult {
                step: Step::CreateBooking,
                outcome: StepOutcome::Passed,
                duration: Duration::from_millis(250),
            },
            StepResult {
                step: Step::DeleteBooking,
                outcome: StepOutcome::Failed(StepFailure::UnexpectedStatus {
                    expected: StatusCode::CREATED,
                    actual: StatusCode::OK,
                    body: "OK".to_string(),
                }),
                duration: Duration::from_millis(500),
            },
            StepResult {
                step: Step::ConfirmDeletion,
                outcome: StepOutcome::Blocked(
                    "delete-booking did not succeed for booking 7".to_string(),
                ),
                duration: Duration::ZERO,
            },
        ],
    }
}

fn render(report: &SuiteReport) -> String {
    String::from_utf8(render_markdown(report).unwrap()).unwrap()
}

#[test]
#[serial]
fn test_render_markdown_header_and_summary() {
    let markdown = render(&sample_report());

    assert!(markdown.starts_with("# Booking Service Conformance Report\n"));
    assert!(markdown.contains("- **Run**: 00000000-0000-0000-0000-000000000000"));
    assert!(markdown.contains("- **Started**: 2024-01-01 12:30:00 UTC"));
    assert!(markdown.contains("- **Service**: http://localhost:3001"));
    assert!(markdown.contains("| Total Steps | 3 |"));
    assert!(markdown.contains("| Passed | 1 |"));
    assert!(markdown.contains("| Failed | 1 |"));
    assert!(markdown.contains("| Blocked | 1 |"));
    assert!(markdown.contains("| Total Duration | 0.75s |"));
}

#[test]
#[serial]
fn test_render_markdown_step_details() {
    let markdown = render(&sample_report());

    assert!(markdown.contains("### ✅ Create Booking"));
    assert!(markdown.contains("### ❌ Delete Booking"));
    assert!(markdown.contains("- **Status**: FAIL"));
    assert!(markdown.contains("- **Error**: Expected status 201 Created but got 200 OK; body: OK"));
    assert!(markdown.contains("- **Status**: BLOCKED"));
    assert!(markdown.contains("- **Reason**: delete-booking did not succeed for booking 7"));
}

#[test]
#[serial]
fn test_write_report_creates_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("conformance-report.md");

    write_report(&sample_report(), &path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, render(&sample_report()));
}

#[test]
fn test_write_report_to_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("report.md");

    let result = write_report(&sample_report(), &path);
    assert!(matches!(result, Err(SuiteError::Report(_))));
}

#[test]
#[serial]
fn test_get_workflow_context_pr() {
    unsafe {
        std::env::set_var("GITHUB_REF", "refs/pull/456/merge");
    }
    let context = get_workflow_context();
    assert_eq!(context, "pr456");
    unsafe {
        std::env::remove_var("GITHUB_REF");
    }
}

#[test]
#[serial]
fn test_get_workflow_context_main_branch() {
    unsafe {
        std::env::set_var("GITHUB_REF", "refs/heads/master");
    }
    let context = get_workflow_context();
    assert_eq!(context, "main");
    unsafe {
        std::env::remove_var("GITHUB_REF");
    }
}

#[test]
#[serial]
fn test_get_workflow_context_feature_branch() {
    unsafe {
        std::env::set_var("GITHUB_REF", "refs/heads/feature/faster-ping");
    }
    let context = get_workflow_context();
    assert_eq!(context, "feature-faster-ping");
    unsafe {
        std::env::remove_var("GITHUB_REF");
    }
}

#[test]
#[serial]
fn test_get_workflow_context_local() {
    unsafe {
        std::env::remove_var("GITHUB_REF");
    }
    assert_eq!(get_workflow_context(), "local");
}
