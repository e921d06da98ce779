use super::*;
use booker_client::{BookingDates, BookingRequest};
use serde_json::json;

fn response(status: StatusCode, body: &str, elapsed_ms: u64) -> ApiResponse {
    ApiResponse {
        url: "http://localhost/test".to_string(),
        status,
        body: body.to_string(),
        elapsed: Duration::from_millis(elapsed_ms),
    }
}

fn booking(firstname: &str) -> BookingRequest {
    BookingRequest {
        firstname: firstname.to_string(),
        lastname: "Uzum".to_string(),
        totalprice: 111,
        depositpaid: true,
        bookingdates: BookingDates::new("2024-01-01", "2024-01-05"),
        additionalneeds: Some("Breakfast".to_string()),
    }
}

#[test]
fn test_expect_status_match() {
    let response = response(StatusCode::CREATED, "Created", 5);
    assert!(expect_status(&response, StatusCode::CREATED).is_ok());
}

#[test]
fn test_expect_status_mismatch_reports_both_codes() {
    let response = response(StatusCode::OK, "OK", 5);

    match expect_status(&response, StatusCode::CREATED) {
        Err(StepFailure::UnexpectedStatus {
            expected,
            actual,
            body,
        }) => {
            assert_eq!(expected, StatusCode::CREATED);
            assert_eq!(actual, StatusCode::OK);
            assert_eq!(body, "OK");
        }
        other => panic!("Expected UnexpectedStatus, got {:?}", other),
    }
}

#[test]
fn test_expect_status_truncates_long_bodies() {
    let long_body = "x".repeat(1_000);
    let response = response(StatusCode::INTERNAL_SERVER_ERROR, &long_body, 5);

    match expect_status(&response, StatusCode::OK) {
        Err(StepFailure::UnexpectedStatus { body, .. }) => {
            assert_eq!(body.len(), BODY_EXCERPT_CHARS + 3);
            assert!(body.ends_with("..."));
        }
        other => panic!("Expected UnexpectedStatus, got {:?}", other),
    }
}

#[test]
fn test_expect_authorized_status_flags_forbidden() {
    let response = response(StatusCode::FORBIDDEN, "Forbidden", 5);

    let result = expect_authorized_status(&response, StatusCode::OK);
    assert!(matches!(
        result,
        Err(StepFailure::Unauthorized {
            status: StatusCode::FORBIDDEN
        })
    ));
}

#[test]
fn test_expect_authorized_status_other_codes_are_status_failures() {
    let response = response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed", 5);

    let result = expect_authorized_status(&response, StatusCode::OK);
    assert!(matches!(result, Err(StepFailure::UnexpectedStatus { .. })));
}

#[test]
fn test_expect_faster_than() {
    let fast = response(StatusCode::CREATED, "Created", 150);
    assert!(expect_faster_than(&fast, Duration::from_millis(20_000)).is_ok());

    let slow = response(StatusCode::CREATED, "Created", 20_000);
    match expect_faster_than(&slow, Duration::from_millis(20_000)) {
        Err(StepFailure::LatencyExceeded {
            ceiling_ms,
            actual_ms,
        }) => {
            assert_eq!(ceiling_ms, 20_000);
            assert_eq!(actual_ms, 20_000);
        }
        other => panic!("Expected LatencyExceeded, got {:?}", other),
    }
}

#[test]
fn test_expect_present_rejects_null_and_missing() {
    let body = json!({ "bookingid": null, "booking": {} });

    assert!(matches!(
        expect_present(&body, "/bookingid"),
        Err(StepFailure::MissingField { ref path }) if path == "/bookingid"
    ));
    assert!(matches!(
        expect_present(&body, "/token"),
        Err(StepFailure::MissingField { .. })
    ));
    assert!(expect_present(&body, "/booking").is_ok());
}

#[test]
fn test_expect_u64() {
    let body = json!({ "bookingid": 4021, "name": "x" });

    assert_eq!(expect_u64(&body, "/bookingid").unwrap(), 4021);
    assert!(matches!(
        expect_u64(&body, "/name"),
        Err(StepFailure::Assertion { .. })
    ));
}

#[test]
fn test_expect_json_eq() {
    let body = json!({ "firstname": "Gokhan", "bookingdates": { "checkin": "2024-01-10" } });

    assert!(expect_json_eq(&body, "/firstname", "Gokhan").is_ok());
    assert!(expect_json_eq(&body, "/bookingdates/checkin", "2024-01-10").is_ok());

    match expect_json_eq(&body, "/firstname", "Furkan") {
        Err(StepFailure::Assertion {
            path,
            expected,
            actual,
        }) => {
            assert_eq!(path, "/firstname");
            assert_eq!(expected, "\"Furkan\"");
            assert_eq!(actual, "\"Gokhan\"");
        }
        other => panic!("Expected Assertion, got {:?}", other),
    }

    assert!(matches!(
        expect_json_eq(&body, "/lastname", "Uzum"),
        Err(StepFailure::MissingField { .. })
    ));
}

#[test]
fn test_expect_same_identical_bookings() {
    assert!(expect_same(&booking("Furkan"), &booking("Furkan")).is_ok());
}

#[test]
fn test_expect_same_reports_first_differing_path() {
    let expected = booking("Furkan");
    let mut actual = booking("Furkan");
    actual.bookingdates.checkout = "2024-01-06".to_string();

    match expect_same(&actual, &expected) {
        Err(StepFailure::Assertion {
            path,
            expected,
            actual,
        }) => {
            assert_eq!(path, "/bookingdates/checkout");
            assert_eq!(expected, "\"2024-01-05\"");
            assert_eq!(actual, "\"2024-01-06\"");
        }
        other => panic!("Expected Assertion, got {:?}", other),
    }
}

#[test]
fn test_expect_same_reports_missing_optional_field() {
    let expected = booking("Furkan");
    let mut actual = booking("Furkan");
    actual.additionalneeds = None;

    match expect_same(&actual, &expected) {
        Err(StepFailure::Assertion { path, actual, .. }) => {
            assert_eq!(path, "/additionalneeds");
            assert_eq!(actual, "<absent>");
        }
        other => panic!("Expected Assertion, got {:?}", other),
    }
}
