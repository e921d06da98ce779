use super::*;
use std::error::Error as StdError;

#[test]
fn test_invalid_base_url_error() {
    let error = Error::InvalidBaseUrl {
        url: "not a url".to_string(),
        message: "relative URL without a base".to_string(),
    };

    assert_eq!(
        error.to_string(),
        "Invalid base URL 'not a url': relative URL without a base"
    );
    assert!(!error.is_transport());
    assert!(error.source().is_none());
}

#[test]
fn test_timeout_error() {
    let error = Error::Timeout {
        url: "http://localhost/ping".to_string(),
    };

    assert_eq!(error.to_string(), "Request to http://localhost/ping timed out");
    assert!(error.is_transport());
}

#[test]
fn test_transport_error() {
    let error = Error::Transport {
        url: "http://localhost/booking".to_string(),
        message: "connection refused".to_string(),
    };

    assert_eq!(
        error.to_string(),
        "Request to http://localhost/booking failed: connection refused"
    );
    assert!(error.is_transport());
}

#[test]
fn test_decode_error_is_not_transport() {
    let error = Error::Decode {
        url: "http://localhost/booking/1".to_string(),
        message: "expected value at line 1 column 1".to_string(),
    };

    assert!(!error.is_transport());
    assert!(error.to_string().contains("Failed to decode response"));
}

#[test]
fn test_error_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Error>();
}
