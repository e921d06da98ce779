//! Response assertions used by the conformance steps.
//!
//! JSON locations are addressed with JSON Pointer syntax (`/bookingdates/checkin`)
//! and appear verbatim in failure messages.

use std::time::Duration;

use booker_client::{ApiResponse, StatusCode};
use serde::Serialize;
use serde_json::Value;

use crate::errors::StepFailure;

#[cfg(test)]
#[path = "assertions_tests.rs"]
mod tests;

/// Longest body excerpt kept in a status failure.
const BODY_EXCERPT_CHARS: usize = 200;

/// Fails unless the response carries `expected`.
pub fn expect_status(response: &ApiResponse, expected: StatusCode) -> Result<(), StepFailure> {
    if response.status == expected {
        return Ok(());
    }

    Err(StepFailure::UnexpectedStatus {
        expected,
        actual: response.status,
        body: excerpt(&response.body),
    })
}

/// Like [`expect_status`], but reports 401/403 as an authorization failure.
pub fn expect_authorized_status(
    response: &ApiResponse,
    expected: StatusCode,
) -> Result<(), StepFailure> {
    if response.status != expected
        && matches!(response.status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
    {
        return Err(StepFailure::Unauthorized {
            status: response.status,
        });
    }
    expect_status(response, expected)
}

/// Fails when the response took `ceiling` or longer.
pub fn expect_faster_than(response: &ApiResponse, ceiling: Duration) -> Result<(), StepFailure> {
    if response.elapsed < ceiling {
        return Ok(());
    }

    Err(StepFailure::LatencyExceeded {
        ceiling_ms: u64::try_from(ceiling.as_millis()).unwrap_or(u64::MAX),
        actual_ms: response.elapsed_ms(),
    })
}

/// Returns the value at `pointer`, failing if it is absent or null.
pub fn expect_present<'a>(body: &'a Value, pointer: &str) -> Result<&'a Value, StepFailure> {
    match body.pointer(pointer) {
        Some(Value::Null) | None => Err(StepFailure::MissingField {
            path: pointer.to_string(),
        }),
        Some(value) => Ok(value),
    }
}

/// Returns the non-negative integer at `pointer`.
pub fn expect_u64(body: &Value, pointer: &str) -> Result<u64, StepFailure> {
    let value = expect_present(body, pointer)?;
    value.as_u64().ok_or_else(|| StepFailure::Assertion {
        path: pointer.to_string(),
        expected: "an integer".to_string(),
        actual: value.to_string(),
    })
}

/// Fails unless the value at `pointer` equals `expected`.
pub fn expect_json_eq<T>(body: &Value, pointer: &str, expected: T) -> Result<(), StepFailure>
where
    T: Into<Value>,
{
    let expected = expected.into();
    match body.pointer(pointer) {
        Some(actual) if *actual == expected => Ok(()),
        Some(actual) => Err(StepFailure::Assertion {
            path: pointer.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }),
        None => Err(StepFailure::MissingField {
            path: pointer.to_string(),
        }),
    }
}

/// Fails unless `actual` and `expected` serialize to the same JSON.
///
/// The failure names the first differing location.
pub fn expect_same<T: Serialize>(actual: &T, expected: &T) -> Result<(), StepFailure> {
    let actual = to_value(actual)?;
    let expected = to_value(expected)?;

    match first_difference(&expected, &actual, String::new()) {
        None => Ok(()),
        Some(difference) => Err(StepFailure::Assertion {
            path: if difference.path.is_empty() {
                "/".to_string()
            } else {
                difference.path
            },
            expected: describe(difference.expected),
            actual: describe(difference.actual),
        }),
    }
}

struct Difference<'a> {
    path: String,
    expected: Option<&'a Value>,
    actual: Option<&'a Value>,
}

fn first_difference<'a>(
    expected: &'a Value,
    actual: &'a Value,
    path: String,
) -> Option<Difference<'a>> {
    match (expected, actual) {
        (Value::Object(expected_map), Value::Object(actual_map)) => {
            for (key, expected_value) in expected_map {
                let child = format!("{}/{}", path, escape_pointer_token(key));
                match actual_map.get(key) {
                    Some(actual_value) => {
                        if let Some(diff) = first_difference(expected_value, actual_value, child) {
                            return Some(diff);
                        }
                    }
                    None => {
                        return Some(Difference {
                            path: child,
                            expected: Some(expected_value),
                            actual: None,
                        })
                    }
                }
            }
            actual_map
                .iter()
                .find(|(key, _)| !expected_map.contains_key(*key))
                .map(|(key, actual_value)| Difference {
                    path: format!("{}/{}", path, escape_pointer_token(key)),
                    expected: None,
                    actual: Some(actual_value),
                })
        }
        _ if expected == actual => None,
        _ => Some(Difference {
            path,
            expected: Some(expected),
            actual: Some(actual),
        }),
    }
}

fn escape_pointer_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

fn describe(value: Option<&Value>) -> String {
    value.map_or_else(|| "<absent>".to_string(), Value::to_string)
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, StepFailure> {
    serde_json::to_value(value).map_err(|e| StepFailure::Decode {
        message: e.to_string(),
    })
}

fn excerpt(body: &str) -> String {
    if body.chars().count() <= BODY_EXCERPT_CHARS {
        return body.to_string();
    }
    let truncated: String = body.chars().take(BODY_EXCERPT_CHARS).collect();
    format!("{}...", truncated)
}
