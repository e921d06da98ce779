//! The individual conformance checks.
//!
//! Each function performs one call (or a call plus a read-back) against the
//! booking service and asserts on the response. Steps never retry; any
//! deviation is returned as a [`StepFailure`].

use std::time::Duration;

use booker_client::{
    AuthResponse, AuthToken, BookingApi, BookingId, BookingIdEntry, BookingPatch, BookingRequest,
    CreatedBooking, Credentials, StatusCode,
};
use serde_json::Value;
use tracing::{debug, info};

use crate::assertions::{
    expect_authorized_status, expect_faster_than, expect_json_eq, expect_present, expect_same,
    expect_status, expect_u64,
};
use crate::context::{SuiteContext, TrackedBooking};
use crate::errors::StepFailure;

#[cfg(test)]
#[path = "steps_tests.rs"]
mod tests;

fn tracked(context: &SuiteContext) -> Result<&TrackedBooking, StepFailure> {
    context
        .booking()
        .ok_or_else(|| StepFailure::Precondition("no booking was created".to_string()))
}

fn live_booking(context: &SuiteContext) -> Result<&TrackedBooking, StepFailure> {
    let booking = tracked(context)?;
    if booking.deleted {
        return Err(StepFailure::Precondition(format!(
            "booking {} was already deleted",
            booking.id
        )));
    }
    Ok(booking)
}

/// Obtains an auth token and builds the run's context.
///
/// The service answers bad credentials with 200 and a `reason`, so a
/// missing token is checked separately from the status.
pub async fn setup(
    api: &dyn BookingApi,
    credentials: &Credentials,
) -> Result<SuiteContext, StepFailure> {
    let response = api.authenticate(credentials).await?;
    expect_status(&response, StatusCode::OK)?;

    let auth: AuthResponse = response.decode()?;
    match (auth.token, auth.reason) {
        (Some(token), _) if !token.trim().is_empty() => {
            info!(username = credentials.username, "Obtained auth token");
            Ok(SuiteContext::new(AuthToken::new(token)))
        }
        (_, Some(reason)) => Err(StepFailure::Assertion {
            path: "/token".to_string(),
            expected: "a non-empty token".to_string(),
            actual: format!("reason: {}", reason),
        }),
        _ => Err(StepFailure::MissingField {
            path: "/token".to_string(),
        }),
    }
}

/// `POST /booking`: expects 200, a non-null integer id, and the submitted
/// fields echoed back.
///
/// The id is tracked as soon as it is issued, so a bad echo still lets the
/// later steps run and delete the booking.
pub async fn create_booking(
    api: &dyn BookingApi,
    context: &mut SuiteContext,
    booking: &BookingRequest,
) -> Result<BookingId, StepFailure> {
    let response = api.create_booking(booking).await?;
    expect_status(&response, StatusCode::OK)?;

    let body = response.json()?;
    let id = BookingId::new(expect_u64(&body, "/bookingid")?);
    context.track_booking(id, booking.clone());
    info!(booking_id = %id, "Created booking");

    let created: CreatedBooking = response.decode()?;
    expect_same(&created.booking, booking)?;
    Ok(id)
}

/// `GET /booking`: expects 200 and an array of `{bookingid}` entries that
/// contains the tracked id.
///
/// The collection is shared with other clients, so only membership is
/// checked, never contents or order.
pub async fn list_booking_ids(
    api: &dyn BookingApi,
    context: &SuiteContext,
) -> Result<(), StepFailure> {
    let id = tracked(context)?.id;

    let response = api.list_booking_ids().await?;
    expect_status(&response, StatusCode::OK)?;

    let body = response.json()?;
    let entries = body.as_array().ok_or_else(|| StepFailure::Assertion {
        path: "/".to_string(),
        expected: "an array of booking ids".to_string(),
        actual: type_name(&body).to_string(),
    })?;

    for (index, entry) in entries.iter().enumerate() {
        expect_u64(entry, "/bookingid").map_err(|failure| match failure {
            StepFailure::MissingField { .. } => StepFailure::MissingField {
                path: format!("/{}/bookingid", index),
            },
            other => other,
        })?;
    }

    let listed: Vec<BookingIdEntry> = response.decode()?;
    debug!(count = listed.len(), booking_id = %id, "Listed booking ids");

    if !listed.iter().any(|entry| entry.bookingid == id) {
        return Err(StepFailure::Assertion {
            path: "/*/bookingid".to_string(),
            expected: format!("an entry with bookingid {}", id),
            actual: format!("{} entries without it", listed.len()),
        });
    }
    Ok(())
}

/// `GET /booking/{id}`: expects 200 and the names supplied at creation,
/// then the complete record.
pub async fn get_booking_by_id(
    api: &dyn BookingApi,
    context: &SuiteContext,
) -> Result<(), StepFailure> {
    let booking = live_booking(context)?;

    let response = api.get_booking(booking.id).await?;
    expect_status(&response, StatusCode::OK)?;

    let body = response.json()?;
    expect_json_eq(&body, "/firstname", booking.expected.firstname.as_str())?;
    expect_json_eq(&body, "/lastname", booking.expected.lastname.as_str())?;

    let record: BookingRequest = response.decode()?;
    expect_same(&record, &booking.expected)
}

/// `PUT /booking/{id}` with the token cookie: expects 200 and the new first
/// name, then reads the booking back to confirm the replacement stuck.
pub async fn update_booking(
    api: &dyn BookingApi,
    context: &mut SuiteContext,
    replacement: &BookingRequest,
) -> Result<(), StepFailure> {
    let id = live_booking(context)?.id;

    let response = api.update_booking(context.token(), id, replacement).await?;
    expect_authorized_status(&response, StatusCode::OK)?;
    context.set_expected(replacement.clone());

    let body = response.json()?;
    expect_json_eq(&body, "/firstname", replacement.firstname.as_str())?;

    let stored = read_back(api, id).await?;
    expect_same(&stored, replacement)?;

    info!(booking_id = %id, "Replaced booking");
    Ok(())
}

/// `PATCH /booking/{id}` with the token cookie: expects 200, the patched
/// first name, and every other field unchanged from the prior state.
pub async fn partial_update_booking(
    api: &dyn BookingApi,
    context: &mut SuiteContext,
    patch: &BookingPatch,
) -> Result<(), StepFailure> {
    let booking = live_booking(context)?;
    if patch.is_empty() {
        return Err(StepFailure::Precondition(
            "partial update has no fields to change".to_string(),
        ));
    }
    let id = booking.id;
    let expected = patch.apply_to(&booking.expected);

    let response = api.partial_update_booking(context.token(), id, patch).await?;
    expect_authorized_status(&response, StatusCode::OK)?;
    context.set_expected(expected.clone());

    let body = response.json()?;
    expect_json_eq(&body, "/firstname", expected.firstname.as_str())?;

    let record: BookingRequest = response.decode()?;
    expect_same(&record, &expected)?;

    info!(booking_id = %id, "Patched booking");
    Ok(())
}

/// `DELETE /booking/{id}` with the token cookie.
///
/// The service reports a successful delete with 201 Created; that is the
/// contract being checked, not 200 or 204.
pub async fn delete_booking(
    api: &dyn BookingApi,
    context: &mut SuiteContext,
) -> Result<(), StepFailure> {
    let id = live_booking(context)?.id;

    let response = api.delete_booking(context.token(), id).await?;
    expect_authorized_status(&response, StatusCode::CREATED)?;

    context.mark_deleted();
    info!(booking_id = %id, "Deleted booking");
    Ok(())
}

/// `GET /booking/{id}` after deletion: expects 404.
pub async fn confirm_deletion(
    api: &dyn BookingApi,
    context: &SuiteContext,
) -> Result<(), StepFailure> {
    let booking = tracked(context)?;
    if !booking.deleted {
        return Err(StepFailure::Precondition(format!(
            "booking {} was not deleted",
            booking.id
        )));
    }

    let response = api.get_booking(booking.id).await?;
    expect_status(&response, StatusCode::NOT_FOUND)
}

/// `GET /ping`: expects 201 within `ceiling`. Independent of all other
/// state.
pub async fn ping_health_check(api: &dyn BookingApi, ceiling: Duration) -> Result<(), StepFailure> {
    let response = api.ping().await?;
    expect_status(&response, StatusCode::CREATED)?;
    expect_faster_than(&response, ceiling)?;

    info!(elapsed_ms = response.elapsed_ms(), "Health check passed");
    Ok(())
}

async fn read_back(api: &dyn BookingApi, id: BookingId) -> Result<BookingRequest, StepFailure> {
    let response = api.get_booking(id).await?;
    expect_status(&response, StatusCode::OK)?;
    let body = response.json()?;
    expect_present(&body, "/firstname")?;
    Ok(response.decode()?)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
