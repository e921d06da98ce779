//! Request and response models for the booking service.
//!
//! Field names follow the service's wire format exactly (`firstname`,
//! `totalprice`, `bookingdates`, ...) so the structs serialize without
//! rename attributes.

use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;

/// Username and password sent to `POST /auth`.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Opaque token returned by `POST /auth`.
///
/// Mutating calls send it as a `token` cookie. The value is never printed
/// through `Debug` so it stays out of logs.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Cookie` request header.
    pub fn cookie_header(&self) -> String {
        format!("token={}", self.0)
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

/// Body of a `POST /auth` response.
///
/// The service answers bad credentials with status 200 and a `reason`
/// instead of a `token`, so both fields are optional.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Server-assigned booking identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(u64);

impl BookingId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Check-in and check-out dates in `YYYY-MM-DD` form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDates {
    pub checkin: String,
    pub checkout: String,
}

impl BookingDates {
    pub fn new(checkin: impl Into<String>, checkout: impl Into<String>) -> Self {
        Self {
            checkin: checkin.into(),
            checkout: checkout.into(),
        }
    }
}

/// A complete booking, as sent on create and full update and as returned
/// by `GET /booking/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub firstname: String,
    pub lastname: String,
    pub totalprice: i64,
    pub depositpaid: bool,
    pub bookingdates: BookingDates,

    // The service drops this field from stored records when it is empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additionalneeds: Option<String>,
}

/// Merge-patch body for `PATCH /booking/{id}`.
///
/// Only the fields that are `Some` are serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub totalprice: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub depositpaid: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bookingdates: Option<BookingDates>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub additionalneeds: Option<String>,
}

impl BookingPatch {
    /// Patch that only changes the guest's first name.
    pub fn firstname(value: impl Into<String>) -> Self {
        Self {
            firstname: Some(value.into()),
            ..Default::default()
        }
    }

    /// Returns `base` with every field present in this patch replaced.
    ///
    /// This is the state a merge-patch is expected to leave on the server.
    pub fn apply_to(&self, base: &BookingRequest) -> BookingRequest {
        BookingRequest {
            firstname: self
                .firstname
                .clone()
                .unwrap_or_else(|| base.firstname.clone()),
            lastname: self
                .lastname
                .clone()
                .unwrap_or_else(|| base.lastname.clone()),
            totalprice: self.totalprice.unwrap_or(base.totalprice),
            depositpaid: self.depositpaid.unwrap_or(base.depositpaid),
            bookingdates: self
                .bookingdates
                .clone()
                .unwrap_or_else(|| base.bookingdates.clone()),
            additionalneeds: self
                .additionalneeds
                .clone()
                .or_else(|| base.additionalneeds.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Body of a `POST /booking` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedBooking {
    pub bookingid: BookingId,
    pub booking: BookingRequest,
}

/// One element of the `GET /booking` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BookingIdEntry {
    pub bookingid: BookingId,
}
