//! State shared between the steps of one run.

use booker_client::{AuthToken, BookingId, BookingRequest};

/// Explicit state threaded through the conformance steps.
///
/// Setup creates it with the auth token. The create step records the
/// booking id; later steps read it and keep `expected` in line with what
/// the service should currently store for that id.
#[derive(Debug, Clone)]
pub struct SuiteContext {
    token: AuthToken,
    booking: Option<TrackedBooking>,
}

/// The booking created during this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedBooking {
    pub id: BookingId,
    /// What the service should return for `id` right now.
    pub expected: BookingRequest,
    pub deleted: bool,
}

impl SuiteContext {
    pub fn new(token: AuthToken) -> Self {
        Self {
            token,
            booking: None,
        }
    }

    pub fn token(&self) -> &AuthToken {
        &self.token
    }

    pub fn booking(&self) -> Option<&TrackedBooking> {
        self.booking.as_ref()
    }

    pub fn booking_id(&self) -> Option<BookingId> {
        self.booking.as_ref().map(|b| b.id)
    }

    /// Records a newly created booking, replacing any previous one.
    pub fn track_booking(&mut self, id: BookingId, created: BookingRequest) {
        self.booking = Some(TrackedBooking {
            id,
            expected: created,
            deleted: false,
        });
    }

    /// Updates the state the service should now hold for the booking.
    pub fn set_expected(&mut self, expected: BookingRequest) {
        if let Some(booking) = self.booking.as_mut() {
            booking.expected = expected;
        }
    }

    pub fn mark_deleted(&mut self) {
        if let Some(booking) = self.booking.as_mut() {
            booking.deleted = true;
        }
    }
}
