//! Booking payloads used by the conformance run.
//!
//! The default set reproduces the reference scenario: a booking for
//! Furkan Uzum is created, replaced by one for Gokhan Uzum, and then
//! renamed to `UpdatedName` through a partial update.

use booker_client::{BookingDates, BookingPatch, BookingRequest};

/// The three payloads a run submits, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingFixtures {
    /// Sent with `POST /booking`.
    pub original: BookingRequest,
    /// Sent with `PUT /booking/{id}`.
    pub replacement: BookingRequest,
    /// Sent with `PATCH /booking/{id}`.
    pub patch: BookingPatch,
}

impl Default for BookingFixtures {
    fn default() -> Self {
        Self {
            original: original_booking(),
            replacement: replacement_booking(),
            patch: name_patch(),
        }
    }
}

pub fn original_booking() -> BookingRequest {
    BookingRequest {
        firstname: "Furkan".to_string(),
        lastname: "Uzum".to_string(),
        totalprice: 111,
        depositpaid: true,
        bookingdates: BookingDates::new("2024-01-01", "2024-01-05"),
        additionalneeds: Some("Breakfast".to_string()),
    }
}

pub fn replacement_booking() -> BookingRequest {
    BookingRequest {
        firstname: "Gokhan".to_string(),
        lastname: "Uzum".to_string(),
        totalprice: 222,
        depositpaid: false,
        bookingdates: BookingDates::new("2024-01-10", "2024-01-15"),
        additionalneeds: Some("Lunch".to_string()),
    }
}

pub fn name_patch() -> BookingPatch {
    BookingPatch::firstname("UpdatedName")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_differ_in_every_replaced_field() {
        let fixtures = BookingFixtures::default();

        assert_ne!(fixtures.original.firstname, fixtures.replacement.firstname);
        assert_ne!(fixtures.original.totalprice, fixtures.replacement.totalprice);
        assert_ne!(fixtures.original.depositpaid, fixtures.replacement.depositpaid);
        assert_ne!(fixtures.original.bookingdates, fixtures.replacement.bookingdates);
        assert_ne!(
            fixtures.original.additionalneeds,
            fixtures.replacement.additionalneeds
        );
    }

    #[test]
    fn test_patch_only_renames() {
        let fixtures = BookingFixtures::default();
        let patched = fixtures.patch.apply_to(&fixtures.replacement);

        assert_eq!(patched.firstname, "UpdatedName");
        assert_eq!(patched.lastname, fixtures.replacement.lastname);
        assert_eq!(patched.totalprice, 222);
    }
}
