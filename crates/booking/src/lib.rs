//! Booking lifecycle rules.
//!
//! Pure domain logic for the booking marketplace: the status state machine,
//! schedule arithmetic over civil date/time, retention cutoffs for the
//! cleanup job, and the validation rules applied when a booking is created.
//! Persistence and HTTP live in the `chefbook` application crate; everything
//! here is side-effect free and unit testable.

mod error;
mod schedule;
mod status;

pub use error::BookingError;
pub use schedule::{retention_cutoff, Slot};
pub use status::BookingStatus;

/// Total price charged for a booking, fixed at creation time.
pub fn total_price(price_per_person: f64, person: u32) -> f64 {
    price_per_person * f64::from(person)
}

/// Create-time validation for a booking request.
///
/// A request is rejected when the party is empty, the date has already
/// passed, or a chef tries to book their own profile.
pub fn validate_request(
    customer_id: &str,
    chef_owner_id: &str,
    slot: Slot,
    person: u32,
    now: time::OffsetDateTime,
) -> Result<(), BookingError> {
    if person < 1 {
        return Err(BookingError::Validation(
            "Please select at least one guest.".into(),
        ));
    }
    if slot.date < now.date() {
        return Err(BookingError::Validation(
            "Booking date cannot be in the past.".into(),
        ));
    }
    if customer_id == chef_owner_id {
        return Err(BookingError::Validation(
            "You cannot book your own chef profile.".into(),
        ));
    }
    Ok(())
}

/// Only the owning chef may accept or reject a booking.
pub fn authorize_decision(actor_id: &str, chef_owner_id: &str) -> Result<(), BookingError> {
    if actor_id != chef_owner_id {
        return Err(BookingError::PermissionDenied(
            "You are not allowed to update this booking.".into(),
        ));
    }
    Ok(())
}

/// Self-service removal: the customer may archive their own booking once it
/// is in the past. The administrative path bypasses this rule.
pub fn authorize_self_removal(
    actor_id: &str,
    customer_id: &str,
    is_past: bool,
) -> Result<(), BookingError> {
    if actor_id != customer_id {
        return Err(BookingError::PermissionDenied(
            "You can only remove your own bookings.".into(),
        ));
    }
    if !is_past {
        return Err(BookingError::Validation(
            "Only past bookings can be removed from the list.".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn slot(date: &str, time: &str) -> Slot {
        Slot::parse(date, time).unwrap()
    }

    #[test]
    fn total_price_multiplies_per_person_rate() {
        assert_eq!(total_price(25.0, 3), 75.0);
        assert_eq!(total_price(19.5, 2), 39.0);
    }

    #[test]
    fn request_rejects_empty_party() {
        let now = datetime!(2026-08-01 12:00 UTC);
        let err = validate_request("cust", "chef", slot("2026-08-10", "18:00"), 0, now);
        assert!(matches!(err, Err(BookingError::Validation(_))));
    }

    #[test]
    fn request_rejects_past_date() {
        let now = datetime!(2026-08-01 12:00 UTC);
        let err = validate_request("cust", "chef", slot("2026-07-31", "18:00"), 2, now);
        assert!(matches!(err, Err(BookingError::Validation(_))));
    }

    #[test]
    fn request_allows_today() {
        let now = datetime!(2026-08-01 12:00 UTC);
        assert!(validate_request("cust", "chef", slot("2026-08-01", "18:00"), 2, now).is_ok());
    }

    #[test]
    fn request_rejects_self_booking() {
        let now = datetime!(2026-08-01 12:00 UTC);
        let err = validate_request("same", "same", slot("2026-08-10", "18:00"), 2, now);
        assert!(matches!(err, Err(BookingError::Validation(_))));
    }

    #[test]
    fn decision_requires_owning_chef() {
        assert!(authorize_decision("owner", "owner").is_ok());
        assert!(matches!(
            authorize_decision("intruder", "owner"),
            Err(BookingError::PermissionDenied(_))
        ));
    }

    #[test]
    fn self_removal_requires_owner_and_past() {
        assert!(authorize_self_removal("cust", "cust", true).is_ok());
        assert!(matches!(
            authorize_self_removal("other", "cust", true),
            Err(BookingError::PermissionDenied(_))
        ));
        assert!(matches!(
            authorize_self_removal("cust", "cust", false),
            Err(BookingError::Validation(_))
        ));
    }
}
