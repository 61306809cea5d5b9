use strum::{Display, EnumString};

use crate::BookingError;

/// Lifecycle status of a booking request.
///
/// `Pending` is the only state a chef can act on; `Accepted` and `Rejected`
/// are terminal. Archival (soft delete) is an orthogonal axis tracked on the
/// stored row, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum BookingStatus {
    Pending,
    Accepted,
    Rejected,
}

impl BookingStatus {
    /// Whether the owning chef has already decided this booking.
    pub fn is_decided(self) -> bool {
        !matches!(self, BookingStatus::Pending)
    }

    /// Validate a status change, returning the new status on success.
    pub fn transition(self, next: BookingStatus) -> Result<BookingStatus, BookingError> {
        match (self, next) {
            (BookingStatus::Pending, BookingStatus::Accepted)
            | (BookingStatus::Pending, BookingStatus::Rejected) => Ok(next),
            _ => Err(BookingError::InvalidTransition {
                from: self,
                to: next,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn pending_can_be_accepted_or_rejected() {
        assert_eq!(
            BookingStatus::Pending
                .transition(BookingStatus::Accepted)
                .unwrap(),
            BookingStatus::Accepted
        );
        assert_eq!(
            BookingStatus::Pending
                .transition(BookingStatus::Rejected)
                .unwrap(),
            BookingStatus::Rejected
        );
    }

    #[test]
    fn decided_states_are_terminal() {
        for decided in [BookingStatus::Accepted, BookingStatus::Rejected] {
            for next in [
                BookingStatus::Pending,
                BookingStatus::Accepted,
                BookingStatus::Rejected,
            ] {
                assert!(matches!(
                    decided.transition(next),
                    Err(BookingError::InvalidTransition { .. })
                ));
            }
        }
    }

    #[test]
    fn pending_cannot_reenter_pending() {
        assert!(BookingStatus::Pending
            .transition(BookingStatus::Pending)
            .is_err());
    }

    #[test]
    fn round_trips_through_strings() {
        assert_eq!(BookingStatus::Accepted.to_string(), "Accepted");
        assert_eq!(
            BookingStatus::from_str("Pending").unwrap(),
            BookingStatus::Pending
        );
        assert!(BookingStatus::from_str("Cancelled").is_err());
    }
}
