use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime, Time};

use crate::BookingError;

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");
const TIME_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[hour]:[minute]:[second]");

/// A booking's scheduled date and time of day, UTC.
///
/// Stored as ISO-8601 text columns so `(date, time)` tuple comparisons work
/// both here and in SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Slot {
    pub date: Date,
    pub time: Time,
}

impl Slot {
    /// Parse form/storage values. Accepts `HH:MM` (HTML time inputs) and
    /// `HH:MM:SS` (stored rows).
    pub fn parse(date: &str, time: &str) -> Result<Self, BookingError> {
        let date = Date::parse(date, DATE_FORMAT)
            .map_err(|_| BookingError::Validation("Please provide a valid date.".into()))?;

        // HTML time inputs omit seconds
        let normalized = if time.len() == 5 {
            format!("{time}:00")
        } else {
            time.to_string()
        };
        let time = Time::parse(&normalized, TIME_FORMAT)
            .map_err(|_| BookingError::Validation("Please provide a valid time.".into()))?;

        Ok(Slot { date, time })
    }

    pub fn from_datetime(at: OffsetDateTime) -> Self {
        Slot {
            date: at.date(),
            time: at.time(),
        }
    }

    pub fn scheduled_at(&self) -> PrimitiveDateTime {
        PrimitiveDateTime::new(self.date, self.time)
    }

    /// A booking is past once its scheduled moment is earlier than `now`.
    pub fn is_past(&self, now: OffsetDateTime) -> bool {
        self.scheduled_at().assume_utc() < now
    }

    pub fn date_string(&self) -> String {
        self.date
            .format(DATE_FORMAT)
            .unwrap_or_else(|_| self.date.to_string())
    }

    pub fn time_string(&self) -> String {
        self.time
            .format(TIME_FORMAT)
            .unwrap_or_else(|_| self.time.to_string())
    }
}

/// The moment before which past bookings become eligible for automatic
/// archival: `now - retention_days`, with sub-second noise dropped so the
/// stored `HH:MM:SS` comparison is exact.
pub fn retention_cutoff(now: OffsetDateTime, retention_days: u32) -> Slot {
    let cutoff = now - Duration::days(i64::from(retention_days));
    Slot {
        date: cutoff.date(),
        time: cutoff.time().replace_millisecond(0).unwrap_or(cutoff.time()),
    }
}
