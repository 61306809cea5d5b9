//! Read/write queries against the relational store, one module per
//! aggregate. Rows are plain `FromRow` structs; ownership and lifecycle
//! rules live in `chefbook_booking` and the route layer.

pub mod blog;
pub mod booking;
pub mod chef;
pub mod contact;
pub mod profile;
pub mod review;
pub mod user;

/// Current unix timestamp, the storage representation for audit columns.
pub(crate) fn now_ts() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}
