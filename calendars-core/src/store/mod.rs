//! Data access for calendars and events.
//!
//! Stores borrow the pool from [`Database`](crate::Database) and hand back
//! owned rows, so nothing a caller holds can reach back into stored state.

mod calendars;
mod events;

pub use calendars::CalendarStore;
pub use events::EventStore;

use uuid::Uuid;

/// Normalise a client-supplied id.
///
/// A malformed id can never match a stored document, so callers treat `None`
/// as "absent" rather than as an error.
pub(crate) fn parse_id(raw: &str) -> Option<String> {
    Uuid::parse_str(raw).ok().map(|id| id.to_string())
}

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}
