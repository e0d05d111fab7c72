//! Core types for the calendars API.
//!
//! This crate provides the pieces shared by the HTTP server:
//! - `Calendar` and `Event` documents plus their create/patch request shapes
//! - `Database`, the explicitly opened and closed connection handle
//! - `CalendarStore` and `EventStore` for data access

pub mod calendar;
pub mod db;
pub mod error;
pub mod event;
pub mod store;

pub use calendar::{Calendar, CalendarPatch, NewCalendar};
pub use db::Database;
pub use error::{CalendarsError, CalendarsResult};
pub use event::{Event, EventPatch, NewEvent};
pub use store::{CalendarStore, EventStore};
