//! Calendar documents and their request shapes.

use serde::{Deserialize, Serialize};

use crate::error::{CalendarsError, CalendarsResult};

/// A stored calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Calendar {
    pub id: String,
    pub name: String,
}

/// Fields accepted when creating a calendar.
///
/// `name` is optional here so that a missing field reaches validation
/// instead of failing deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCalendar {
    pub name: Option<String>,
}

/// Partial update for a calendar. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalendarPatch {
    pub name: Option<String>,
}

impl NewCalendar {
    pub fn named(name: impl Into<String>) -> Self {
        NewCalendar {
            name: Some(name.into()),
        }
    }

    /// Returns the validated name.
    pub(crate) fn validate(&self) -> CalendarsResult<&str> {
        required_name(self.name.as_deref())
            .ok_or_else(|| CalendarsError::validation("calendars", "name"))
    }
}

impl CalendarPatch {
    /// A supplied name must still be non-empty.
    pub(crate) fn validate(&self) -> CalendarsResult<()> {
        match self.name.as_deref() {
            Some(name) if required_name(Some(name)).is_none() => {
                Err(CalendarsError::validation("calendars", "name"))
            }
            _ => Ok(()),
        }
    }

    /// For a full rename, where the name must be supplied.
    pub fn require_name(&self) -> CalendarsResult<&str> {
        required_name(self.name.as_deref())
            .ok_or_else(|| CalendarsError::validation("calendars", "name"))
    }
}

pub(crate) fn required_name(name: Option<&str>) -> Option<&str> {
    name.filter(|n| !n.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_calendar_requires_name() {
        assert!(NewCalendar::default().validate().is_err());
        assert!(NewCalendar::named("").validate().is_err());
        assert_eq!(NewCalendar::named("   ").validate().unwrap(), "   ");
        assert_eq!(NewCalendar::named("work").validate().unwrap(), "work");
    }

    #[test]
    fn test_patch_allows_missing_name_but_not_empty() {
        assert!(CalendarPatch::default().validate().is_ok());
        assert!(CalendarPatch { name: Some("".into()) }.validate().is_err());
        assert!(CalendarPatch { name: Some("home".into()) }.validate().is_ok());
    }

    #[test]
    fn test_patch_require_name() {
        assert!(CalendarPatch::default().require_name().is_err());
        assert!(CalendarPatch { name: Some("".into()) }.require_name().is_err());
        assert_eq!(CalendarPatch { name: Some(" ".into()) }.require_name().unwrap(), " ");
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let parsed: NewCalendar = serde_json::from_str(r#"{"nme": "missing"}"#).unwrap();
        assert!(parsed.name.is_none());
    }
}
