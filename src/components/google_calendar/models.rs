use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Start or end of a calendar event: either an all-day date or a timestamp
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawEventTime")]
pub enum EventTime {
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventTime::Date(date) => write!(f, "{}", date),
            EventTime::DateTime(dt) => f.write_str(&dt.to_rfc3339()),
        }
    }
}

/// Wire shape of an event time as the Calendar API returns it
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEventTime {
    date: Option<NaiveDate>,
    date_time: Option<DateTime<FixedOffset>>,
}

impl TryFrom<RawEventTime> for EventTime {
    type Error = String;

    fn try_from(raw: RawEventTime) -> Result<Self, Self::Error> {
        match (raw.date, raw.date_time) {
            (None, Some(date_time)) => Ok(EventTime::DateTime(date_time)),
            (Some(date), None) => Ok(EventTime::Date(date)),
            (Some(_), Some(_)) => Err("event time has both date and dateTime".to_string()),
            (None, None) => Err("event time has neither date nor dateTime".to_string()),
        }
    }
}

/// Calendar event as listed by the Calendar API
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub summary: Option<String>,
    pub location: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
}

impl CalendarEvent {
    /// Summary text, or a placeholder for untitled events
    pub fn title(&self) -> &str {
        self.summary.as_deref().unwrap_or("(untitled)")
    }
}

/// Entry of the user's calendar list
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CalendarSummary {
    pub id: String,
    pub summary: Option<String>,
}

/// Reminder override on an inserted event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub method: String,
    pub minutes: u32,
}

impl Default for Reminder {
    fn default() -> Self {
        Self {
            method: "popup".to_string(),
            minutes: 15,
        }
    }
}

/// Timed boundary of an event body sent for insertion
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEventTime {
    pub date_time: String,
    pub time_zone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEventReminders {
    pub use_default: bool,
    pub overrides: Vec<Reminder>,
}

/// Event body for the Calendar API insert call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewEvent {
    pub summary: String,
    pub description: String,
    pub start: NewEventTime,
    pub end: NewEventTime,
    pub reminders: NewEventReminders,
}

/// Insert response; only the assigned identifier is of interest
#[derive(Debug, Clone, Deserialize)]
pub struct InsertedEvent {
    pub id: String,
}
