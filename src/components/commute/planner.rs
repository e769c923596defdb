use super::CommuteSettings;
use crate::components::google_calendar::models::{
    CalendarEvent, NewEvent, NewEventReminders, NewEventTime, Reminder,
};
use crate::components::google_maps::models::Route;
use chrono::{DateTime, Duration, FixedOffset};
use chrono_tz::Tz;
use std::fmt;

/// Summary prefix of every synthesized commute
pub const COMMUTE_PREFIX: &str = "🚗 Commute to";

/// Why no commute was created for an event
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    NoLocation,
    InvalidLocation,
    CommuteAlreadyPresent,
    NoRoute,
    BelowMinimum { minutes: f64, min: u32 },
    AboveMaximum { minutes: f64, max: u32 },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoLocation => write!(f, "event has no location"),
            SkipReason::InvalidLocation => write!(f, "location could not be geocoded"),
            SkipReason::CommuteAlreadyPresent => write!(f, "previous event is already a commute"),
            SkipReason::NoRoute => write!(f, "no route to location"),
            SkipReason::BelowMinimum { minutes, min } => {
                write!(f, "travel time {:.1} min is less than {} minutes", minutes, min)
            }
            SkipReason::AboveMaximum { minutes, max } => {
                write!(f, "travel time {:.1} min is greater than {} minutes", minutes, max)
            }
        }
    }
}

/// Total travel time of a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TravelEstimate {
    pub total_seconds: i64,
}

impl TravelEstimate {
    pub fn from_route(route: &Route) -> Self {
        Self {
            total_seconds: route.total_duration_secs(),
        }
    }

    pub fn minutes(&self) -> f64 {
        self.total_seconds as f64 / 60.0
    }
}

/// Commute entry to be inserted before a target event
#[derive(Debug, Clone, PartialEq)]
pub struct CommuteEvent {
    pub target_id: String,
    pub summary: String,
    pub description: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub timezone: Tz,
    pub reminders: Vec<Reminder>,
}

impl CommuteEvent {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Insert body for the Calendar API
    pub fn to_new_event(&self) -> NewEvent {
        let time = |dt: DateTime<FixedOffset>| NewEventTime {
            date_time: dt.to_rfc3339(),
            time_zone: self.timezone.name().to_string(),
        };

        NewEvent {
            summary: self.summary.clone(),
            description: self.description.clone(),
            start: time(self.start),
            end: time(self.end),
            reminders: NewEventReminders {
                use_default: false,
                overrides: self.reminders.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Skip(SkipReason),
    Insert(CommuteEvent),
}

/// Apply the configured travel-time bounds; both are inclusive
pub fn check_thresholds(estimate: &TravelEstimate, settings: &CommuteSettings) -> Option<SkipReason> {
    let minutes = estimate.minutes();

    if let Some(min) = settings.min_travel_minutes {
        if minutes < f64::from(min) {
            return Some(SkipReason::BelowMinimum { minutes, min });
        }
    }
    if let Some(max) = settings.max_travel_minutes {
        if minutes > f64::from(max) {
            return Some(SkipReason::AboveMaximum { minutes, max });
        }
    }
    None
}

/// Decide whether a commute ending at `arrival` should be created for `target`
pub fn plan_commute(
    target: &CalendarEvent,
    arrival: DateTime<FixedOffset>,
    estimate: &TravelEstimate,
    settings: &CommuteSettings,
) -> Decision {
    if let Some(reason) = check_thresholds(estimate, settings) {
        return Decision::Skip(reason);
    }

    Decision::Insert(CommuteEvent {
        target_id: target.id.clone(),
        summary: format!("{} {}", COMMUTE_PREFIX, target.title()),
        description: settings.description.clone(),
        start: arrival - Duration::seconds(estimate.total_seconds),
        end: arrival,
        timezone: settings.timezone,
        reminders: settings.reminders.clone(),
    })
}
