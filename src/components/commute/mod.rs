//! Commute synthesis: walks a calendar's upcoming events in order and inserts
//! a commute event before every located appointment that needs one.

pub mod guard;
pub mod planner;
pub mod state;
mod synthesizer;

pub use planner::{CommuteEvent, Decision, SkipReason, TravelEstimate};
pub use state::{DayTransition, TripState};
pub use synthesizer::{CalendarReport, CommuteSynthesizer, EventOutcome, EventReport};

use super::google_calendar::models::Reminder;
use super::google_maps::models::{Coordinates, TravelMode};
use chrono_tz::Tz;

/// Everything the synthesizer needs to know besides the providers
#[derive(Debug, Clone, PartialEq)]
pub struct CommuteSettings {
    /// Origin used when no earlier location is known for the day
    pub home: Coordinates,
    pub travel_mode: TravelMode,
    /// Minutes between the end of the commute and the start of the event
    pub buffer_minutes: u32,
    pub min_travel_minutes: Option<u32>,
    pub max_travel_minutes: Option<u32>,
    /// Summary substring marking an existing commute event
    pub marker: Option<String>,
    pub description: String,
    pub reminders: Vec<Reminder>,
    pub timezone: Tz,
    /// Keep the location across midnight while the event that set it is still going on
    pub carry_over_multi_day: bool,
}
