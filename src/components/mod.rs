use crate::error::CommuteResult;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};

pub mod commute;
pub mod google_calendar;
pub mod google_maps;

use google_calendar::models::{CalendarEvent, CalendarSummary, NewEvent};
use google_maps::models::{GeocodeResult, Origin, Route, TravelMode};

pub use commute::CommuteSynthesizer;
pub use google_calendar::GoogleCalendarClient;
pub use google_maps::GoogleMapsClient;

/// Time window and size limit for an event listing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventQuery {
    /// Only events ending after this instant
    pub time_min: Option<DateTime<FixedOffset>>,
    /// Only events starting before this instant
    pub time_max: Option<DateTime<FixedOffset>>,
    /// Upper bound on the number of returned events
    pub max_results: Option<u32>,
}

/// Calendar operations the commute synthesizer depends on.
///
/// Listings expand recurring events into single instances and are ordered by start time.
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// All calendars the authorized user can access
    async fn list_calendars(&self) -> CommuteResult<Vec<CalendarSummary>>;

    /// Events of one calendar matching `query`
    async fn list_events(&self, calendar_id: &str, query: &EventQuery) -> CommuteResult<Vec<CalendarEvent>>;

    /// Insert an event and return the identifier the provider assigned
    async fn insert_event(&self, calendar_id: &str, event: &NewEvent) -> CommuteResult<String>;
}

/// Geocoding and routing operations the commute synthesizer depends on
#[async_trait]
pub trait RoutingProvider: Send + Sync {
    /// Candidate matches for a free-text address; empty when nothing matches
    async fn geocode(&self, address: &str) -> CommuteResult<Vec<GeocodeResult>>;

    /// Route arriving at `destination` by `arrival`, or `None` when no route exists
    async fn directions(
        &self,
        origin: &Origin,
        destination: &str,
        mode: TravelMode,
        arrival: DateTime<FixedOffset>,
    ) -> CommuteResult<Option<Route>>;
}
