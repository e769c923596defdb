#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate};
use commutecal::components::commute::CommuteSettings;
use commutecal::components::google_calendar::models::{
    CalendarEvent, CalendarSummary, EventTime, NewEvent, Reminder,
};
use commutecal::components::google_maps::models::{
    Coordinates, GeocodeResult, Leg, Origin, Route, TextValue, TravelMode,
};
use commutecal::components::{CalendarProvider, EventQuery, RoutingProvider};
use commutecal::error::{google_calendar_error, google_maps_error, CommuteResult};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

pub const HOME: Coordinates = Coordinates { lat: 40.7128, lng: -74.006 };

pub fn at(s: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(s).unwrap()
}

/// Timed event; `location` may be omitted
pub fn event(id: &str, summary: &str, start: &str, end: &str, location: Option<&str>) -> CalendarEvent {
    CalendarEvent {
        id: id.to_string(),
        summary: Some(summary.to_string()),
        location: location.map(String::from),
        start: EventTime::DateTime(at(start)),
        end: EventTime::DateTime(at(end)),
    }
}

/// All-day event covering `start` up to, not including, `end`
pub fn all_day(id: &str, summary: &str, start: (i32, u32, u32), end: (i32, u32, u32), location: Option<&str>) -> CalendarEvent {
    let date = |(y, m, d): (i32, u32, u32)| NaiveDate::from_ymd_opt(y, m, d).unwrap();
    CalendarEvent {
        id: id.to_string(),
        summary: Some(summary.to_string()),
        location: location.map(String::from),
        start: EventTime::Date(date(start)),
        end: EventTime::Date(date(end)),
    }
}

pub fn settings() -> CommuteSettings {
    CommuteSettings {
        home: HOME,
        travel_mode: TravelMode::Driving,
        buffer_minutes: 0,
        min_travel_minutes: None,
        max_travel_minutes: None,
        marker: None,
        description: "Commute to event.".to_string(),
        reminders: vec![Reminder::default()],
        timezone: chrono_tz::America::New_York,
        carry_over_multi_day: false,
    }
}

/// Mock implementation of the calendar provider for testing
#[derive(Default)]
pub struct MockCalendar {
    /// Events per calendar, in start order
    pub events: HashMap<String, Vec<CalendarEvent>>,
    pub calendars: Vec<CalendarSummary>,
    /// Calendars whose listing fails
    pub failing: HashSet<String>,
    /// Number of inserts that succeed before every further insert fails
    pub insert_limit: Option<usize>,
    pub inserted: Mutex<Vec<(String, NewEvent)>>,
    pub queries: Mutex<Vec<(String, EventQuery)>>,
}

impl MockCalendar {
    pub fn with_events(calendar_id: &str, events: Vec<CalendarEvent>) -> Self {
        let mut mock = Self::default();
        mock.events.insert(calendar_id.to_string(), events);
        mock
    }

    pub fn inserted(&self) -> Vec<(String, NewEvent)> {
        self.inserted.lock().unwrap().clone()
    }

    /// Queries that carried an upper time bound, i.e. duplicate-guard lookups
    pub fn guard_queries(&self) -> usize {
        self.queries
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, q)| q.time_max.is_some())
            .count()
    }
}

#[async_trait]
impl CalendarProvider for MockCalendar {
    async fn list_calendars(&self) -> CommuteResult<Vec<CalendarSummary>> {
        Ok(self.calendars.clone())
    }

    async fn list_events(&self, calendar_id: &str, query: &EventQuery) -> CommuteResult<Vec<CalendarEvent>> {
        self.queries
            .lock()
            .unwrap()
            .push((calendar_id.to_string(), query.clone()));

        if self.failing.contains(calendar_id) {
            return Err(google_calendar_error("quota exceeded"));
        }

        let tz = chrono_tz::UTC;
        let start_of = |e: &CalendarEvent| commutecal::components::google_calendar::time::event_timestamp(&e.start, tz).unwrap();
        let end_of = |e: &CalendarEvent| commutecal::components::google_calendar::time::event_timestamp(&e.end, tz).unwrap();

        let mut events: Vec<CalendarEvent> = self
            .events
            .get(calendar_id)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|e| query.time_min.map_or(true, |min| end_of(e) > min))
            .filter(|e| query.time_max.map_or(true, |max| start_of(e) < max))
            .collect();

        if let Some(max) = query.max_results {
            events.truncate(max as usize);
        }
        Ok(events)
    }

    async fn insert_event(&self, calendar_id: &str, event: &NewEvent) -> CommuteResult<String> {
        let mut inserted = self.inserted.lock().unwrap();
        if self.insert_limit.is_some_and(|limit| inserted.len() >= limit) {
            return Err(google_calendar_error("insert rejected"));
        }
        inserted.push((calendar_id.to_string(), event.clone()));
        Ok(format!("commute-{}", inserted.len()))
    }
}

/// Recorded directions request
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionsCall {
    pub origin: Origin,
    pub destination: String,
    pub mode: TravelMode,
    pub arrival: DateTime<FixedOffset>,
}

/// Mock implementation of the routing provider for testing
#[derive(Default)]
pub struct MockRouting {
    /// Addresses that geocode to nothing
    pub invalid: HashSet<String>,
    /// Addresses with no route to them
    pub unreachable: HashSet<String>,
    /// Leg durations in seconds per destination; unknown destinations take one 30 minute leg
    pub legs: HashMap<String, Vec<i64>>,
    pub fail_directions: bool,
    pub geocoded: Mutex<Vec<String>>,
    pub calls: Mutex<Vec<DirectionsCall>>,
}

impl MockRouting {
    pub fn with_legs(mut self, destination: &str, legs: &[i64]) -> Self {
        self.legs.insert(destination.to_string(), legs.to_vec());
        self
    }

    pub fn with_invalid(mut self, address: &str) -> Self {
        self.invalid.insert(address.to_string());
        self
    }

    pub fn calls(&self) -> Vec<DirectionsCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RoutingProvider for MockRouting {
    async fn geocode(&self, address: &str) -> CommuteResult<Vec<GeocodeResult>> {
        self.geocoded.lock().unwrap().push(address.to_string());
        if self.invalid.contains(address) {
            return Ok(Vec::new());
        }
        Ok(vec![GeocodeResult {
            formatted_address: Some(address.to_string()),
        }])
    }

    async fn directions(
        &self,
        origin: &Origin,
        destination: &str,
        mode: TravelMode,
        arrival: DateTime<FixedOffset>,
    ) -> CommuteResult<Option<Route>> {
        self.calls.lock().unwrap().push(DirectionsCall {
            origin: origin.clone(),
            destination: destination.to_string(),
            mode,
            arrival,
        });

        if self.fail_directions {
            return Err(google_maps_error("OVER_QUERY_LIMIT"));
        }
        if self.unreachable.contains(destination) {
            return Ok(None);
        }

        let legs = self
            .legs
            .get(destination)
            .cloned()
            .unwrap_or_else(|| vec![1800]);
        Ok(Some(Route {
            summary: String::new(),
            legs: legs
                .into_iter()
                .map(|value| Leg {
                    duration: TextValue { value },
                })
                .collect(),
        }))
    }
}
