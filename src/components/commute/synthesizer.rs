use super::guard::commute_already_present;
use super::planner::{plan_commute, CommuteEvent, Decision, SkipReason, TravelEstimate};
use super::state::{DayTransition, TripState};
use super::CommuteSettings;
use crate::components::google_calendar::models::CalendarEvent;
use crate::components::google_calendar::time::{event_day, event_timestamp, last_covered_day, minus_minutes};
use crate::components::{CalendarProvider, EventQuery, RoutingProvider};
use crate::error::CommuteResult;
use chrono::{DateTime, FixedOffset};
use tracing::info;

/// What happened to one source event
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    Inserted { commute_id: String, commute: CommuteEvent },
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventReport {
    pub event_id: String,
    pub summary: String,
    pub outcome: EventOutcome,
}

/// Result of one pass over a calendar
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalendarReport {
    pub calendar_id: String,
    pub events: Vec<EventReport>,
}

impl CalendarReport {
    pub fn inserted_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e.outcome, EventOutcome::Inserted { .. }))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.events.len() - self.inserted_count()
    }
}

/// Inserts commute events into a calendar ahead of located appointments
pub struct CommuteSynthesizer<'a> {
    calendar: &'a dyn CalendarProvider,
    routing: &'a dyn RoutingProvider,
    settings: &'a CommuteSettings,
}

impl<'a> CommuteSynthesizer<'a> {
    pub fn new(
        calendar: &'a dyn CalendarProvider,
        routing: &'a dyn RoutingProvider,
        settings: &'a CommuteSettings,
    ) -> Self {
        Self {
            calendar,
            routing,
            settings,
        }
    }

    /// Process the next `max_events` events of a calendar starting from `now`.
    ///
    /// A provider error stops the pass; commutes inserted before it stay in the calendar.
    pub async fn process_calendar(
        &self,
        calendar_id: &str,
        now: DateTime<FixedOffset>,
        max_events: u32,
    ) -> CommuteResult<CalendarReport> {
        info!("Getting the upcoming events from {}", calendar_id);

        let query = EventQuery {
            time_min: Some(now),
            time_max: None,
            max_results: Some(max_events),
        };
        let events = self.calendar.list_events(calendar_id, &query).await?;
        if events.is_empty() {
            info!("No upcoming events found.");
        }

        let mut report = CalendarReport {
            calendar_id: calendar_id.to_string(),
            events: Vec::with_capacity(events.len()),
        };
        let mut state = TripState::new();

        for event in &events {
            let (next_state, outcome) = self.process_event(calendar_id, state, event).await?;
            state = next_state;
            report.events.push(EventReport {
                event_id: event.id.clone(),
                summary: event.title().to_string(),
                outcome,
            });
        }

        Ok(report)
    }

    /// Handle one event and return the state for the next one
    pub async fn process_event(
        &self,
        calendar_id: &str,
        state: TripState,
        event: &CalendarEvent,
    ) -> CommuteResult<(TripState, EventOutcome)> {
        let day = event_day(&event.start);
        let (state, transition) = state.enter_day(day, self.settings.carry_over_multi_day);
        if transition == DayTransition::NewDay {
            info!("New day: {}!", day);
        }
        info!("{} {}", event.start, event.title());

        let Some(location) = event.location.as_deref() else {
            info!("No location for event {}", event.title());
            return Ok((state, EventOutcome::Skipped(SkipReason::NoLocation)));
        };
        info!("Location: {}", location);

        let outcome = match self.decide(calendar_id, &state, event, location).await? {
            Decision::Skip(reason) => {
                info!("Not adding a commute event: {}", reason);
                EventOutcome::Skipped(reason)
            }
            Decision::Insert(commute) => {
                let commute_id = self
                    .calendar
                    .insert_event(calendar_id, &commute.to_new_event())
                    .await?;
                info!(
                    "Event added: {} ({}) from {} to {} before {}",
                    commute.summary, commute_id, commute.start, commute.end, commute.target_id
                );
                EventOutcome::Inserted { commute_id, commute }
            }
        };

        let state = state.visit(location, last_covered_day(&event.end));
        Ok((state, outcome))
    }

    /// Run the geocode, guard, routing and threshold checks for a located event
    async fn decide(
        &self,
        calendar_id: &str,
        state: &TripState,
        event: &CalendarEvent,
        location: &str,
    ) -> CommuteResult<Decision> {
        let candidates = self.routing.geocode(location).await?;
        let Some(best) = candidates.first() else {
            info!("Invalid location");
            return Ok(Decision::Skip(SkipReason::InvalidLocation));
        };
        info!(
            "Valid location: {}",
            best.formatted_address.as_deref().unwrap_or(location)
        );

        let settings = self.settings;
        let start = event_timestamp(&event.start, settings.timezone)?;

        let marker = settings.marker.as_deref();
        if commute_already_present(self.calendar, calendar_id, start, marker, settings.timezone).await? {
            return Ok(Decision::Skip(SkipReason::CommuteAlreadyPresent));
        }

        let arrival = minus_minutes(start, settings.buffer_minutes);
        let origin = state.origin(settings.home);
        info!("Routing from {} to {}", origin, location);

        let Some(route) = self
            .routing
            .directions(&origin, location, settings.travel_mode, arrival)
            .await?
        else {
            return Ok(Decision::Skip(SkipReason::NoRoute));
        };

        let estimate = TravelEstimate::from_route(&route);
        if route.summary.is_empty() {
            info!("Total time to get to location: {:.1} minutes.", estimate.minutes());
        } else {
            info!(
                "Total time to get to location via {}: {:.1} minutes.",
                route.summary,
                estimate.minutes()
            );
        }

        Ok(plan_commute(event, arrival, &estimate, settings))
    }
}
