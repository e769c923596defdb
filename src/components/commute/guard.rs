use crate::components::google_calendar::models::CalendarEvent;
use crate::components::google_calendar::time::event_timestamp;
use crate::components::{CalendarProvider, EventQuery};
use crate::error::CommuteResult;
use chrono::{DateTime, Duration, FixedOffset};
use chrono_tz::Tz;
use tracing::debug;

/// How far back the guard looks for the preceding event
pub const LOOKBACK_HOURS: i64 = 24;

/// Events sharing the latest end at or before `before`.
///
/// Several events can end at the same instant; all of them count as immediately preceding.
pub fn preceding_events(events: &[CalendarEvent], before: DateTime<FixedOffset>, tz: Tz) -> Vec<&CalendarEvent> {
    let ended: Vec<(DateTime<FixedOffset>, &CalendarEvent)> = events
        .iter()
        .filter_map(|event| {
            let end = event_timestamp(&event.end, tz).ok()?;
            (end <= before).then_some((end, event))
        })
        .collect();

    let Some(latest) = ended.iter().map(|(end, _)| *end).max() else {
        return Vec::new();
    };
    ended
        .into_iter()
        .filter(|(end, _)| *end == latest)
        .map(|(_, event)| event)
        .collect()
}

/// Whether the event's summary contains the marker
pub fn has_marker(event: &CalendarEvent, marker: &str) -> bool {
    event
        .summary
        .as_deref()
        .is_some_and(|summary| summary.contains(marker))
}

/// Whether a commute already sits right before `target_start` in the calendar.
///
/// Without a marker there is nothing to detect and the answer is always `false`.
pub async fn commute_already_present(
    calendar: &dyn CalendarProvider,
    calendar_id: &str,
    target_start: DateTime<FixedOffset>,
    marker: Option<&str>,
    tz: Tz,
) -> CommuteResult<bool> {
    let Some(marker) = marker else {
        return Ok(false);
    };

    let query = EventQuery {
        time_min: Some(target_start - Duration::hours(LOOKBACK_HOURS)),
        time_max: Some(target_start),
        max_results: None,
    };
    let events = calendar.list_events(calendar_id, &query).await?;

    let present = preceding_events(&events, target_start, tz).into_iter().any(|event| {
        debug!("Previous event: {}", event.title());
        has_marker(event, marker)
    });
    Ok(present)
}
