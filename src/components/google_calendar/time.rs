use super::models::EventTime;
use crate::error::{google_calendar_error, CommuteResult};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;

/// Calendar date an event time falls on, in the event's own offset
pub fn event_day(time: &EventTime) -> NaiveDate {
    match time {
        EventTime::Date(date) => *date,
        EventTime::DateTime(dt) => dt.date_naive(),
    }
}

/// Event time as a timestamp. All-day dates start at midnight in `tz`.
pub fn event_timestamp(time: &EventTime, tz: Tz) -> CommuteResult<DateTime<FixedOffset>> {
    match time {
        EventTime::DateTime(dt) => Ok(*dt),
        EventTime::Date(date) => {
            let midnight = date.and_time(NaiveTime::MIN);
            let local_dt = match tz.from_local_datetime(&midnight) {
                chrono::LocalResult::Single(dt) => dt,
                chrono::LocalResult::Ambiguous(earliest, _) => earliest,
                chrono::LocalResult::None => {
                    return Err(google_calendar_error(&format!(
                        "Midnight of {} does not exist in {}",
                        date, tz
                    )));
                }
            };
            Ok(local_dt.fixed_offset())
        }
    }
}

/// Last calendar date covered by an event ending at `end`.
///
/// All-day end dates are exclusive, and a timed end at exactly midnight
/// does not cover the day it lands on.
pub fn last_covered_day(end: &EventTime) -> NaiveDate {
    match end {
        EventTime::Date(date) => date.pred_opt().unwrap_or(*date),
        EventTime::DateTime(dt) => {
            let day = dt.date_naive();
            if dt.time() == NaiveTime::MIN {
                day.pred_opt().unwrap_or(day)
            } else {
                day
            }
        }
    }
}

/// Subtract whole minutes from a timestamp
pub fn minus_minutes(dt: DateTime<FixedOffset>, minutes: u32) -> DateTime<FixedOffset> {
    dt - Duration::minutes(i64::from(minutes))
}
