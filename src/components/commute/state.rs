use crate::components::google_maps::models::{Coordinates, Origin};
use chrono::NaiveDate;

/// Outcome of feeding an event's date to the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayTransition {
    NewDay,
    SameDay,
}

/// Where the user was last known to be, and until which day that holds
#[derive(Debug, Clone, PartialEq, Eq)]
struct KnownLocation {
    address: String,
    last_day: NaiveDate,
}

/// Day and location context carried from one event to the next.
///
/// A fresh state has no day and no location, so the first event always starts
/// a new day and routes from home.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripState {
    day: Option<NaiveDate>,
    location: Option<KnownLocation>,
}

impl TripState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Day currently being processed
    pub fn day(&self) -> Option<NaiveDate> {
        self.day
    }

    /// Address of the last located event, if still valid
    pub fn location(&self) -> Option<&str> {
        self.location.as_ref().map(|l| l.address.as_str())
    }

    /// Origin for the next route: the last location, else home
    pub fn origin(&self, home: Coordinates) -> Origin {
        match &self.location {
            Some(known) => Origin::Address(known.address.clone()),
            None => Origin::Home(home),
        }
    }

    /// Move the tracker to `day`.
    ///
    /// On a day change the location is forgotten, unless `carry_over_multi_day`
    /// is set and the event that established it still covers `day`.
    pub fn enter_day(self, day: NaiveDate, carry_over_multi_day: bool) -> (Self, DayTransition) {
        if self.day == Some(day) {
            return (self, DayTransition::SameDay);
        }

        let location = self
            .location
            .filter(|known| carry_over_multi_day && known.last_day >= day);

        (
            Self {
                day: Some(day),
                location,
            },
            DayTransition::NewDay,
        )
    }

    /// Record a visit to `address` by an event whose last covered day is `last_day`
    pub fn visit(self, address: &str, last_day: NaiveDate) -> Self {
        Self {
            location: Some(KnownLocation {
                address: address.to_string(),
                last_day,
            }),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME: Coordinates = Coordinates { lat: 40.0, lng: -74.0 };

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_first_event_starts_a_new_day_from_home() {
        let (state, transition) = TripState::new().enter_day(date(2), false);
        assert_eq!(transition, DayTransition::NewDay);
        assert_eq!(state.day(), Some(date(2)));
        assert_eq!(state.origin(HOME), Origin::Home(HOME));
    }

    #[test]
    fn test_same_day_keeps_location() {
        let (state, _) = TripState::new().enter_day(date(2), false);
        let state = state.visit("Office", date(2));
        let (state, transition) = state.enter_day(date(2), false);

        assert_eq!(transition, DayTransition::SameDay);
        assert_eq!(state.origin(HOME), Origin::Address("Office".to_string()));
    }

    #[test]
    fn test_new_day_resets_location() {
        let (state, _) = TripState::new().enter_day(date(2), false);
        let state = state.visit("Office", date(2));
        let (state, transition) = state.enter_day(date(3), false);

        assert_eq!(transition, DayTransition::NewDay);
        assert_eq!(state.location(), None);
        assert_eq!(state.origin(HOME), Origin::Home(HOME));
    }

    #[test]
    fn test_multi_day_event_resets_without_carry_over() {
        let (state, _) = TripState::new().enter_day(date(2), false);
        let state = state.visit("Conference Hotel", date(4));
        let (state, _) = state.enter_day(date(3), false);
        assert_eq!(state.location(), None);
    }

    #[test]
    fn test_multi_day_event_carries_over_when_enabled() {
        let (state, _) = TripState::new().enter_day(date(2), true);
        let state = state.visit("Conference Hotel", date(4));

        let (state, transition) = state.enter_day(date(3), true);
        assert_eq!(transition, DayTransition::NewDay);
        assert_eq!(state.location(), Some("Conference Hotel"));

        let (state, _) = state.enter_day(date(5), true);
        assert_eq!(state.location(), None);
    }

    #[test]
    fn test_single_day_event_does_not_carry_over() {
        let (state, _) = TripState::new().enter_day(date(2), true);
        let state = state.visit("Office", date(2));
        let (state, _) = state.enter_day(date(3), true);
        assert_eq!(state.location(), None);
    }
}
