use crate::components::commute::CommuteSettings;
use crate::components::google_calendar::models::Reminder;
use crate::components::google_maps::models::{Coordinates, TravelMode};
use crate::error::{config_error, env_error, CommuteResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Default description placed on synthesized commute events
pub const DEFAULT_EVENT_DESCRIPTION: &str = "Commute to event.";

/// Default timezone label for synthesized commute events
pub const DEFAULT_TIMEZONE: &str = "America/New_York";

/// Default number of upcoming events inspected per calendar
pub const DEFAULT_MAX_EVENTS: u32 = 10;

/// Default location of the OAuth token file
pub const DEFAULT_TOKEN_PATH: &str = "token.json";

/// Main configuration structure
#[derive(Debug, Clone)]
pub struct Config {
    /// Calendar IDs to process; empty means listing mode
    pub calendars: Vec<String>,
    /// Google OAuth client ID
    pub google_client_id: String,
    /// Google OAuth client secret
    pub google_client_secret: String,
    /// Google Maps API key
    pub google_maps_api_key: Option<String>,
    /// Fallback origin when no prior location is known
    pub home: Option<Coordinates>,
    /// Routing mode
    pub travel_mode: TravelMode,
    /// Minutes subtracted from an event start before routing
    pub buffer_minutes: u32,
    /// Minimum travel time in minutes for a commute to be added
    pub min_travel_minutes: Option<u32>,
    /// Maximum travel time in minutes for a commute to be added
    pub max_travel_minutes: Option<u32>,
    /// Marker that identifies an already existing commute event
    pub marker: Option<String>,
    /// Description of synthesized commute events
    pub event_description: String,
    /// Reminder overrides for synthesized commute events
    pub reminders: Vec<Reminder>,
    /// Timezone label for synthesized events and all-day event dates
    pub timezone: Tz,
    /// Lookahead count per calendar
    pub max_events: u32,
    /// Path of the OAuth token file
    pub token_path: PathBuf,
    /// Keep the location across a day change while a multi-day event is ongoing
    pub carry_over_multi_day: bool,
}

impl Config {
    /// Load configuration from the environment, reading `.env` first if present
    pub fn load() -> CommuteResult<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> CommuteResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let calendars = get("CALENDARS_TO_LISTEN")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let google_client_id = get("GOOGLE_CLIENT_ID").ok_or_else(|| env_error("GOOGLE_CLIENT_ID"))?;
        let google_client_secret =
            get("GOOGLE_CLIENT_SECRET").ok_or_else(|| env_error("GOOGLE_CLIENT_SECRET"))?;
        let google_maps_api_key = get("GOOGLE_MAPS_API_KEY");

        let home = match (get("HOME_LAT"), get("HOME_LNG")) {
            (Some(lat), Some(lng)) => Some(Coordinates {
                lat: parse_value::<f64>("HOME_LAT", &lat)?,
                lng: parse_value::<f64>("HOME_LNG", &lng)?,
            }),
            (None, None) => None,
            _ => return Err(config_error("HOME_LAT and HOME_LNG must be set together")),
        };

        let travel_mode = match get("TRAVEL_MODE") {
            Some(mode) => TravelMode::from_str(&mode)?,
            None => TravelMode::default(),
        };

        let buffer_minutes = get("TIME_BUFFER")
            .map(|v| parse_value::<u32>("TIME_BUFFER", &v))
            .transpose()?
            .unwrap_or(0);
        let min_travel_minutes = get("MIN_TRAVEL_TIME")
            .map(|v| parse_value::<u32>("MIN_TRAVEL_TIME", &v))
            .transpose()?;
        let max_travel_minutes = get("MAX_TRAVEL_TIME")
            .map(|v| parse_value::<u32>("MAX_TRAVEL_TIME", &v))
            .transpose()?;

        // The marker is matched as a raw substring, so no trimming here
        let marker = lookup("CAR_EMOJI").filter(|v| !v.is_empty());

        let event_description =
            get("EVENT_DESCRIPTION").unwrap_or_else(|| DEFAULT_EVENT_DESCRIPTION.to_string());

        let reminders = match get("REMINDERS") {
            Some(raw) => parse_reminders(&raw)?,
            None => vec![Reminder::default()],
        };

        let timezone_name = get("TIMEZONE").unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
        let timezone = timezone_name
            .parse::<Tz>()
            .map_err(|_| config_error(&format!("Unknown TIMEZONE: {}", timezone_name)))?;

        let max_events = get("MAX_EVENTS")
            .map(|v| parse_value::<u32>("MAX_EVENTS", &v))
            .transpose()?
            .unwrap_or(DEFAULT_MAX_EVENTS);
        if max_events == 0 {
            return Err(config_error("MAX_EVENTS must be at least 1"));
        }

        let token_path = PathBuf::from(get("TOKEN_PATH").unwrap_or_else(|| DEFAULT_TOKEN_PATH.to_string()));

        let carry_over_multi_day = get("CARRY_OVER_MULTI_DAY")
            .map(|v| parse_bool("CARRY_OVER_MULTI_DAY", &v))
            .transpose()?
            .unwrap_or(false);

        Ok(Config {
            calendars,
            google_client_id,
            google_client_secret,
            google_maps_api_key,
            home,
            travel_mode,
            buffer_minutes,
            min_travel_minutes,
            max_travel_minutes,
            marker,
            event_description,
            reminders,
            timezone,
            max_events,
            token_path,
            carry_over_multi_day,
        })
    }

    /// Whether no calendars are configured and the run should only list calendars
    pub fn is_listing_mode(&self) -> bool {
        self.calendars.is_empty()
    }

    /// Google Maps API key, required whenever calendars are processed
    pub fn maps_api_key(&self) -> CommuteResult<&str> {
        self.google_maps_api_key
            .as_deref()
            .ok_or_else(|| env_error("GOOGLE_MAPS_API_KEY"))
    }

    /// Settings consumed by the commute synthesizer
    pub fn commute_settings(&self) -> CommuteResult<CommuteSettings> {
        let home = self
            .home
            .ok_or_else(|| env_error("HOME_LAT / HOME_LNG"))?;

        Ok(CommuteSettings {
            home,
            travel_mode: self.travel_mode,
            buffer_minutes: self.buffer_minutes,
            min_travel_minutes: self.min_travel_minutes,
            max_travel_minutes: self.max_travel_minutes,
            marker: self.marker.clone(),
            description: self.event_description.clone(),
            reminders: self.reminders.clone(),
            timezone: self.timezone,
            carry_over_multi_day: self.carry_over_multi_day,
        })
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> CommuteResult<T> {
    value
        .parse::<T>()
        .map_err(|_| config_error(&format!("Invalid {} value: {}", key, value)))
}

fn parse_bool(key: &str, value: &str) -> CommuteResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(config_error(&format!("Invalid {} value: {}", key, value))),
    }
}

/// Parse a JSON-encoded reminder override list
fn parse_reminders(raw: &str) -> CommuteResult<Vec<Reminder>> {
    serde_json::from_str(raw)
        .map_err(|e| config_error(&format!("REMINDERS must be a JSON list of {{\"method\", \"minutes\"}}: {}", e)))
}
