use miette::Diagnostic;
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(commutecal::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(commutecal::config))]
    Config(String),

    #[error("Google Calendar API error: {0}")]
    #[diagnostic(code(commutecal::google_calendar))]
    GoogleCalendar(String),

    #[error("Google Maps API error: {0}")]
    #[diagnostic(code(commutecal::google_maps))]
    GoogleMaps(String),

    #[error("Token error: {0}")]
    #[diagnostic(
        code(commutecal::token),
        help("Run `get_calendar_token` to authorize access to your calendar")
    )]
    Token(String),

    #[error("HTTP error: {0}")]
    #[diagnostic(code(commutecal::http))]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    #[diagnostic(code(commutecal::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(commutecal::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(commutecal::other))]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type CommuteResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create Google Calendar errors
pub fn google_calendar_error(message: &str) -> Error {
    Error::GoogleCalendar(message.to_string())
}

/// Helper to create Google Maps errors
pub fn google_maps_error(message: &str) -> Error {
    Error::GoogleMaps(message.to_string())
}

/// Helper to create token errors
pub fn token_error(message: &str) -> Error {
    Error::Token(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
