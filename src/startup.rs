use crate::components::commute::CommuteSettings;
use crate::components::google_calendar::TokenManager;
use crate::components::{CalendarProvider, CommuteSynthesizer, GoogleCalendarClient, GoogleMapsClient, RoutingProvider};
use crate::config::Config;
use crate::error::{other_error, CommuteResult, Error};
use chrono::{DateTime, FixedOffset, Utc};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn")),
        )
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the application config
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Totals over a whole run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub calendars_processed: usize,
    pub calendars_failed: usize,
    pub commutes_inserted: usize,
    pub events_skipped: usize,
}

/// Print every accessible calendar so the user can pick which ones to watch
pub async fn list_calendars(calendar: &dyn CalendarProvider) -> CommuteResult<()> {
    println!(
        "You need to specify the calendars to listen to in the environment variable CALENDARS_TO_LISTEN.\n\
         Here is a list of your calendars:"
    );
    for entry in calendar.list_calendars().await? {
        println!("{}: {}", entry.summary.as_deref().unwrap_or("(untitled)"), entry.id);
    }
    Ok(())
}

/// Process every calendar in turn.
///
/// A failing calendar is logged and counted; the remaining calendars still run.
pub async fn process_calendars(
    calendar: &dyn CalendarProvider,
    routing: &dyn RoutingProvider,
    settings: &CommuteSettings,
    calendar_ids: &[String],
    now: DateTime<FixedOffset>,
    max_events: u32,
) -> RunSummary {
    let synthesizer = CommuteSynthesizer::new(calendar, routing, settings);
    let mut summary = RunSummary::default();

    for calendar_id in calendar_ids {
        match synthesizer.process_calendar(calendar_id, now, max_events).await {
            Ok(report) => {
                info!(
                    "Finished {}: {} commute(s) added, {} event(s) skipped",
                    calendar_id,
                    report.inserted_count(),
                    report.skipped_count()
                );
                summary.calendars_processed += 1;
                summary.commutes_inserted += report.inserted_count();
                summary.events_skipped += report.skipped_count();
            }
            Err(e) => {
                error!("An error occurred while processing {}: {}", calendar_id, e);
                summary.calendars_failed += 1;
            }
        }
    }

    summary
}

/// Run once: list calendars when none are configured, otherwise add commutes
pub async fn run(config: Config) -> miette::Result<()> {
    let token_manager = TokenManager::new(
        config.token_path.clone(),
        &config.google_client_id,
        &config.google_client_secret,
    );
    let calendar = GoogleCalendarClient::new(token_manager);

    if config.is_listing_mode() {
        list_calendars(&calendar).await?;
        return Ok(());
    }

    let settings = config.commute_settings()?;
    let routing = GoogleMapsClient::new(config.maps_api_key()?);

    let now = Utc::now().fixed_offset();
    let summary = process_calendars(
        &calendar,
        &routing,
        &settings,
        &config.calendars,
        now,
        config.max_events,
    )
    .await;

    info!(
        "Run complete: {} commute(s) added across {} calendar(s)",
        summary.commutes_inserted, summary.calendars_processed
    );

    if summary.calendars_failed > 0 {
        return Err(other_error(&format!(
            "{} of {} calendar(s) failed",
            summary.calendars_failed,
            config.calendars.len()
        ))
        .into());
    }

    Ok(())
}
