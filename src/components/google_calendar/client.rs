use super::models::{CalendarEvent, CalendarSummary, InsertedEvent, NewEvent};
use super::token::TokenManager;
use crate::components::{CalendarProvider, EventQuery};
use crate::error::{google_calendar_error, CommuteResult};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use url::Url;

/// Google Calendar API v3 root
pub const GOOGLE_CALENDAR_API: &str = "https://www.googleapis.com/calendar/v3";

/// Largest page the Calendar API serves
const MAX_PAGE_SIZE: u32 = 250;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Page<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    next_page_token: Option<String>,
}

/// Google Calendar REST client
#[derive(Debug, Clone)]
pub struct GoogleCalendarClient {
    token_manager: TokenManager,
    client: Client,
    base_url: String,
}

impl GoogleCalendarClient {
    pub fn new(token_manager: TokenManager) -> Self {
        Self {
            token_manager,
            client: Client::new(),
            base_url: GOOGLE_CALENDAR_API.to_string(),
        }
    }

    /// Point the client at a different API root
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    /// Build an endpoint URL from escaped path segments
    fn endpoint(&self, segments: &[&str]) -> CommuteResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| google_calendar_error(&format!("Failed to parse URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| google_calendar_error("Calendar API URL cannot have a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Fetch pages of `url` until the listing is exhausted or `limit` items were collected
    async fn fetch_pages<T: DeserializeOwned>(&self, url: Url, limit: Option<u32>, what: &str) -> CommuteResult<Vec<T>> {
        let access_token = self.token_manager.access_token().await?;
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut page_url = url.clone();
            let remaining = limit.map(|l| l.saturating_sub(items.len() as u32));
            let page_size = remaining.unwrap_or(MAX_PAGE_SIZE).min(MAX_PAGE_SIZE);
            {
                let mut query = page_url.query_pairs_mut();
                query.append_pair("maxResults", &page_size.to_string());
                if let Some(token) = &page_token {
                    query.append_pair("pageToken", token);
                }
            }

            debug!("{} request: {}", what, page_url);
            let response = self
                .client
                .get(page_url)
                .bearer_auth(&access_token)
                .send()
                .await
                .map_err(|e| google_calendar_error(&format!("{} request failed: {}", what, e)))?;
            let response = check_status(response, what).await?;

            let page: Page<T> = response
                .json()
                .await
                .map_err(|e| google_calendar_error(&format!("Failed to parse {} response: {}", what.to_lowercase(), e)))?;
            items.extend(page.items);

            if let Some(limit) = limit {
                if items.len() as u32 >= limit {
                    items.truncate(limit as usize);
                    break;
                }
            }
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(items)
    }
}

/// Turn a non-success response into an error carrying the status and body
async fn check_status(response: Response, what: &str) -> CommuteResult<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let error_body = response
        .text()
        .await
        .unwrap_or_else(|_| "Could not read error response".to_string());
    Err(google_calendar_error(&format!(
        "{} request failed: HTTP {} - {}",
        what, status, error_body
    )))
}

#[async_trait]
impl CalendarProvider for GoogleCalendarClient {
    async fn list_calendars(&self) -> CommuteResult<Vec<CalendarSummary>> {
        let url = self.endpoint(&["users", "me", "calendarList"])?;
        self.fetch_pages(url, None, "Calendar list").await
    }

    async fn list_events(&self, calendar_id: &str, query: &EventQuery) -> CommuteResult<Vec<CalendarEvent>> {
        let mut url = self.endpoint(&["calendars", calendar_id, "events"])?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("singleEvents", "true");
            pairs.append_pair("orderBy", "startTime");
            if let Some(time_min) = query.time_min {
                pairs.append_pair("timeMin", &time_min.to_rfc3339());
            }
            if let Some(time_max) = query.time_max {
                pairs.append_pair("timeMax", &time_max.to_rfc3339());
            }
        }

        self.fetch_pages(url, query.max_results, "Events").await
    }

    async fn insert_event(&self, calendar_id: &str, event: &NewEvent) -> CommuteResult<String> {
        let url = self.endpoint(&["calendars", calendar_id, "events"])?;
        let access_token = self.token_manager.access_token().await?;

        let response = self
            .client
            .post(url)
            .bearer_auth(&access_token)
            .json(event)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to insert event: {}", e)))?;
        let response = check_status(response, "Event insert").await?;

        let inserted: InsertedEvent = response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse insert response: {}", e)))?;

        Ok(inserted.id)
    }
}
