use super::models::{Calendar, CalendarListResponse, Event};
use crate::error::{api_error, AppResult};
use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::{debug, info};
use url::Url;

/// Authenticated session against the calendar service
#[async_trait]
pub trait CalendarApi: Send + Sync {
    /// Fetch every calendar the authenticated identity can access
    async fn list_calendars(&self) -> AppResult<Vec<Calendar>>;

    /// Create an event in the given calendar
    async fn insert_event(&self, calendar_id: &str, event: &Event) -> AppResult<()>;
}

/// Google Calendar v3 REST client bound to one access token
#[derive(Clone)]
pub struct GoogleCalendarClient {
    client: Client,
    base_url: Url,
    access_token: String,
}

impl GoogleCalendarClient {
    pub fn new(base_url: &str, access_token: String) -> AppResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| api_error(&format!("Invalid API base URL '{}': {}", base_url, e)))?;

        Ok(Self {
            client: Client::new(),
            base_url,
            access_token,
        })
    }

    /// Append percent-encoded path segments to the base URL
    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| api_error("API base URL cannot hold a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn check_status(response: Response, action: &str) -> AppResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Could not read error response".to_string());
        Err(api_error(&format!(
            "Failed to {}: HTTP {} - {}",
            action, status, error_body
        )))
    }
}

#[async_trait]
impl CalendarApi for GoogleCalendarClient {
    async fn list_calendars(&self) -> AppResult<Vec<Calendar>> {
        let url = self.endpoint(&["users", "me", "calendarList"])?;
        debug!("Fetching calendar list from {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| api_error(&format!("Failed to fetch calendars: {}", e)))?;

        let response = Self::check_status(response, "fetch calendars").await?;

        let list: CalendarListResponse = response
            .json()
            .await
            .map_err(|e| api_error(&format!("Failed to parse calendar list: {}", e)))?;

        info!("Fetched {} calendars", list.items.len());
        Ok(list.items)
    }

    async fn insert_event(&self, calendar_id: &str, event: &Event) -> AppResult<()> {
        let url = self.endpoint(&["calendars", calendar_id, "events"])?;
        debug!("Inserting event into {}", url);

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.access_token)
            .json(event)
            .send()
            .await
            .map_err(|e| api_error(&format!("Failed to create event: {}", e)))?;

        Self::check_status(response, "create event").await?;
        Ok(())
    }
}
