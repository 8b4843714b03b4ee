use super::client::CalendarApi;
use super::models::Calendar;
use crate::error::{auth_error, AppResult, Error};
use async_trait::async_trait;
use std::fmt;
use tracing::{debug, info};

/// Produces an authenticated calendar session
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self) -> AppResult<Box<dyn CalendarApi>>;
}

/// Calendar attribute a lookup matches against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKey {
    /// The calendar's summary
    DisplayName,
    Id,
}

impl MatchKey {
    fn value_of<'a>(&self, calendar: &'a Calendar) -> &'a str {
        match self {
            MatchKey::DisplayName => &calendar.summary,
            MatchKey::Id => &calendar.id,
        }
    }
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchKey::DisplayName => f.write_str("display name"),
            MatchKey::Id => f.write_str("id"),
        }
    }
}

/// The authenticated user's calendars, fetched at most once per directory
pub struct CalendarDirectory {
    authenticator: Box<dyn Authenticator>,
    session: Option<Box<dyn CalendarApi>>,
    calendars: Option<Vec<Calendar>>,
}

impl CalendarDirectory {
    pub fn new(authenticator: Box<dyn Authenticator>) -> Self {
        Self {
            authenticator,
            session: None,
            calendars: None,
        }
    }

    /// Authenticate on first use and return the session
    pub async fn authenticate(&mut self) -> AppResult<&dyn CalendarApi> {
        if self.session.is_none() {
            debug!("Authenticating against the calendar service");
            let session = self.authenticator.authenticate().await?;
            self.session = Some(session);
        }

        self.session
            .as_deref()
            .ok_or_else(|| auth_error("No authenticated session"))
    }

    /// All accessible calendars; later calls reuse the first fetch
    pub async fn list_calendars(&mut self) -> AppResult<&[Calendar]> {
        if self.calendars.is_none() {
            let calendars = self.authenticate().await?.list_calendars().await?;
            info!("Cached {} calendars", calendars.len());
            self.calendars = Some(calendars);
        }

        Ok(self.calendars.as_deref().unwrap_or_default())
    }

    /// First calendar in list order whose `key` equals `value` exactly
    pub async fn resolve(&mut self, key: MatchKey, value: &str) -> AppResult<Calendar> {
        self.list_calendars()
            .await?
            .iter()
            .find(|calendar| key.value_of(calendar) == value)
            .cloned()
            .ok_or_else(|| Error::CalendarNotFound {
                key: key.to_string(),
                value: value.to_string(),
            })
    }
}
