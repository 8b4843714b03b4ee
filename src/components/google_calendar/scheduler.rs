use super::client::CalendarApi;
use super::models::Event;
use crate::error::AppResult;
use tracing::info;

/// Submit an event for creation in the given calendar
pub async fn schedule(api: &dyn CalendarApi, calendar_id: &str, event: &Event) -> AppResult<()> {
    api.insert_event(calendar_id, event).await?;
    info!("Created event '{}' in calendar {}", event.summary, calendar_id);
    Ok(())
}
