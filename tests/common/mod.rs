#![allow(dead_code)]

use async_trait::async_trait;
use imbusy::components::google_calendar::models::{AccessRole, Calendar, Event};
use imbusy::components::google_calendar::{Authenticator, CalendarApi};
use imbusy::error::AppResult;
use std::sync::{Arc, Mutex};

/// What the mock calendar service has seen
#[derive(Debug, Default)]
pub struct Recorded {
    pub authentications: usize,
    pub list_requests: usize,
    pub inserted: Vec<(String, Event)>,
}

/// Mock Google Calendar session backed by a fixed calendar list
#[derive(Clone)]
pub struct MockCalendarApi {
    calendars: Vec<Calendar>,
    recorded: Arc<Mutex<Recorded>>,
}

#[async_trait]
impl CalendarApi for MockCalendarApi {
    async fn list_calendars(&self) -> AppResult<Vec<Calendar>> {
        self.recorded.lock().unwrap().list_requests += 1;
        Ok(self.calendars.clone())
    }

    async fn insert_event(&self, calendar_id: &str, event: &Event) -> AppResult<()> {
        self.recorded
            .lock()
            .unwrap()
            .inserted
            .push((calendar_id.to_string(), event.clone()));
        Ok(())
    }
}

/// Mock authenticator handing out `MockCalendarApi` sessions
#[derive(Clone, Default)]
pub struct MockAuthenticator {
    calendars: Vec<Calendar>,
    recorded: Arc<Mutex<Recorded>>,
}

impl MockAuthenticator {
    pub fn new(calendars: Vec<Calendar>) -> Self {
        Self {
            calendars,
            recorded: Arc::new(Mutex::new(Recorded::default())),
        }
    }

    /// Shared view of the calls made so far
    pub fn recorded(&self) -> Arc<Mutex<Recorded>> {
        Arc::clone(&self.recorded)
    }
}

#[async_trait]
impl Authenticator for MockAuthenticator {
    async fn authenticate(&self) -> AppResult<Box<dyn CalendarApi>> {
        self.recorded.lock().unwrap().authentications += 1;
        Ok(Box::new(MockCalendarApi {
            calendars: self.calendars.clone(),
            recorded: Arc::clone(&self.recorded),
        }))
    }
}

pub fn calendar(id: &str, summary: &str, access_role: AccessRole) -> Calendar {
    Calendar {
        id: id.to_string(),
        summary: summary.to_string(),
        time_zone: "Europe/Helsinki".to_string(),
        access_role,
    }
}

pub fn sample_calendars() -> Vec<Calendar> {
    vec![
        calendar("me@example.com", "Personal", AccessRole::Owner),
        calendar("oncall@group.calendar.google.com", "Team Oncall", AccessRole::Writer),
        calendar("holidays@group.v.calendar.google.com", "Holidays", AccessRole::Reader),
    ]
}
