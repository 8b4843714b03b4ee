pub mod auth;
pub mod client;
pub mod directory;
pub mod models;
pub mod scheduler;
pub mod token;

pub use auth::GoogleAuthenticator;
pub use client::{CalendarApi, GoogleCalendarClient};
pub use directory::{Authenticator, CalendarDirectory, MatchKey};
pub use models::{Calendar, Event};
pub use scheduler::schedule;
