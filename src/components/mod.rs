// Export components
pub mod google_calendar;
pub mod oncall;

// Re-export the calendar directory
pub use google_calendar::CalendarDirectory;
