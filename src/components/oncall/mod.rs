pub mod event;
pub mod timezone;

pub use event::{build_oncall_event, build_oncall_event_in, DEFAULT_SHIFT_HOURS};
pub use timezone::{current_timezone, current_timezone_from, resolve_timezone};
