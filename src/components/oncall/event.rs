use super::timezone::current_timezone;
use crate::components::google_calendar::models::{
    Event, EventDateTime, ReminderMethod, ReminderOverride, Reminders,
};
use crate::error::AppResult;
use crate::utils::time::{add_hours, format_local_iso};
use chrono::NaiveDateTime;

/// One week
pub const DEFAULT_SHIFT_HOURS: i64 = 168;

const EMAIL_REMINDER_MINUTES: [u32; 2] = [60 * 24 * 14, 60 * 24 * 7];
const POPUP_REMINDER_MINUTES: u32 = 60;

/// Fixed reminder policy for every on-call shift
pub fn oncall_reminders() -> Reminders {
    let mut overrides: Vec<ReminderOverride> = EMAIL_REMINDER_MINUTES
        .iter()
        .map(|&minutes| ReminderOverride {
            method: ReminderMethod::Email,
            minutes,
        })
        .collect();
    overrides.push(ReminderOverride {
        method: ReminderMethod::Popup,
        minutes: POPUP_REMINDER_MINUTES,
    });

    Reminders {
        use_default: false,
        overrides,
    }
}

/// Build an on-call event in the system timezone read from `/etc/timezone`
///
/// Library entry point for callers without a [`Config`](crate::config::Config);
/// the CLI resolves the timezone through its config first.
pub fn build_oncall_event(
    start: NaiveDateTime,
    comment: &str,
    duration_hours: i64,
) -> AppResult<Event> {
    let timezone = current_timezone()?;
    build_oncall_event_in(start, comment, duration_hours, &timezone)
}

/// Build an on-call event lasting `duration_hours` from `start` in `timezone`
pub fn build_oncall_event_in(
    start: NaiveDateTime,
    comment: &str,
    duration_hours: i64,
    timezone: &str,
) -> AppResult<Event> {
    let end = add_hours(start, duration_hours)?;

    let start_str = format_local_iso(&start);
    let end_str = format_local_iso(&end);

    Ok(Event {
        summary: format!("Oncall shift {}: {} - {}", comment, start_str, end_str),
        location: String::new(),
        start: EventDateTime {
            date_time: start_str,
            time_zone: timezone.to_string(),
        },
        end: EventDateTime {
            date_time: end_str,
            time_zone: timezone.to_string(),
        },
        recurrence: Vec::new(),
        attendees: Vec::new(),
        reminders: oncall_reminders(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_build_oncall_event() {
        let event = build_oncall_event_in(
            at(2021, 1, 1, 14),
            "unit test",
            DEFAULT_SHIFT_HOURS,
            "America/New_York",
        )
        .unwrap();

        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "summary": "Oncall shift unit test: 2021-01-01T14:00:00 - 2021-01-08T14:00:00",
                "location": "",
                "start": {"dateTime": "2021-01-01T14:00:00", "timeZone": "America/New_York"},
                "end": {"dateTime": "2021-01-08T14:00:00", "timeZone": "America/New_York"},
                "recurrence": [],
                "attendees": [],
                "reminders": {
                    "useDefault": false,
                    "overrides": [
                        {"method": "email", "minutes": 20160},
                        {"method": "email", "minutes": 10080},
                        {"method": "popup", "minutes": 60}
                    ]
                }
            })
        );
    }

    #[test]
    fn test_custom_duration_and_empty_comment() {
        let event = build_oncall_event_in(at(2021, 3, 1, 9), "", 12, "UTC").unwrap();

        assert_eq!(event.end.date_time, "2021-03-01T21:00:00");
        assert_eq!(
            event.summary,
            "Oncall shift : 2021-03-01T09:00:00 - 2021-03-01T21:00:00"
        );
    }

    #[test]
    fn test_zero_and_negative_durations_are_accepted() {
        let start = at(2021, 1, 1, 14);

        let event = build_oncall_event_in(start, "zero", 0, "UTC").unwrap();
        assert_eq!(event.start.date_time, event.end.date_time);

        let event = build_oncall_event_in(start, "negative", -24, "UTC").unwrap();
        assert_eq!(event.end.date_time, "2020-12-31T14:00:00");
    }

    #[test]
    fn test_reminders_do_not_depend_on_inputs() {
        let short = build_oncall_event_in(at(2021, 1, 1, 0), "a", 1, "UTC").unwrap();
        let long = build_oncall_event_in(at(2030, 6, 15, 12), "b", 1000, "Asia/Tokyo").unwrap();

        assert_eq!(short.reminders, long.reminders);
        assert_eq!(short.reminders, oncall_reminders());
        assert_eq!(short.reminders.overrides.len(), 3);
    }

    #[test]
    fn test_summary_carries_comment_verbatim() {
        let comment = "  Team Ä: primary (backup: @bob)  ";
        let event = build_oncall_event_in(at(2022, 7, 4, 8), comment, 48, "UTC").unwrap();
        assert!(event.summary.contains(comment));
        assert!(event.summary.contains("2022-07-04T08:00:00"));
        assert!(event.summary.contains("2022-07-06T08:00:00"));
    }

    #[test]
    fn test_build_oncall_event_uses_system_timezone() {
        let start = at(2021, 1, 1, 14);
        match current_timezone() {
            Ok(timezone) => {
                let event = build_oncall_event(start, "host", 24).unwrap();
                assert_eq!(event, build_oncall_event_in(start, "host", 24, &timezone).unwrap());
            }
            Err(_) => {
                let err = build_oncall_event(start, "host", 24).unwrap_err();
                assert!(matches!(err, crate::error::Error::TimezoneFile { .. }));
            }
        }
    }

    #[test]
    fn test_out_of_range_duration() {
        assert!(build_oncall_event_in(at(2021, 1, 1, 0), "", i64::MAX, "UTC").is_err());
    }
}
