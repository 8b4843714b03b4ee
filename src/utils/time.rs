use crate::error::{parse_error, AppResult};
use chrono::{NaiveDateTime, TimeDelta};

/// Format of the `--start` argument
pub const START_TIME_FORMAT: &str = "%Y-%m-%d:%H:%M";

/// ISO-8601 local time without an offset suffix
pub const LOCAL_ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse a start time in `YYYY-MM-DD:HH:MM` format as naive local time
pub fn parse_start_time(time_str: &str) -> AppResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(time_str, START_TIME_FORMAT).map_err(|e| {
        parse_error(
            "start time",
            time_str,
            &format!("{} (expected YYYY-MM-DD:HH:MM)", e),
        )
    })
}

/// Format a naive local time as ISO-8601 without a timezone offset
pub fn format_local_iso(time: &NaiveDateTime) -> String {
    time.format(LOCAL_ISO_FORMAT).to_string()
}

/// Add a whole number of hours, which may be zero or negative
pub fn add_hours(start: NaiveDateTime, hours: i64) -> AppResult<NaiveDateTime> {
    TimeDelta::try_hours(hours)
        .and_then(|delta| start.checked_add_signed(delta))
        .ok_or_else(|| parse_error("shift duration", &hours.to_string(), "out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate, Timelike};

    #[test]
    fn test_parse_start_time() {
        let parsed = parse_start_time("2021-01-02:10:30").unwrap();
        assert_eq!(parsed.year(), 2021);
        assert_eq!(parsed.month(), 1);
        assert_eq!(parsed.day(), 2);
        assert_eq!(parsed.hour(), 10);
        assert_eq!(parsed.minute(), 30);

        let parsed = parse_start_time("2021-01-02:16:00").unwrap();
        assert_eq!(
            parsed,
            NaiveDate::from_ymd_opt(2021, 1, 2)
                .unwrap()
                .and_hms_opt(16, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_parse_start_time_rejects_other_formats() {
        // Invalid cases
        assert!(parse_start_time("2021-01-02 10:30").is_err()); // Space separator
        assert!(parse_start_time("2021-01-02T10:30").is_err()); // ISO separator
        assert!(parse_start_time("2021-13-02:10:30").is_err()); // Month out of range
        assert!(parse_start_time("2021-01-02:24:00").is_err()); // Hour out of range
        assert!(parse_start_time("2021-01-02").is_err()); // Missing time
        assert!(parse_start_time("").is_err());
        assert!(parse_start_time(" 2021-01-02:10:30 ").is_err()); // Surrounding whitespace
        assert!(parse_start_time("2021-01-02:10:30\n").is_err());

        let err = parse_start_time("tomorrow").unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("'tomorrow'"));
    }

    #[test]
    fn test_reformat_keeps_components() {
        for input in ["2021-01-02:10:30", "1999-12-31:23:59", "2024-02-29:00:00"] {
            let parsed = parse_start_time(input).unwrap();
            let formatted = format_local_iso(&parsed);
            assert_eq!(formatted, format!("{}T{}:00", &input[..10], &input[11..]));
        }
    }

    #[test]
    fn test_add_hours() {
        let start = parse_start_time("2021-01-01:14:00").unwrap();
        assert_eq!(
            format_local_iso(&add_hours(start, 168).unwrap()),
            "2021-01-08T14:00:00"
        );
        assert_eq!(add_hours(start, 0).unwrap(), start);
        assert_eq!(
            format_local_iso(&add_hours(start, -15).unwrap()),
            "2020-12-31T23:00:00"
        );
        assert!(add_hours(start, i64::MAX).is_err());
    }
}
