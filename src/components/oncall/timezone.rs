use crate::config::{Config, DEFAULT_TIMEZONE_FILE};
use crate::error::{config_error, AppResult, Error};
use chrono_tz::Tz;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

/// The system's configured timezone name from `/etc/timezone`
pub fn current_timezone() -> AppResult<String> {
    current_timezone_from(Path::new(DEFAULT_TIMEZONE_FILE))
}

/// Read a timezone name from `path`, trimmed of surrounding whitespace
pub fn current_timezone_from(path: &Path) -> AppResult<String> {
    let content = fs::read_to_string(path).map_err(|source| Error::TimezoneFile {
        path: path.to_path_buf(),
        source,
    })?;

    let timezone = content.trim();
    if timezone.is_empty() {
        return Err(Error::TimezoneFile {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidData, "file is empty"),
        });
    }

    Ok(timezone.to_string())
}

/// Timezone for new events: the configured override, else the timezone file
pub fn resolve_timezone(config: &Config) -> AppResult<String> {
    if let Some(timezone) = &config.timezone {
        timezone
            .parse::<Tz>()
            .map_err(|_| config_error(&format!("Unknown timezone '{}'", timezone)))?;
        debug!("Using configured timezone {}", timezone);
        return Ok(timezone.clone());
    }

    let timezone = current_timezone_from(&config.timezone_file)?;
    if timezone.parse::<Tz>().is_err() {
        warn!(
            "'{}' from {} is not a known IANA timezone",
            timezone,
            config.timezone_file.display()
        );
    }
    Ok(timezone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_current_timezone_from_trims() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timezone");
        fs::write(&path, "America/New_York\n").unwrap();

        assert_eq!(current_timezone_from(&path).unwrap(), "America/New_York");
    }

    #[test]
    fn test_current_timezone_reads_system_file() {
        let expected = current_timezone_from(Path::new(DEFAULT_TIMEZONE_FILE));
        match current_timezone() {
            Ok(timezone) => {
                assert_eq!(Some(timezone.as_str()), expected.as_deref().ok());
                assert!(!timezone.is_empty());
                assert_eq!(timezone, timezone.trim());
            }
            Err(err) => {
                assert!(expected.is_err());
                assert!(matches!(err, Error::TimezoneFile { .. }));
            }
        }
    }

    #[test]
    fn test_missing_timezone_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = current_timezone_from(&dir.path().join("timezone")).unwrap_err();

        assert!(matches!(err, Error::TimezoneFile { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_empty_timezone_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timezone");
        fs::write(&path, "  \n").unwrap();

        assert!(current_timezone_from(&path).is_err());
    }

    #[test]
    fn test_resolve_prefers_configured_timezone() {
        let config = Config {
            timezone: Some("Europe/Helsinki".to_string()),
            timezone_file: PathBuf::from("/nonexistent/timezone"),
            ..Config::default()
        };
        assert_eq!(resolve_timezone(&config).unwrap(), "Europe/Helsinki");
    }

    #[test]
    fn test_resolve_rejects_unknown_configured_timezone() {
        let config = Config {
            timezone: Some("Mars/Olympus_Mons".to_string()),
            ..Config::default()
        };
        let err = resolve_timezone(&config).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_resolve_reads_timezone_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timezone");
        fs::write(&path, "Etc/UTC\n").unwrap();

        let config = Config {
            timezone_file: path,
            ..Config::default()
        };
        assert_eq!(resolve_timezone(&config).unwrap(), "Etc/UTC");
    }
}
