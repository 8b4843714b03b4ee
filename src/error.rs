use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(code(imbusy::io))]
    Io(#[from] std::io::Error),

    #[error("Failed to read timezone from {}: {}", .path.display(), .source)]
    #[diagnostic(
        code(imbusy::timezone),
        help("Set IMBUSY_TIMEZONE or `timezone` in imbusy.toml to override the system timezone")
    )]
    TimezoneFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Authorization failed: {0}")]
    #[diagnostic(
        code(imbusy::auth),
        help("Check that credentials.json holds a valid OAuth client for an installed app")
    )]
    Auth(String),

    #[error("Google Calendar API error: {0}")]
    #[diagnostic(code(imbusy::google_calendar))]
    Api(String),

    #[error("No calendar with {key} '{value}'")]
    #[diagnostic(
        code(imbusy::not_found),
        help("Run `imbusy --list-calendars` to see the calendars you can access")
    )]
    CalendarNotFound { key: String, value: String },

    #[error("Invalid {what} '{input}': {reason}")]
    #[diagnostic(code(imbusy::parse))]
    Parse {
        what: &'static str,
        input: String,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    #[diagnostic(code(imbusy::config))]
    Config(String),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(imbusy::serialization))]
    Serialization(String),
}

impl Error {
    /// Process exit status for this error's category
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Parse { .. } | Error::Config(_) => 2,
            Error::Auth(_) => 3,
            Error::Api(_) => 4,
            Error::CalendarNotFound { .. } => 5,
            Error::Io(_) | Error::TimezoneFile { .. } | Error::Serialization(_) => 1,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Api(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type AppResult<T> = Result<T, Error>;

/// Helper to create authorization errors
pub fn auth_error(message: &str) -> Error {
    Error::Auth(message.to_string())
}

/// Helper to create Google Calendar API errors
pub fn api_error(message: &str) -> Error {
    Error::Api(message.to_string())
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create parse errors for command line input
pub fn parse_error(what: &'static str, input: &str, reason: &str) -> Error {
    Error::Parse {
        what,
        input: input.to_string(),
        reason: reason.to_string(),
    }
}
