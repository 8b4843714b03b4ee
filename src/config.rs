use crate::error::{config_error, AppResult};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Google client secrets file read at the first authentication
pub const DEFAULT_CREDENTIALS_PATH: &str = "credentials.json";
/// OS file holding the local IANA timezone name
pub const DEFAULT_TIMEZONE_FILE: &str = "/etc/timezone";
/// Base URL of the Google Calendar v3 REST API
pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";
/// Config file picked up from the working directory when present
pub const DEFAULT_CONFIG_PATH: &str = "imbusy.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Path to the OAuth client secrets (`credentials.json`)
    pub credentials_path: PathBuf,
    /// Where to persist OAuth tokens between runs; `None` re-authenticates every run
    pub token_cache_path: Option<PathBuf>,
    /// Timezone override; when unset the timezone file is read
    pub timezone: Option<String>,
    /// File holding the system timezone name
    pub timezone_file: PathBuf,
    /// Google Calendar API base URL
    pub api_base_url: String,
    /// Loopback port for the OAuth redirect, 0 picks a free port
    pub redirect_port: u16,
    /// Open the consent page in a browser automatically
    pub open_browser: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_PATH),
            token_cache_path: None,
            timezone: None,
            timezone_file: PathBuf::from(DEFAULT_TIMEZONE_FILE),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            redirect_port: 0,
            open_browser: true,
        }
    }
}

/// Optional overrides read from a TOML config file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    credentials_path: Option<PathBuf>,
    token_cache_path: Option<PathBuf>,
    timezone: Option<String>,
    timezone_file: Option<PathBuf>,
    api_base_url: Option<String>,
    redirect_port: Option<u16>,
    open_browser: Option<bool>,
}

impl Config {
    /// Load configuration from defaults, an optional config file and the environment
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let mut config = Config::default();

        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| env::var_os("IMBUSY_CONFIG").map(PathBuf::from));

        match explicit {
            Some(path) => {
                let content = fs::read_to_string(&path).map_err(|e| {
                    config_error(&format!("Failed to read {}: {}", path.display(), e))
                })?;
                config.merge(toml::from_str(&content)?);
                debug!("Loaded config file {}", path.display());
            }
            None => {
                if let Some(content) = read_optional(Path::new(DEFAULT_CONFIG_PATH))? {
                    config.merge(toml::from_str(&content)?);
                    debug!("Loaded config file {}", DEFAULT_CONFIG_PATH);
                }
            }
        }

        config.apply_env()?;

        Ok(config)
    }

    /// Build a configuration from TOML text layered over the defaults
    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        let mut config = Config::default();
        config.merge(toml::from_str(content)?);
        Ok(config)
    }

    fn merge(&mut self, file: ConfigFile) {
        if let Some(path) = file.credentials_path {
            self.credentials_path = path;
        }
        if file.token_cache_path.is_some() {
            self.token_cache_path = file.token_cache_path;
        }
        if file.timezone.is_some() {
            self.timezone = file.timezone;
        }
        if let Some(path) = file.timezone_file {
            self.timezone_file = path;
        }
        if let Some(url) = file.api_base_url {
            self.api_base_url = url;
        }
        if let Some(port) = file.redirect_port {
            self.redirect_port = port;
        }
        if let Some(open) = file.open_browser {
            self.open_browser = open;
        }
    }

    fn apply_env(&mut self) -> AppResult<()> {
        if let Ok(path) = env::var("IMBUSY_CREDENTIALS") {
            self.credentials_path = PathBuf::from(path);
        }
        if let Ok(path) = env::var("IMBUSY_TOKEN_CACHE") {
            self.token_cache_path = Some(PathBuf::from(path));
        }
        if let Ok(timezone) = env::var("IMBUSY_TIMEZONE") {
            self.timezone = Some(timezone);
        }
        if let Ok(path) = env::var("IMBUSY_TIMEZONE_FILE") {
            self.timezone_file = PathBuf::from(path);
        }
        if let Ok(url) = env::var("IMBUSY_API_URL") {
            self.api_base_url = url;
        }
        if let Ok(port) = env::var("IMBUSY_REDIRECT_PORT") {
            self.redirect_port = port
                .parse::<u16>()
                .map_err(|_| config_error("Invalid IMBUSY_REDIRECT_PORT format"))?;
        }
        if let Ok(open) = env::var("IMBUSY_OPEN_BROWSER") {
            self.open_browser = open
                .parse::<bool>()
                .map_err(|_| config_error("IMBUSY_OPEN_BROWSER must be true or false"))?;
        }
        Ok(())
    }
}

/// Read a config file that may be absent; any other read failure is an error
fn read_optional(path: &Path) -> AppResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(config_error(&format!(
            "Failed to read {}: {}",
            path.display(),
            e
        ))),
    }
}
