use crate::commands::{self, Cli, CommandContext};
use crate::components::google_calendar::GoogleAuthenticator;
use crate::components::CalendarDirectory;
use crate::config::Config;
use crate::error::{AppResult, Error};
use std::io;
use tracing::{debug, error};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging(verbose: bool) -> AppResult<()> {
    let default_filter = if verbose {
        "debug"
    } else {
        "warn,imbusy=info"
    };

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Config(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load and initialize the application config
pub fn load_config(cli: &Cli) -> AppResult<Config> {
    match Config::load(cli.config.as_deref()) {
        Ok(config) => {
            debug!("Loaded configuration: {:?}", config);
            Ok(config)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}

/// Wire up the calendar directory and run the requested command
pub async fn run(cli: Cli) -> AppResult<()> {
    let config = load_config(&cli)?;

    let authenticator = GoogleAuthenticator::new(config.clone());
    let directory = CalendarDirectory::new(Box::new(authenticator));
    let mut ctx = CommandContext::new(config, directory);

    let mut stdout = io::stdout();
    commands::run(cli, &mut ctx, &mut stdout).await
}
