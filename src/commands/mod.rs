use crate::components::oncall::DEFAULT_SHIFT_HOURS;
use crate::components::CalendarDirectory;
use crate::config::Config;
use crate::error::AppResult;
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

// Export submodules
pub mod calendar;
pub mod oncall;

#[derive(Parser, Debug)]
#[command(name = "imbusy")]
#[command(version, about = "Schedule on-call shifts on Google Calendar", long_about = None)]
pub struct Cli {
    /// Log all the things
    #[arg(long, global = true)]
    pub verbose: bool,

    /// List all available calendars
    #[arg(long)]
    pub list_calendars: bool,

    /// Path to a TOML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Schedule an oncall shift
    Oncall(OncallArgs),
}

#[derive(Args, Debug, Clone)]
pub struct OncallArgs {
    /// When does the event start (YYYY-MM-DD:HH:MM, local time)
    #[arg(short, long)]
    pub start: String,

    /// The name (summary) of the target Google calendar
    #[arg(short, long)]
    pub calendar: String,

    /// Additional comments to add to the created event
    #[arg(short = 'C', long, default_value = "")]
    pub comment: String,

    /// How long will the event last, in hours
    #[arg(short = 'H', long, default_value_t = DEFAULT_SHIFT_HOURS, allow_negative_numbers = true)]
    pub hours: i64,
}

/// Shared state for command handlers
pub struct CommandContext {
    pub config: Config,
    pub directory: CalendarDirectory,
}

impl CommandContext {
    pub fn new(config: Config, directory: CalendarDirectory) -> Self {
        Self { config, directory }
    }
}

/// Type alias for command result
pub type CommandResult = AppResult<()>;

/// Dispatch the parsed command line, writing user-facing output to `out`
pub async fn run<W: Write>(cli: Cli, ctx: &mut CommandContext, out: &mut W) -> CommandResult {
    if cli.list_calendars {
        return calendar::list_calendars(ctx, out).await;
    }

    match cli.command {
        Some(Command::Oncall(args)) => oncall::schedule_shift(args, ctx, out).await,
        None => {
            write!(out, "{}", Cli::command().render_help())?;
            Ok(())
        }
    }
}
