use crate::commands::{CommandContext, CommandResult, OncallArgs};
use crate::components::google_calendar::{schedule, MatchKey};
use crate::components::oncall::{build_oncall_event_in, resolve_timezone};
use crate::utils::time::parse_start_time;
use std::io::Write;
use tracing::info;

/// Create an on-call shift event in the calendar named by `args.calendar`
pub async fn schedule_shift<W: Write>(
    args: OncallArgs,
    ctx: &mut CommandContext,
    out: &mut W,
) -> CommandResult {
    // Validate local input before the authorization flow starts
    let start = parse_start_time(&args.start)?;
    let timezone = resolve_timezone(&ctx.config)?;
    let event = build_oncall_event_in(start, &args.comment, args.hours, &timezone)?;

    let calendar = ctx
        .directory
        .resolve(MatchKey::DisplayName, &args.calendar)
        .await?;
    info!("Scheduling on-call shift in '{}' ({})", calendar.summary, calendar.id);

    let session = ctx.directory.authenticate().await?;
    schedule(session, &calendar.id, &event).await?;

    writeln!(out, "Scheduled \"{}\" in {}", event.summary, calendar.summary)?;
    Ok(())
}
