use crate::commands::{CommandContext, CommandResult};
use std::io::Write;

/// Print every calendar the authenticated user can access, one per line
pub async fn list_calendars<W: Write>(ctx: &mut CommandContext, out: &mut W) -> CommandResult {
    let calendars = ctx.directory.list_calendars().await?;
    tracing::debug!("Listing {} calendars", calendars.len());

    for calendar in calendars {
        writeln!(out, "{}", calendar)?;
    }

    Ok(())
}
