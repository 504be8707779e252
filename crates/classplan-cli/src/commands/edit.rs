use anyhow::Result;
use classplan_core::models::UpdateScheduleData;
use classplan_core::repository::Repository;
use classplan_core::service::ScheduleService;
use owo_colors::OwoColorize;

use crate::cli::EditCommand;
use crate::util::{parse_date, parse_status, parse_time};

/// `--x` sets, `--x-clear` nulls, neither leaves the field alone.
fn nullable<T>(value: Option<T>, clear: bool) -> Option<Option<T>> {
    if clear {
        Some(None)
    } else {
        value.map(Some)
    }
}

pub async fn edit_schedule<R: Repository>(service: &ScheduleService<R>, command: EditCommand) -> Result<()> {
    let tz = service.timezone();
    let date = command.date.as_deref().map(|d| parse_date(d, tz)).transpose()?;

    let is_active = if command.activate {
        Some(true)
    } else if command.deactivate {
        Some(false)
    } else {
        None
    };

    let update = UpdateScheduleData {
        subject_id: command.subject,
        class_id: command.class_id,
        lecturer_id: command.lecturer,
        start_time: command.start.as_deref().map(parse_time).transpose()?,
        end_time: command.end.as_deref().map(parse_time).transpose()?,
        specific_date: nullable(date, command.date_clear),
        room_id: nullable(command.room, command.room_clear),
        building: nullable(command.building, command.building_clear),
        status: command.status.as_deref().map(parse_status).transpose()?,
        term_id: nullable(command.term, command.term_clear),
        is_active,
    };

    if update.is_empty() {
        println!("{}", "Nothing to change.".yellow());
        return Ok(());
    }

    let entry = service.update_schedule(command.id, update).await?;
    println!(
        "{} Updated session #{}: {} {}-{}",
        "✓".green().bold(),
        entry.id,
        entry.class_id.bright_white().bold(),
        entry.start_time.format("%H:%M"),
        entry.end_time.format("%H:%M")
    );
    Ok(())
}
