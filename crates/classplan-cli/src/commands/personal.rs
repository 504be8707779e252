use anyhow::Result;
use classplan_core::models::{NewPersonalEntryData, UpdatePersonalEntryData};
use classplan_core::repository::Repository;
use classplan_core::service::ScheduleService;
use owo_colors::{OwoColorize, Style};

use crate::cli::{
    PersonalAddCommand, PersonalEditCommand, PersonalListCommand, PersonalSubcommand,
    PersonalUpcomingCommand,
};
use crate::commands::delete::delete_personal;
use crate::util::{parse_datetime, parse_entry_type};
use crate::views::{print_json, table::display_personal};

pub async fn personal_command<R: Repository>(
    service: &ScheduleService<R>,
    command: PersonalSubcommand,
    default_user: i64,
) -> Result<()> {
    match command {
        PersonalSubcommand::Add(cmd) => add_entry(service, cmd, default_user).await,
        PersonalSubcommand::List(cmd) => list_entries(service, cmd, default_user).await,
        PersonalSubcommand::Edit(cmd) => edit_entry(service, cmd).await,
        PersonalSubcommand::Delete(cmd) => delete_personal(service, cmd).await,
        PersonalSubcommand::Upcoming(cmd) => upcoming_entries(service, cmd, default_user).await,
    }
}

async fn add_entry<R: Repository>(
    service: &ScheduleService<R>,
    command: PersonalAddCommand,
    default_user: i64,
) -> Result<()> {
    let tz = service.timezone();
    let data = NewPersonalEntryData {
        user_id: Some(command.user.unwrap_or(default_user)),
        title: Some(command.title),
        description: command.description,
        start_time: Some(parse_datetime(&command.start, tz)?),
        end_time: Some(parse_datetime(&command.end, tz)?),
        entry_type: command.entry_type.as_deref().map(parse_entry_type).transpose()?,
        location: command.location,
        color: command.color,
        is_recurring: command.recurring.is_some(),
        recurrence_pattern: command.recurring,
        reminder_minutes: command.reminder,
    };

    let entry = service.create_personal_entry(data).await?;
    println!(
        "{} Added '{}' ({}) on {}",
        "✓".style(Style::new().green().bold()),
        entry.title.bright_white().bold(),
        entry.entry_type,
        entry.start_time.format("%Y-%m-%d %H:%M")
    );
    Ok(())
}

async fn list_entries<R: Repository>(
    service: &ScheduleService<R>,
    command: PersonalListCommand,
    default_user: i64,
) -> Result<()> {
    let tz = service.timezone();
    let user_id = command.user.unwrap_or(default_user);

    let entries = match (command.entry_type.as_deref(), command.from.as_deref(), command.to.as_deref()) {
        (Some(kind), _, _) => {
            service
                .get_user_entries_by_type(user_id, parse_entry_type(kind)?)
                .await?
        }
        (None, Some(from), Some(to)) => {
            service
                .get_user_entries_by_date_range(user_id, parse_datetime(from, tz)?, parse_datetime(to, tz)?)
                .await?
        }
        _ => service.get_user_personal_entries(user_id).await?,
    };

    if command.output.json {
        return print_json(&entries);
    }
    display_personal(&entries, service.now_local());
    Ok(())
}

async fn edit_entry<R: Repository>(service: &ScheduleService<R>, command: PersonalEditCommand) -> Result<()> {
    let tz = service.timezone();

    let description = if command.description_clear {
        Some(None)
    } else {
        command.description.map(Some)
    };
    let location = if command.location_clear {
        Some(None)
    } else {
        command.location.map(Some)
    };
    let (is_recurring, recurrence_pattern) = if command.recurring_clear {
        (Some(false), Some(None))
    } else {
        match command.recurring {
            Some(pattern) => (Some(true), Some(Some(pattern))),
            None => (None, None),
        }
    };

    let update = UpdatePersonalEntryData {
        title: command.title,
        description,
        start_time: command.start.as_deref().map(|s| parse_datetime(s, tz)).transpose()?,
        end_time: command.end.as_deref().map(|s| parse_datetime(s, tz)).transpose()?,
        entry_type: command.entry_type.as_deref().map(parse_entry_type).transpose()?,
        location,
        color: command.color,
        is_recurring,
        recurrence_pattern,
        reminder_minutes: command.reminder,
    };

    let entry = service.update_personal_entry(command.id, update).await?;
    println!("{} Updated '{}'", "✓".green().bold(), entry.title.bright_white().bold());
    Ok(())
}

async fn upcoming_entries<R: Repository>(
    service: &ScheduleService<R>,
    command: PersonalUpcomingCommand,
    default_user: i64,
) -> Result<()> {
    let entries = service
        .get_upcoming_personal_entries(command.user.unwrap_or(default_user))
        .await?;

    if command.output.json {
        return print_json(&entries);
    }
    display_personal(&entries, service.now_local());
    Ok(())
}
