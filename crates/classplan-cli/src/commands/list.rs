use anyhow::Result;
use classplan_core::error::CoreError;
use classplan_core::repository::Repository;
use classplan_core::service::ScheduleService;

use crate::cli::{DayCommand, ListCommand, OutputArgs, RangeCommand};
use crate::util::parse_date;
use crate::views::{print_json, table::{display_schedules, display_terms}};

pub async fn list_schedules<R: Repository>(service: &ScheduleService<R>, command: ListCommand) -> Result<()> {
    // clap guarantees exactly one owner
    if command.term.is_some() && command.class_id.is_none() {
        return Err(CoreError::InvalidInput("--term requires --class".to_string()).into());
    }
    let entries = match (&command.class_id, command.lecturer, command.subject) {
        (Some(class_id), _, _) => match command.term {
            Some(term) => service.get_class_schedules_by_term(class_id, term).await?,
            None => service.get_class_schedules(class_id).await?,
        },
        (None, Some(lecturer), _) => service.get_lecturer_schedules(lecturer).await?,
        (None, None, Some(subject)) => service.get_subject_schedules(subject).await?,
        (None, None, None) => Vec::new(),
    };

    if command.output.json {
        return print_json(&entries);
    }
    display_schedules(&entries, service.today());
    Ok(())
}

pub async fn day_schedules<R: Repository>(service: &ScheduleService<R>, command: DayCommand) -> Result<()> {
    let date = match command.date.as_deref() {
        Some(input) => parse_date(input, service.timezone())?,
        None => service.today(),
    };
    let entries = service.get_class_schedules_by_date(&command.class_id, date).await?;

    if command.output.json {
        return print_json(&entries);
    }
    display_schedules(&entries, service.today());
    Ok(())
}

pub async fn range_schedules<R: Repository>(service: &ScheduleService<R>, command: RangeCommand) -> Result<()> {
    let tz = service.timezone();
    let from = parse_date(&command.from, tz)?;
    let to = parse_date(&command.to, tz)?;
    let entries = service
        .get_class_schedules_by_date_range(&command.class_id, from, to)
        .await?;

    if command.output.json {
        return print_json(&entries);
    }
    display_schedules(&entries, service.today());
    Ok(())
}

pub async fn list_terms<R: Repository>(service: &ScheduleService<R>, output: OutputArgs) -> Result<()> {
    let terms = service.get_available_term_ids().await?;
    if output.json {
        return print_json(&terms);
    }
    display_terms(&terms);
    Ok(())
}
