use anyhow::Result;
use classplan_core::error::CoreError;
use classplan_core::repository::Repository;
use classplan_core::service::ScheduleService;

use crate::cli::ShowCommand;
use crate::views::{print_json, table::display_schedule_detail};

pub async fn show_schedule<R: Repository>(service: &ScheduleService<R>, command: ShowCommand) -> Result<()> {
    let entry = service
        .get_class_schedule(command.id)
        .await?
        .ok_or_else(|| CoreError::NotFound(format!("Schedule with id {} not found", command.id)))?;

    if command.output.json {
        return print_json(&entry);
    }
    display_schedule_detail(&entry);
    Ok(())
}
