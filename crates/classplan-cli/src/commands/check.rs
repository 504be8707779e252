use crate::cli::CheckCommand;
use crate::commands::session_data;
use crate::views::{print_json, table::display_outcome};
use anyhow::Result;
use classplan_core::repository::Repository;
use classplan_core::service::ScheduleService;
use owo_colors::OwoColorize;

pub async fn check_schedule<R: Repository>(service: &ScheduleService<R>, command: CheckCommand) -> Result<()> {
    let data = session_data(&command.session, service.timezone())?;
    let outcome = service.check_conflicts(&data, command.exclude).await?;

    if command.output.json {
        return print_json(&outcome);
    }

    display_outcome(&outcome);
    if outcome.missing_fields {
        println!("{}", "Some required fields are missing.".yellow());
    } else if outcome.has_conflict() {
        println!("{}", "This session would be rejected.".red());
    } else {
        println!("{}", "No conflicts.".green());
    }
    Ok(())
}
