use anyhow::Result;
use classplan_core::error::CoreError;
use classplan_core::repository::Repository;
use classplan_core::service::ScheduleService;
use dialoguer::Confirm;
use owo_colors::OwoColorize;

use crate::cli::DeleteCommand;

fn confirm(prompt: String) -> bool {
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .unwrap_or(false)
}

pub async fn delete_schedule<R: Repository>(service: &ScheduleService<R>, command: DeleteCommand) -> Result<()> {
    let entry = service
        .get_class_schedule(command.id)
        .await?
        .ok_or_else(|| CoreError::NotFound(format!("Schedule with id {} not found", command.id)))?;

    if !command.force {
        let when = entry
            .specific_date
            .map_or_else(|| "weekly".to_string(), |d| d.to_string());
        let prompt = format!(
            "Delete session #{} ({} {} {})?",
            entry.id,
            entry.class_id,
            when,
            entry.start_time.format("%H:%M")
        );
        if !confirm(prompt) {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    if service.delete_class_schedule(entry.id).await? {
        println!("{} Deleted session #{}", "✓".green().bold(), entry.id);
    }
    Ok(())
}

pub async fn delete_personal<R: Repository>(service: &ScheduleService<R>, command: DeleteCommand) -> Result<()> {
    let entry = service
        .get_personal_entry(command.id)
        .await?
        .ok_or_else(|| CoreError::NotFound(format!("Personal entry with id {} not found", command.id)))?;

    if !command.force && !confirm(format!("Delete '{}'?", entry.title)) {
        println!("Deletion cancelled.");
        return Ok(());
    }

    if service.delete_personal_entry(entry.id).await? {
        println!("{} Deleted '{}'", "✓".green().bold(), entry.title);
    }
    Ok(())
}
