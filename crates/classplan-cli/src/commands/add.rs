use crate::cli::AddCommand;
use crate::commands::session_data;
use crate::util::parse_status;
use anyhow::Result;
use classplan_core::repository::Repository;
use classplan_core::service::ScheduleService;
use owo_colors::{OwoColorize, Style};

pub async fn add_schedule<R: Repository>(service: &ScheduleService<R>, command: AddCommand) -> Result<()> {
    let mut data = session_data(&command.session, service.timezone())?;
    data.status = command.status.as_deref().map(parse_status).transpose()?;
    if command.inactive {
        data.is_active = Some(false);
    }

    let success_style = Style::new().green().bold();
    let info_style = Style::new().blue();

    if let Some(count) = command.repeat {
        data.recurrence_count = Some(count);
        let instances = service.create_recurring_schedules(data).await?;
        let Some(first) = instances.first() else {
            return Ok(());
        };
        println!(
            "{} Created {} weekly sessions for {}",
            "✓".style(success_style),
            instances.len(),
            first.class_id.bright_white().bold()
        );
        for instance in &instances {
            println!(
                "  {} #{} on {}",
                "→".style(info_style),
                instance.id.to_string().yellow(),
                instance.specific_date.map(|d| d.to_string()).unwrap_or_default()
            );
        }
        println!(
            "  {} Weekly instances are not checked for conflicts; run 'classplan check' first if unsure",
            "→".style(info_style)
        );
        return Ok(());
    }

    let entry = if command.one_time {
        service.create_one_time_schedule(data).await?
    } else {
        service.create_class_schedule(data).await?
    };

    let when = entry
        .specific_date
        .map_or_else(|| "every week".to_string(), |d| format!("on {}", d));
    println!(
        "{} Created session #{}: {} {}-{} {}",
        "✓".style(success_style),
        entry.id,
        entry.class_id.bright_white().bold(),
        entry.start_time.format("%H:%M"),
        entry.end_time.format("%H:%M"),
        when
    );
    Ok(())
}
