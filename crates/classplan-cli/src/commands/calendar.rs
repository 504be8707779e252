use anyhow::Result;
use classplan_core::repository::Repository;
use classplan_core::service::ScheduleService;

use crate::cli::{TodayCommand, WeekCommand};
use crate::util::{parse_date, week_start_of};
use crate::views::{print_json, table::display_weekly};

pub async fn week_view<R: Repository>(
    service: &ScheduleService<R>,
    command: WeekCommand,
    default_user: i64,
) -> Result<()> {
    let week_start = match command.start.as_deref() {
        Some(input) => parse_date(input, service.timezone())?,
        None => week_start_of(service.today()),
    };
    let user_id = command.user.unwrap_or(default_user);
    let view = service
        .get_weekly_schedule(user_id, &command.class_id, week_start)
        .await?;

    if command.output.json {
        return print_json(&view);
    }
    display_weekly(&view);
    Ok(())
}

pub async fn today_view<R: Repository>(
    service: &ScheduleService<R>,
    command: TodayCommand,
    default_user: i64,
) -> Result<()> {
    let user_id = command.user.unwrap_or(default_user);
    let view = service.get_today_schedule(user_id, &command.class_id).await?;

    if command.output.json {
        return print_json(&view);
    }
    display_weekly(&view);
    Ok(())
}
