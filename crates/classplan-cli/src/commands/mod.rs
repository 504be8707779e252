pub mod add;
pub mod calendar;
pub mod check;
pub mod delete;
pub mod edit;
pub mod list;
pub mod personal;
pub mod show;

use crate::cli::SessionArgs;
use crate::util::{parse_date, parse_time};
use anyhow::Result;
use chrono_tz::Tz;
use classplan_core::models::NewScheduleData;

/// Proposed session from command-line fields. Absent required fields stay
/// `None` so the engine can report them.
pub fn session_data(args: &SessionArgs, tz: Tz) -> Result<NewScheduleData> {
    Ok(NewScheduleData {
        subject_id: args.subject,
        class_id: args.class_id.clone(),
        lecturer_id: args.lecturer,
        start_time: args.start.as_deref().map(parse_time).transpose()?,
        end_time: args.end.as_deref().map(parse_time).transpose()?,
        specific_date: args.date.as_deref().map(|d| parse_date(d, tz)).transpose()?,
        room_id: args.room,
        building: args.building.clone(),
        term_id: args.term,
        ..Default::default()
    })
}
