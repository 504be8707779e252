//! Expansion of a recurring session into dated weekly instances.
//!
//! The cadence is fixed: instance `i` falls on `anchor + 7 * i` days. The
//! anchor is the expansion day, never a date carried by the base entry.

use crate::error::CoreError;
use crate::models::{NewScheduleData, ScheduleEntry};
use crate::validation::{check_window, missing_fields};
use chrono::{Days, NaiveDate, Utc};

/// Batch size used when the caller gives none, or a non-positive one.
pub const DEFAULT_RECURRENCE_COUNT: i32 = 1;

/// Largest batch a single expansion may produce (ten years of weeks).
pub const MAX_RECURRENCE_COUNT: i32 = 520;

pub struct RecurrenceExpander;

impl RecurrenceExpander {
    /// Effective batch size for a requested count.
    #[inline]
    pub fn effective_count(requested: Option<i32>) -> i32 {
        match requested {
            Some(count) if count > 0 => count,
            _ => DEFAULT_RECURRENCE_COUNT,
        }
    }

    /// Builds the instances of `base` starting at `anchor`.
    ///
    /// Every instance is marked recurring, carries the batch size in
    /// `recurrence_count` and its 0-based position in `occurrence_index`.
    /// Ids and audit timestamps are placeholders until the store assigns them.
    pub fn expand(base: &NewScheduleData, anchor: NaiveDate) -> Result<Vec<ScheduleEntry>, CoreError> {
        let missing = missing_fields(base);
        let (Some(subject_id), Some(class_id), Some(lecturer_id), Some(start_time), Some(end_time)) = (
            base.subject_id,
            base.class_id.clone(),
            base.lecturer_id,
            base.start_time,
            base.end_time,
        ) else {
            return Err(CoreError::MissingFields(missing));
        };
        if !missing.is_empty() {
            return Err(CoreError::MissingFields(missing));
        }
        check_window(start_time, end_time)?;

        let count = Self::effective_count(base.recurrence_count);
        if count > MAX_RECURRENCE_COUNT {
            return Err(CoreError::InvalidInput(format!(
                "Recurrence count {} exceeds the limit of {}",
                count, MAX_RECURRENCE_COUNT
            )));
        }
        let now = Utc::now();

        (0..count)
            .map(|i| -> Result<ScheduleEntry, CoreError> {
                let date = anchor
                    .checked_add_days(Days::new(7 * i as u64))
                    .ok_or_else(|| {
                        CoreError::InvalidInput(format!(
                            "Occurrence {} of a series starting {} falls outside the calendar",
                            i + 1,
                            anchor
                        ))
                    })?;
                Ok(ScheduleEntry {
                    id: 0,
                    subject_id,
                    class_id: class_id.clone(),
                    lecturer_id,
                    start_time,
                    end_time,
                    specific_date: Some(date),
                    room_id: base.room_id,
                    building: base.building.clone(),
                    status: base.status.unwrap_or_default(),
                    term_id: base.term_id,
                    is_active: base.is_active.unwrap_or(true),
                    is_recurring: true,
                    recurrence_count: count,
                    occurrence_index: Some(i),
                    created_at: now,
                    updated_at: now,
                })
            })
            .collect()
    }
}
