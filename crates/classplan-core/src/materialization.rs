//! Resolution of weekly templates and dated overrides into concrete sessions.
//!
//! A template (`specific_date == None`) applies to every day. On a given day
//! it is suppressed only by an override of the same class whose start and end
//! are both identical; any other override is shown alongside it.

use crate::error::CoreError;
use crate::models::{PersonalEntry, ScheduleEntry};
use crate::repository::Repository;
use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Copy of `template` pinned to `date`.
pub fn project(template: &ScheduleEntry, date: NaiveDate) -> ScheduleEntry {
    ScheduleEntry {
        specific_date: Some(date),
        ..template.clone()
    }
}

fn suppresses(override_entry: &ScheduleEntry, template: &ScheduleEntry) -> bool {
    override_entry.start_time == template.start_time && override_entry.end_time == template.end_time
}

/// Sessions of one day: the overrides dated `date` plus every template they
/// do not suppress, projected onto `date`. Sorted by start time.
pub fn resolve_day(
    templates: &[ScheduleEntry],
    overrides: &[ScheduleEntry],
    date: NaiveDate,
) -> Vec<ScheduleEntry> {
    let todays: Vec<&ScheduleEntry> = overrides
        .iter()
        .filter(|o| o.specific_date == Some(date))
        .collect();

    let mut sessions: Vec<ScheduleEntry> = todays.iter().map(|o| (*o).clone()).collect();
    sessions.extend(
        templates
            .iter()
            .filter(|t| !todays.iter().any(|o| suppresses(o, t)))
            .map(|t| project(t, date)),
    );
    sessions.sort_by_key(|s| (s.start_time, s.id));
    sessions
}

/// [`resolve_day`] for every day in `[start, end]`, in date order.
///
/// An inverted range yields nothing.
pub fn resolve_range(
    templates: &[ScheduleEntry],
    overrides: &[ScheduleEntry],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<ScheduleEntry> {
    start
        .iter_days()
        .take_while(|day| *day <= end)
        .flat_map(|day| resolve_day(templates, overrides, day))
        .collect()
}

/// A week of personal and class sessions keyed by day number (1..=7).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeeklyView {
    pub week_start: NaiveDate,
    /// Keyed by the ISO weekday of each entry's start
    pub personal_by_day: BTreeMap<u32, Vec<PersonalEntry>>,
    /// Keyed by position in the week: day `d` is `week_start + (d - 1)`
    pub class_by_day: BTreeMap<u32, Vec<ScheduleEntry>>,
}

impl WeeklyView {
    pub fn week_end(&self) -> NaiveDate {
        self.week_start + Duration::days(6)
    }

    /// Calendar date of week position `day`.
    pub fn date_of(&self, day: u32) -> NaiveDate {
        self.week_start + Duration::days(i64::from(day.saturating_sub(1)))
    }

    pub fn is_empty(&self) -> bool {
        self.personal_by_day.is_empty() && self.class_by_day.is_empty()
    }
}

/// Groups personal entries by the ISO weekday (1 = Monday) of their start.
pub fn bucket_personal(entries: Vec<PersonalEntry>) -> BTreeMap<u32, Vec<PersonalEntry>> {
    let mut by_day: BTreeMap<u32, Vec<PersonalEntry>> = BTreeMap::new();
    for entry in entries {
        let day = entry.start_time.weekday().number_from_monday();
        by_day.entry(day).or_default().push(entry);
    }
    by_day
}

/// Groups materialized class sessions by their position in the week.
pub fn bucket_classes(
    sessions: Vec<ScheduleEntry>,
    week_start: NaiveDate,
) -> BTreeMap<u32, Vec<ScheduleEntry>> {
    let mut by_day: BTreeMap<u32, Vec<ScheduleEntry>> = BTreeMap::new();
    for day in 1..=7u32 {
        let date = week_start + Duration::days(i64::from(day - 1));
        let sessions_on_day: Vec<ScheduleEntry> = sessions
            .iter()
            .filter(|s| s.specific_date == Some(date))
            .cloned()
            .collect();
        if !sessions_on_day.is_empty() {
            by_day.insert(day, sessions_on_day);
        }
    }
    by_day
}

pub struct WeeklyMaterializer<'a, R: ?Sized> {
    repo: &'a R,
}

impl<'a, R: Repository + ?Sized> WeeklyMaterializer<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    pub async fn materialize_for_date(
        &self,
        class_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<ScheduleEntry>, CoreError> {
        let overrides = self.repo.find_by_class_and_date(class_id, date).await?;
        let templates = self.repo.find_templates_by_class(class_id).await?;
        let sessions = resolve_day(&templates, &overrides, date);

        debug!(
            class_id,
            %date,
            overrides = overrides.len(),
            templates = templates.len(),
            sessions = sessions.len(),
            "materialized day"
        );
        Ok(sessions)
    }

    pub async fn materialize_for_range(
        &self,
        class_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ScheduleEntry>, CoreError> {
        if start > end {
            return Ok(Vec::new());
        }
        let overrides = self.repo.find_by_class_and_date_range(class_id, start, end).await?;
        let templates = self.repo.find_templates_by_class(class_id).await?;
        let sessions = resolve_range(&templates, &overrides, start, end);

        debug!(
            class_id,
            %start,
            %end,
            overrides = overrides.len(),
            templates = templates.len(),
            sessions = sessions.len(),
            "materialized range"
        );
        Ok(sessions)
    }

    pub async fn weekly_view(
        &self,
        user_id: i64,
        class_id: &str,
        week_start: NaiveDate,
    ) -> Result<WeeklyView, CoreError> {
        let week_end = week_start + Duration::days(6);
        let from = week_start.and_time(NaiveTime::default());
        let to = from + Duration::days(7) - Duration::seconds(1);

        let personal = self
            .repo
            .find_personal_entries_between(user_id, from, to)
            .await?;
        let sessions = self.materialize_for_range(class_id, week_start, week_end).await?;

        Ok(WeeklyView {
            week_start,
            personal_by_day: bucket_personal(personal),
            class_by_day: bucket_classes(sessions, week_start),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PersonalEntryType, ScheduleStatus};
    use chrono::{NaiveDateTime, Utc};

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn session(id: i64, start: NaiveTime, end: NaiveTime, date: Option<NaiveDate>) -> ScheduleEntry {
        ScheduleEntry {
            id,
            subject_id: 1,
            class_id: "SE1801".to_string(),
            lecturer_id: 7,
            start_time: start,
            end_time: end,
            specific_date: date,
            room_id: None,
            building: Some("Alpha".to_string()),
            status: ScheduleStatus::NotYet,
            term_id: None,
            is_active: true,
            is_recurring: false,
            recurrence_count: 1,
            occurrence_index: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn personal(id: i64, start: NaiveDateTime) -> PersonalEntry {
        PersonalEntry {
            id,
            user_id: 1,
            title: "Gym".to_string(),
            description: None,
            start_time: start,
            end_time: start + Duration::hours(1),
            entry_type: PersonalEntryType::Personal,
            location: None,
            color: "#3B82F6".to_string(),
            is_recurring: false,
            recurrence_pattern: None,
            reminder_minutes: 15,
            is_reminder_sent: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_identical_override_suppresses_template() {
        let templates = vec![session(1, t(9, 0), t(10, 30), None)];
        let overrides = vec![session(2, t(9, 0), t(10, 30), Some(d(4)))];

        let sessions = resolve_day(&templates, &overrides, d(4));
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id, 2);
    }

    #[test]
    fn test_partial_override_keeps_template() {
        let templates = vec![session(1, t(9, 0), t(10, 30), None)];
        let overrides = vec![session(2, t(9, 0), t(10, 0), Some(d(4)))];

        let sessions = resolve_day(&templates, &overrides, d(4));
        let ids: Vec<i64> = sessions.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(sessions.iter().all(|s| s.specific_date == Some(d(4))));
        assert_eq!(sessions[0].building.as_deref(), Some("Alpha"));
    }

    #[test]
    fn test_range_suppresses_only_on_override_day() {
        let templates = vec![session(1, t(9, 0), t(10, 30), None)];
        let overrides = vec![session(2, t(9, 0), t(10, 30), Some(d(5)))];

        let sessions = resolve_range(&templates, &overrides, d(4), d(6));
        let placed: Vec<(i64, NaiveDate)> = sessions
            .iter()
            .map(|s| (s.id, s.specific_date.unwrap()))
            .collect();
        assert_eq!(placed, vec![(1, d(4)), (2, d(5)), (1, d(6))]);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let templates = vec![session(1, t(9, 0), t(10, 30), None)];
        assert!(resolve_range(&templates, &[], d(6), d(4)).is_empty());
    }

    #[test]
    fn test_bucket_classes_by_week_position() {
        // week starting on a Wednesday
        let week_start = d(6);
        let sessions = vec![
            session(1, t(9, 0), t(10, 0), Some(d(6))),
            session(2, t(9, 0), t(10, 0), Some(d(8))),
            session(3, t(9, 0), t(10, 0), Some(d(20))),
        ];
        let by_day = bucket_classes(sessions, week_start);

        assert_eq!(by_day.keys().copied().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(by_day[&3][0].id, 2);
    }

    #[test]
    fn test_bucket_personal_by_iso_weekday() {
        let entries = vec![
            personal(1, d(4).and_hms_opt(7, 0, 0).unwrap()),
            personal(2, d(10).and_hms_opt(18, 0, 0).unwrap()),
        ];
        let by_day = bucket_personal(entries);
        assert_eq!(by_day[&1][0].id, 1);
        assert_eq!(by_day[&7][0].id, 2);
    }

    #[test]
    fn test_view_dates() {
        let view = WeeklyView {
            week_start: d(4),
            ..Default::default()
        };
        assert_eq!(view.week_end(), d(10));
        assert_eq!(view.date_of(3), d(6));
        assert!(view.is_empty());
    }
}
