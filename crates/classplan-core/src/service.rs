use crate::config::ScheduleConfig;
use crate::error::CoreError;
use crate::materialization::{WeeklyMaterializer, WeeklyView};
use crate::models::{
    NewPersonalEntryData, NewScheduleData, PersonalEntry, PersonalEntryType, ScheduleEntry,
    UpdatePersonalEntryData, UpdateScheduleData,
};
use crate::recurrence::RecurrenceExpander;
use crate::repository::Repository;
use crate::timezone::{local_now, today_in};
use crate::validation::{check_window, ScheduleValidator, ValidationOutcome};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Entry point for every schedule operation.
///
/// Reads go straight to the repository. Writes hold `write_lock` across their
/// check-then-save sequence, so two creations in the same process cannot both
/// pass validation for the same slot.
pub struct ScheduleService<R> {
    repo: R,
    tz: Tz,
    upcoming_limit: usize,
    write_lock: Mutex<()>,
}

impl<R: Repository> ScheduleService<R> {
    pub fn new(repo: R, config: &ScheduleConfig) -> Result<Self, CoreError> {
        Ok(Self {
            repo,
            tz: config.tz()?,
            upcoming_limit: config.upcoming_limit,
            write_lock: Mutex::new(()),
        })
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Calendar date in the configured timezone.
    pub fn today(&self) -> NaiveDate {
        today_in(self.tz, Utc::now())
    }

    pub fn now_local(&self) -> NaiveDateTime {
        local_now(self.tz, Utc::now())
    }

    // ------------------------------------------------------------------
    // Class schedule writes
    // ------------------------------------------------------------------

    /// Validates and stores a single session.
    pub async fn create_class_schedule(&self, data: NewScheduleData) -> Result<ScheduleEntry, CoreError> {
        let _guard = self.write_lock.lock().await;
        self.create_validated(data).await
    }

    /// Like [`Self::create_class_schedule`], dated today when no date is given.
    pub async fn create_one_time_schedule(&self, mut data: NewScheduleData) -> Result<ScheduleEntry, CoreError> {
        let _guard = self.write_lock.lock().await;
        if data.specific_date.is_none() {
            data.specific_date = Some(self.today());
        }
        self.create_validated(data).await
    }

    /// Expands `data` into weekly instances starting today and stores each one.
    ///
    /// Instances are not checked for conflicts.
    pub async fn create_recurring_schedules(&self, data: NewScheduleData) -> Result<Vec<ScheduleEntry>, CoreError> {
        let anchor = self.today();
        self.create_recurring_schedules_from(data, anchor).await
    }

    /// Expansion anchored on an explicit first date.
    pub async fn create_recurring_schedules_from(
        &self,
        data: NewScheduleData,
        anchor: NaiveDate,
    ) -> Result<Vec<ScheduleEntry>, CoreError> {
        let _guard = self.write_lock.lock().await;
        let instances = RecurrenceExpander::expand(&data, anchor)?;

        let mut stored = Vec::with_capacity(instances.len());
        for instance in instances {
            stored.push(self.repo.add_schedule(instance).await?);
        }

        info!(
            class_id = data.class_id.as_deref().unwrap_or_default(),
            count = stored.len(),
            %anchor,
            "created recurring schedules"
        );
        Ok(stored)
    }

    async fn create_validated(&self, data: NewScheduleData) -> Result<ScheduleEntry, CoreError> {
        let validator = ScheduleValidator::new(&self.repo);
        validator.validate(&data)?;
        let entry = entry_from(&data)?;
        check_window(entry.start_time, entry.end_time)?;

        let outcome = validator.validate_for_conflicts(&data, None).await?;
        if let Err(e) = outcome.into_result(&data) {
            warn!(class_id = %entry.class_id, lecturer_id = entry.lecturer_id, error = %e, "schedule rejected");
            return Err(e);
        }

        let stored = self.repo.add_schedule(entry).await?;
        info!(id = stored.id, class_id = %stored.class_id, "created schedule");
        Ok(stored)
    }

    /// Applies a partial update, re-checking conflicts against every other
    /// session when the merged entry is active.
    pub async fn update_schedule(&self, id: i64, update: UpdateScheduleData) -> Result<ScheduleEntry, CoreError> {
        let _guard = self.write_lock.lock().await;
        let mut entry = self
            .repo
            .find_schedule_by_id(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Schedule with id {} not found", id)))?;

        if update.is_empty() {
            return Ok(entry);
        }
        update.apply_to(&mut entry);
        if entry.class_id.trim().is_empty() {
            return Err(CoreError::MissingFields(vec!["class_id"]));
        }
        check_window(entry.start_time, entry.end_time)?;

        if entry.is_active {
            let merged = NewScheduleData::from(&entry);
            ScheduleValidator::new(&self.repo)
                .validate_for_conflicts(&merged, Some(id))
                .await?
                .into_result(&merged)?;
        }

        let stored = self.repo.save_schedule(&entry).await?;
        info!(id, "updated schedule");
        Ok(stored)
    }

    pub async fn delete_class_schedule(&self, id: i64) -> Result<bool, CoreError> {
        let deleted = self.repo.delete_schedule(id).await?;
        if deleted {
            info!(id, "deleted schedule");
        }
        Ok(deleted)
    }

    /// Dry run of the creation checks.
    pub async fn check_conflicts(
        &self,
        data: &NewScheduleData,
        exclude_id: Option<i64>,
    ) -> Result<ValidationOutcome, CoreError> {
        ScheduleValidator::new(&self.repo)
            .validate_for_conflicts(data, exclude_id)
            .await
    }

    // ------------------------------------------------------------------
    // Class schedule reads
    // ------------------------------------------------------------------

    pub async fn get_class_schedule(&self, id: i64) -> Result<Option<ScheduleEntry>, CoreError> {
        self.repo.find_schedule_by_id(id).await
    }

    pub async fn get_class_schedules(&self, class_id: &str) -> Result<Vec<ScheduleEntry>, CoreError> {
        self.repo.find_active_by_class(class_id).await
    }

    pub async fn get_lecturer_schedules(&self, lecturer_id: i64) -> Result<Vec<ScheduleEntry>, CoreError> {
        self.repo.find_active_by_lecturer(lecturer_id).await
    }

    pub async fn get_subject_schedules(&self, subject_id: i64) -> Result<Vec<ScheduleEntry>, CoreError> {
        self.repo.find_active_by_subject(subject_id).await
    }

    pub async fn get_class_schedules_by_term(&self, class_id: &str, term_id: i64) -> Result<Vec<ScheduleEntry>, CoreError> {
        self.repo.find_active_by_class_and_term(class_id, term_id).await
    }

    pub async fn get_class_schedules_by_date(&self, class_id: &str, date: NaiveDate) -> Result<Vec<ScheduleEntry>, CoreError> {
        WeeklyMaterializer::new(&self.repo)
            .materialize_for_date(class_id, date)
            .await
    }

    pub async fn get_class_schedules_by_date_range(
        &self,
        class_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ScheduleEntry>, CoreError> {
        WeeklyMaterializer::new(&self.repo)
            .materialize_for_range(class_id, start, end)
            .await
    }

    pub async fn get_weekly_schedule(&self, user_id: i64, class_id: &str, week_start: NaiveDate) -> Result<WeeklyView, CoreError> {
        WeeklyMaterializer::new(&self.repo)
            .weekly_view(user_id, class_id, week_start)
            .await
    }

    /// The seven days starting today.
    pub async fn get_today_schedule(&self, user_id: i64, class_id: &str) -> Result<WeeklyView, CoreError> {
        self.get_weekly_schedule(user_id, class_id, self.today()).await
    }

    pub async fn get_available_term_ids(&self) -> Result<Vec<i64>, CoreError> {
        self.repo.find_distinct_term_ids().await
    }

    // ------------------------------------------------------------------
    // Personal entries
    // ------------------------------------------------------------------

    pub async fn create_personal_entry(&self, data: NewPersonalEntryData) -> Result<PersonalEntry, CoreError> {
        let entry = self.repo.add_personal_entry(data).await?;
        info!(id = entry.id, user_id = entry.user_id, "created personal entry");
        Ok(entry)
    }

    pub async fn get_personal_entry(&self, id: i64) -> Result<Option<PersonalEntry>, CoreError> {
        self.repo.find_personal_entry_by_id(id).await
    }

    pub async fn get_user_personal_entries(&self, user_id: i64) -> Result<Vec<PersonalEntry>, CoreError> {
        self.repo.find_personal_entries(user_id).await
    }

    pub async fn get_user_entries_by_date_range(
        &self,
        user_id: i64,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Vec<PersonalEntry>, CoreError> {
        self.repo.find_personal_entries_between(user_id, from, to).await
    }

    pub async fn get_user_entries_by_type(&self, user_id: i64, entry_type: PersonalEntryType) -> Result<Vec<PersonalEntry>, CoreError> {
        self.repo.find_personal_entries_by_type(user_id, entry_type).await
    }

    pub async fn update_personal_entry(&self, id: i64, data: UpdatePersonalEntryData) -> Result<PersonalEntry, CoreError> {
        let entry = self.repo.update_personal_entry(id, data).await?;
        info!(id, "updated personal entry");
        Ok(entry)
    }

    pub async fn delete_personal_entry(&self, id: i64) -> Result<bool, CoreError> {
        self.repo.delete_personal_entry(id).await
    }

    /// Next entries starting at or after the current local time.
    pub async fn get_upcoming_personal_entries(&self, user_id: i64) -> Result<Vec<PersonalEntry>, CoreError> {
        let now = self.now_local();
        debug!(user_id, %now, limit = self.upcoming_limit, "fetching upcoming personal entries");
        self.repo
            .find_upcoming_personal_entries(user_id, now, self.upcoming_limit)
            .await
    }
}

fn entry_from(data: &NewScheduleData) -> Result<ScheduleEntry, CoreError> {
    let (Some(subject_id), Some(class_id), Some(lecturer_id), Some(start_time), Some(end_time)) = (
        data.subject_id,
        data.class_id.clone(),
        data.lecturer_id,
        data.start_time,
        data.end_time,
    ) else {
        return Err(CoreError::MissingFields(crate::validation::missing_fields(data)));
    };
    let now = Utc::now();

    Ok(ScheduleEntry {
        id: 0,
        subject_id,
        class_id,
        lecturer_id,
        start_time,
        end_time,
        specific_date: data.specific_date,
        room_id: data.room_id,
        building: data.building.clone(),
        status: data.status.unwrap_or_default(),
        term_id: data.term_id,
        is_active: data.is_active.unwrap_or(true),
        is_recurring: false,
        recurrence_count: 1,
        occurrence_index: None,
        created_at: now,
        updated_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::ConflictDimension;
    use crate::db::establish_connection;
    use crate::repository::SqliteRepository;
    use chrono::NaiveTime;
    use std::sync::Arc;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    async fn service() -> ScheduleService<SqliteRepository> {
        let repo = SqliteRepository::new(establish_connection(":memory:").await.unwrap());
        ScheduleService::new(repo, &ScheduleConfig::default()).unwrap()
    }

    fn session(start: NaiveTime, end: NaiveTime) -> NewScheduleData {
        NewScheduleData {
            subject_id: Some(1),
            class_id: Some("SE1801".to_string()),
            lecturer_id: Some(7),
            start_time: Some(start),
            end_time: Some(end),
            specific_date: Some(monday()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_rejects_unknown_timezone() {
        let config = ScheduleConfig {
            timezone: "Nowhere/City".to_string(),
            ..Default::default()
        };
        let repo = SqliteRepository::new(establish_connection(":memory:").await.unwrap());
        let result = ScheduleService::new(repo, &config);
        assert!(matches!(result, Err(CoreError::InvalidTimezone(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_overlap_with_dimension() {
        let service = service().await;
        service.create_class_schedule(session(t(9, 0), t(10, 30))).await.unwrap();

        let other_class = NewScheduleData {
            class_id: Some("SE1802".to_string()),
            ..session(t(10, 0), t(11, 0))
        };
        match service.create_class_schedule(other_class).await {
            Err(CoreError::ScheduleConflict(dims)) => assert_eq!(dims, vec![ConflictDimension::Lecturer]),
            other => panic!("expected lecturer conflict, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_inverted_window() {
        let service = service().await;
        let result = service.create_class_schedule(session(t(11, 0), t(10, 0))).await;
        assert!(matches!(result, Err(CoreError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_one_time_defaults_to_today() {
        let service = service().await;
        let data = NewScheduleData {
            specific_date: None,
            ..session(t(9, 0), t(10, 0))
        };
        let stored = service.create_one_time_schedule(data).await.unwrap();
        assert_eq!(stored.specific_date, Some(service.today()));
    }

    #[tokio::test]
    async fn test_recurring_skips_conflict_checks() {
        let service = service().await;
        service.create_class_schedule(session(t(9, 0), t(10, 30))).await.unwrap();

        let base = NewScheduleData {
            recurrence_count: Some(2),
            ..session(t(9, 0), t(10, 30))
        };
        let stored = service.create_recurring_schedules_from(base, monday()).await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].specific_date, Some(monday()));
        assert_eq!(stored[1].occurrence_index, Some(1));
    }

    #[tokio::test]
    async fn test_update_excludes_itself_but_sees_others() {
        let service = service().await;
        let first = service.create_class_schedule(session(t(9, 0), t(10, 0))).await.unwrap();
        service.create_class_schedule(session(t(13, 0), t(14, 0))).await.unwrap();

        let widened = service
            .update_schedule(first.id, UpdateScheduleData { end_time: Some(t(10, 30)), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(widened.start_time, t(9, 0));
        assert_eq!(widened.end_time, t(10, 30));

        let clash = service
            .update_schedule(first.id, UpdateScheduleData { start_time: Some(t(13, 0)), end_time: Some(t(14, 0)), ..Default::default() })
            .await;
        assert!(matches!(clash, Err(CoreError::ScheduleConflict(_))));
    }

    #[tokio::test]
    async fn test_update_inactive_entry_skips_conflicts() {
        let service = service().await;
        let first = service.create_class_schedule(session(t(9, 0), t(10, 0))).await.unwrap();
        let second = service.create_class_schedule(session(t(13, 0), t(14, 0))).await.unwrap();

        let parked = service
            .update_schedule(
                second.id,
                UpdateScheduleData {
                    start_time: Some(first.start_time),
                    end_time: Some(first.end_time),
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(!parked.is_active);
        assert_eq!(service.get_class_schedules("SE1801").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let service = service().await;
        let result = service.update_schedule(404, UpdateScheduleData::default()).await;
        assert!(matches!(result, Err(CoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_concurrent_creations_admit_one() {
        let service = Arc::new(service().await);
        let mut handles = Vec::new();
        for _ in 0..4 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service.create_class_schedule(session(t(9, 0), t(10, 30))).await
            }));
        }

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
    }
}
