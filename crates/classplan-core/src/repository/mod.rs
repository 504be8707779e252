use crate::db::DbPool;
use crate::error::CoreError;
use crate::models::{
    NewPersonalEntryData, PersonalEntry, PersonalEntryType, ScheduleEntry,
    UpdatePersonalEntryData,
};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

pub mod personal;
pub mod schedules;

/// Storage contract for class sessions.
///
/// Every `find_active_*` listing returns only `is_active` entries ordered by
/// `start_time`. Each call is atomic on its own; callers get no multi-entry
/// transaction.
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    async fn find_active_by_lecturer(&self, lecturer_id: i64) -> Result<Vec<ScheduleEntry>, CoreError>;
    async fn find_active_by_class(&self, class_id: &str) -> Result<Vec<ScheduleEntry>, CoreError>;
    async fn find_active_by_room(&self, room_id: i64) -> Result<Vec<ScheduleEntry>, CoreError>;
    async fn find_active_by_subject(&self, subject_id: i64) -> Result<Vec<ScheduleEntry>, CoreError>;
    async fn find_active_by_class_and_term(&self, class_id: &str, term_id: i64) -> Result<Vec<ScheduleEntry>, CoreError>;
    async fn find_schedule_by_id(&self, id: i64) -> Result<Option<ScheduleEntry>, CoreError>;
    /// Active dated entries of a class on exactly `date`.
    async fn find_by_class_and_date(&self, class_id: &str, date: NaiveDate) -> Result<Vec<ScheduleEntry>, CoreError>;
    /// Active weekly templates (`specific_date IS NULL`) of a class.
    async fn find_templates_by_class(&self, class_id: &str) -> Result<Vec<ScheduleEntry>, CoreError>;
    /// Active dated entries of a class within `[start, end]`.
    async fn find_by_class_and_date_range(&self, class_id: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<ScheduleEntry>, CoreError>;
    /// Inserts `entry`; the store assigns `id` and the audit timestamps.
    async fn add_schedule(&self, entry: ScheduleEntry) -> Result<ScheduleEntry, CoreError>;
    /// Overwrites the stored row with `entry.id`.
    async fn save_schedule(&self, entry: &ScheduleEntry) -> Result<ScheduleEntry, CoreError>;
    /// Hard delete. Returns false when no row had that id.
    async fn delete_schedule(&self, id: i64) -> Result<bool, CoreError>;
    async fn find_distinct_term_ids(&self) -> Result<Vec<i64>, CoreError>;
}

/// Storage contract for personal calendar items.
#[async_trait]
pub trait PersonalScheduleRepository: Send + Sync {
    async fn add_personal_entry(&self, data: NewPersonalEntryData) -> Result<PersonalEntry, CoreError>;
    async fn find_personal_entry_by_id(&self, id: i64) -> Result<Option<PersonalEntry>, CoreError>;
    async fn find_personal_entries(&self, user_id: i64) -> Result<Vec<PersonalEntry>, CoreError>;
    /// Entries whose start lies within `[from, to]`.
    async fn find_personal_entries_between(&self, user_id: i64, from: NaiveDateTime, to: NaiveDateTime) -> Result<Vec<PersonalEntry>, CoreError>;
    async fn find_personal_entries_by_type(&self, user_id: i64, entry_type: PersonalEntryType) -> Result<Vec<PersonalEntry>, CoreError>;
    async fn find_upcoming_personal_entries(&self, user_id: i64, now: NaiveDateTime, limit: usize) -> Result<Vec<PersonalEntry>, CoreError>;
    async fn update_personal_entry(&self, id: i64, data: UpdatePersonalEntryData) -> Result<PersonalEntry, CoreError>;
    async fn delete_personal_entry(&self, id: i64) -> Result<bool, CoreError>;
}

/// Main repository trait that composes both storage contracts
pub trait Repository: ScheduleRepository + PersonalScheduleRepository {}

impl<T: ScheduleRepository + PersonalScheduleRepository> Repository for T {}

/// SQLite implementation of the repository pattern
pub struct SqliteRepository {
    pool: DbPool,
}

impl SqliteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }
}
