use crate::error::CoreError;
use crate::models::{
    NewPersonalEntryData, PersonalEntry, PersonalEntryType, UpdatePersonalEntryData,
    DEFAULT_PERSONAL_COLOR, DEFAULT_REMINDER_MINUTES,
};
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};

#[async_trait]
impl super::PersonalScheduleRepository for SqliteRepository {
    async fn add_personal_entry(&self, data: NewPersonalEntryData) -> Result<PersonalEntry, CoreError> {
        let mut missing = Vec::new();
        if data.user_id.is_none() {
            missing.push("user_id");
        }
        if data.title.as_deref().map_or(true, |t| t.trim().is_empty()) {
            missing.push("title");
        }
        if data.start_time.is_none() {
            missing.push("start_time");
        }
        if data.end_time.is_none() {
            missing.push("end_time");
        }
        let (Some(user_id), Some(title), Some(start_time), Some(end_time)) =
            (data.user_id, data.title, data.start_time, data.end_time)
        else {
            return Err(CoreError::MissingFields(missing));
        };
        if !missing.is_empty() {
            return Err(CoreError::MissingFields(missing));
        }
        if start_time >= end_time {
            return Err(CoreError::InvalidInput(
                "Personal entry must end after it starts".to_string(),
            ));
        }

        let now = Utc::now();
        let mut tx = self.pool().begin().await?;
        let entry = sqlx::query_as(
            r#"INSERT INTO personal_schedules (user_id, title, description, start_time, end_time, entry_type, location, color, is_recurring, recurrence_pattern, reminder_minutes, is_reminder_sent, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 0, $12, $13)
            RETURNING *"#,
        )
        .bind(user_id)
        .bind(title)
        .bind(data.description)
        .bind(start_time)
        .bind(end_time)
        .bind(data.entry_type.unwrap_or_default())
        .bind(data.location)
        .bind(data.color.unwrap_or_else(|| DEFAULT_PERSONAL_COLOR.to_string()))
        .bind(data.is_recurring)
        .bind(data.recurrence_pattern)
        .bind(data.reminder_minutes.unwrap_or(DEFAULT_REMINDER_MINUTES))
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(entry)
    }

    async fn find_personal_entry_by_id(&self, id: i64) -> Result<Option<PersonalEntry>, CoreError> {
        let entry = sqlx::query_as("SELECT * FROM personal_schedules WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(entry)
    }

    async fn find_personal_entries(&self, user_id: i64) -> Result<Vec<PersonalEntry>, CoreError> {
        let entries = sqlx::query_as(
            "SELECT * FROM personal_schedules WHERE user_id = $1 ORDER BY start_time, id",
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;
        Ok(entries)
    }

    async fn find_personal_entries_between(
        &self,
        user_id: i64,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Vec<PersonalEntry>, CoreError> {
        let entries = sqlx::query_as(
            r#"SELECT * FROM personal_schedules
            WHERE user_id = $1 AND start_time BETWEEN $2 AND $3
            ORDER BY start_time, id"#,
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(self.pool())
        .await?;
        Ok(entries)
    }

    async fn find_personal_entries_by_type(
        &self,
        user_id: i64,
        entry_type: PersonalEntryType,
    ) -> Result<Vec<PersonalEntry>, CoreError> {
        let entries = sqlx::query_as(
            r#"SELECT * FROM personal_schedules
            WHERE user_id = $1 AND entry_type = $2
            ORDER BY start_time, id"#,
        )
        .bind(user_id)
        .bind(entry_type)
        .fetch_all(self.pool())
        .await?;
        Ok(entries)
    }

    async fn find_upcoming_personal_entries(
        &self,
        user_id: i64,
        now: NaiveDateTime,
        limit: usize,
    ) -> Result<Vec<PersonalEntry>, CoreError> {
        let entries = sqlx::query_as(
            r#"SELECT * FROM personal_schedules
            WHERE user_id = $1 AND start_time >= $2
            ORDER BY start_time, id
            LIMIT $3"#,
        )
        .bind(user_id)
        .bind(now)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(self.pool())
        .await?;
        Ok(entries)
    }

    async fn update_personal_entry(
        &self,
        id: i64,
        data: UpdatePersonalEntryData,
    ) -> Result<PersonalEntry, CoreError> {
        let mut entry = self
            .find_personal_entry_by_id(id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Personal entry with id {} not found", id)))?;

        data.apply_to(&mut entry);
        if entry.title.trim().is_empty() {
            return Err(CoreError::MissingFields(vec!["title"]));
        }
        if entry.start_time >= entry.end_time {
            return Err(CoreError::InvalidInput(
                "Personal entry must end after it starts".to_string(),
            ));
        }

        let mut tx = self.pool().begin().await?;
        let updated = sqlx::query_as(
            r#"UPDATE personal_schedules
            SET title = $1, description = $2, start_time = $3, end_time = $4, entry_type = $5,
                location = $6, color = $7, is_recurring = $8, recurrence_pattern = $9,
                reminder_minutes = $10, updated_at = $11
            WHERE id = $12
            RETURNING *"#,
        )
        .bind(&entry.title)
        .bind(&entry.description)
        .bind(entry.start_time)
        .bind(entry.end_time)
        .bind(entry.entry_type)
        .bind(&entry.location)
        .bind(&entry.color)
        .bind(entry.is_recurring)
        .bind(&entry.recurrence_pattern)
        .bind(entry.reminder_minutes)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(updated)
    }

    async fn delete_personal_entry(&self, id: i64) -> Result<bool, CoreError> {
        let result = sqlx::query("DELETE FROM personal_schedules WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
