use crate::error::CoreError;
use crate::models::ScheduleEntry;
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

#[async_trait]
impl super::ScheduleRepository for SqliteRepository {
    async fn find_active_by_lecturer(&self, lecturer_id: i64) -> Result<Vec<ScheduleEntry>, CoreError> {
        let entries = sqlx::query_as(
            "SELECT * FROM class_schedules WHERE lecturer_id = $1 AND is_active = 1 ORDER BY start_time, id",
        )
        .bind(lecturer_id)
        .fetch_all(self.pool())
        .await?;
        Ok(entries)
    }

    async fn find_active_by_class(&self, class_id: &str) -> Result<Vec<ScheduleEntry>, CoreError> {
        let entries = sqlx::query_as(
            "SELECT * FROM class_schedules WHERE class_id = $1 AND is_active = 1 ORDER BY start_time, id",
        )
        .bind(class_id)
        .fetch_all(self.pool())
        .await?;
        Ok(entries)
    }

    async fn find_active_by_room(&self, room_id: i64) -> Result<Vec<ScheduleEntry>, CoreError> {
        let entries = sqlx::query_as(
            "SELECT * FROM class_schedules WHERE room_id = $1 AND is_active = 1 ORDER BY start_time, id",
        )
        .bind(room_id)
        .fetch_all(self.pool())
        .await?;
        Ok(entries)
    }

    async fn find_active_by_subject(&self, subject_id: i64) -> Result<Vec<ScheduleEntry>, CoreError> {
        let entries = sqlx::query_as(
            "SELECT * FROM class_schedules WHERE subject_id = $1 AND is_active = 1 ORDER BY start_time, id",
        )
        .bind(subject_id)
        .fetch_all(self.pool())
        .await?;
        Ok(entries)
    }

    async fn find_active_by_class_and_term(&self, class_id: &str, term_id: i64) -> Result<Vec<ScheduleEntry>, CoreError> {
        let entries = sqlx::query_as(
            r#"SELECT * FROM class_schedules
            WHERE class_id = $1 AND term_id = $2 AND is_active = 1
            ORDER BY start_time, id"#,
        )
        .bind(class_id)
        .bind(term_id)
        .fetch_all(self.pool())
        .await?;
        Ok(entries)
    }

    async fn find_schedule_by_id(&self, id: i64) -> Result<Option<ScheduleEntry>, CoreError> {
        let entry = sqlx::query_as("SELECT * FROM class_schedules WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(entry)
    }

    async fn find_by_class_and_date(&self, class_id: &str, date: NaiveDate) -> Result<Vec<ScheduleEntry>, CoreError> {
        let entries = sqlx::query_as(
            r#"SELECT * FROM class_schedules
            WHERE class_id = $1 AND specific_date = $2 AND is_active = 1
            ORDER BY start_time, id"#,
        )
        .bind(class_id)
        .bind(date)
        .fetch_all(self.pool())
        .await?;
        Ok(entries)
    }

    async fn find_templates_by_class(&self, class_id: &str) -> Result<Vec<ScheduleEntry>, CoreError> {
        let entries = sqlx::query_as(
            r#"SELECT * FROM class_schedules
            WHERE class_id = $1 AND specific_date IS NULL AND is_active = 1
            ORDER BY start_time, id"#,
        )
        .bind(class_id)
        .fetch_all(self.pool())
        .await?;
        Ok(entries)
    }

    async fn find_by_class_and_date_range(&self, class_id: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<ScheduleEntry>, CoreError> {
        let entries = sqlx::query_as(
            r#"SELECT * FROM class_schedules
            WHERE class_id = $1 AND specific_date BETWEEN $2 AND $3 AND is_active = 1
            ORDER BY specific_date, start_time, id"#,
        )
        .bind(class_id)
        .bind(start)
        .bind(end)
        .fetch_all(self.pool())
        .await?;
        Ok(entries)
    }

    async fn add_schedule(&self, entry: ScheduleEntry) -> Result<ScheduleEntry, CoreError> {
        let now = Utc::now();
        let mut tx = self.pool().begin().await?;
        let stored = sqlx::query_as(
            r#"INSERT INTO class_schedules (subject_id, class_id, lecturer_id, start_time, end_time, specific_date, room_id, building, status, term_id, is_active, is_recurring, recurrence_count, occurrence_index, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING *"#,
        )
        .bind(entry.subject_id)
        .bind(&entry.class_id)
        .bind(entry.lecturer_id)
        .bind(entry.start_time)
        .bind(entry.end_time)
        .bind(entry.specific_date)
        .bind(entry.room_id)
        .bind(&entry.building)
        .bind(entry.status)
        .bind(entry.term_id)
        .bind(entry.is_active)
        .bind(entry.is_recurring)
        .bind(entry.recurrence_count)
        .bind(entry.occurrence_index)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(stored)
    }

    async fn save_schedule(&self, entry: &ScheduleEntry) -> Result<ScheduleEntry, CoreError> {
        let mut tx = self.pool().begin().await?;
        let stored = sqlx::query_as(
            r#"UPDATE class_schedules
            SET subject_id = $1, class_id = $2, lecturer_id = $3, start_time = $4, end_time = $5,
                specific_date = $6, room_id = $7, building = $8, status = $9, term_id = $10,
                is_active = $11, is_recurring = $12, recurrence_count = $13, occurrence_index = $14,
                updated_at = $15
            WHERE id = $16
            RETURNING *"#,
        )
        .bind(entry.subject_id)
        .bind(&entry.class_id)
        .bind(entry.lecturer_id)
        .bind(entry.start_time)
        .bind(entry.end_time)
        .bind(entry.specific_date)
        .bind(entry.room_id)
        .bind(&entry.building)
        .bind(entry.status)
        .bind(entry.term_id)
        .bind(entry.is_active)
        .bind(entry.is_recurring)
        .bind(entry.recurrence_count)
        .bind(entry.occurrence_index)
        .bind(Utc::now())
        .bind(entry.id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| CoreError::NotFound(format!("Schedule with id {} not found", entry.id)))?;
        tx.commit().await?;
        Ok(stored)
    }

    async fn delete_schedule(&self, id: i64) -> Result<bool, CoreError> {
        let result = sqlx::query("DELETE FROM class_schedules WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_distinct_term_ids(&self) -> Result<Vec<i64>, CoreError> {
        let term_ids = sqlx::query_scalar(
            r#"SELECT DISTINCT term_id FROM class_schedules
            WHERE is_active = 1 AND term_id IS NOT NULL
            ORDER BY term_id DESC"#,
        )
        .fetch_all(self.pool())
        .await?;
        Ok(term_ids)
    }
}
