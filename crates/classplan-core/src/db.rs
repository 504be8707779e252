use crate::error::CoreError;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::debug;

pub use sqlx::SqlitePool as DbPool;

/// Path that opens a private, non-persistent database.
pub const IN_MEMORY: &str = ":memory:";

/// Establishes a connection pool to the SQLite database and runs migrations.
///
/// The database file and its parent directory are created when missing.
/// [`IN_MEMORY`] opens a single-connection pool, since every new connection
/// to `sqlite::memory:` would see its own empty database.
pub async fn establish_connection(db_path: &str) -> Result<SqlitePool, CoreError> {
    let pool = if db_path == IN_MEMORY {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?
    } else {
        if let Some(parent) = Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        if !Path::new(db_path).exists() {
            tokio::fs::File::create(db_path).await?;
        }

        SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&format!("sqlite://{}", db_path))
            .await?
    };

    sqlx::migrate!("./migrations").run(&pool).await?;
    debug!(path = db_path, "database ready");

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_creates_missing_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("schedule.db");
        let path = path.to_str().unwrap();

        let pool = establish_connection(path).await.unwrap();
        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE '\\_%' ESCAPE '\\' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        assert!(Path::new(path).exists());
        assert_eq!(tables, vec!["class_schedules", "personal_schedules"]);
    }

    #[tokio::test]
    async fn test_reopening_keeps_data() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("schedule.db");
        let path = path.to_str().unwrap();

        {
            let pool = establish_connection(path).await.unwrap();
            sqlx::query(
                "INSERT INTO class_schedules (subject_id, class_id, lecturer_id, start_time, end_time, created_at, updated_at)
                VALUES (1, 'SE1801', 7, '09:00:00', '10:00:00', '2024-03-04T00:00:00Z', '2024-03-04T00:00:00Z')",
            )
            .execute(&pool)
            .await
            .unwrap();
            pool.close().await;
        }

        let pool = establish_connection(path).await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM class_schedules")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
