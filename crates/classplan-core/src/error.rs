use crate::conflict::ConflictDimension;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Schedule conflicts with an existing session on: {}", join_dimensions(.0))]
    ScheduleConflict(Vec<ConflictDimension>),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),
}

fn join_dimensions(dimensions: &[ConflictDimension]) -> String {
    dimensions
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl CoreError {
    /// Validation and conflict errors can be fixed by the caller and retried.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CoreError::MissingFields(_) | CoreError::ScheduleConflict(_) | CoreError::InvalidInput(_)
        )
    }
}
