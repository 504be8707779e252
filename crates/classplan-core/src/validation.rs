use crate::conflict::{ConflictChecker, ConflictDimension, ScheduleCandidate};
use crate::error::CoreError;
use crate::models::NewScheduleData;
use crate::repository::ScheduleRepository;
use chrono::NaiveTime;
use serde::Serialize;
use tracing::debug;

/// Result of a full validation pass over a proposed session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    pub missing_fields: bool,
    pub lecturer_conflict: bool,
    pub class_conflict: bool,
    pub room_conflict: bool,
}

impl ValidationOutcome {
    pub fn has_conflict(&self) -> bool {
        self.lecturer_conflict || self.class_conflict || self.room_conflict
    }

    pub fn conflicting_dimensions(&self) -> Vec<ConflictDimension> {
        [
            (self.lecturer_conflict, ConflictDimension::Lecturer),
            (self.class_conflict, ConflictDimension::ClassSection),
            (self.room_conflict, ConflictDimension::Room),
        ]
        .into_iter()
        .filter_map(|(hit, dimension)| hit.then_some(dimension))
        .collect()
    }

    /// Maps the outcome to the error a creation or update is rejected with.
    pub fn into_result(self, data: &NewScheduleData) -> Result<(), CoreError> {
        if self.missing_fields {
            return Err(CoreError::MissingFields(missing_fields(data)));
        }
        if self.has_conflict() {
            return Err(CoreError::ScheduleConflict(self.conflicting_dimensions()));
        }
        Ok(())
    }
}

/// Names of the required fields absent from `data`, in declaration order.
pub fn missing_fields(data: &NewScheduleData) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if data.subject_id.is_none() {
        missing.push("subject_id");
    }
    if data.class_id.as_deref().map_or(true, |c| c.trim().is_empty()) {
        missing.push("class_id");
    }
    if data.lecturer_id.is_none() {
        missing.push("lecturer_id");
    }
    if data.start_time.is_none() {
        missing.push("start_time");
    }
    if data.end_time.is_none() {
        missing.push("end_time");
    }
    missing
}

/// A session must end after it starts.
pub fn check_window(start: NaiveTime, end: NaiveTime) -> Result<(), CoreError> {
    if start < end {
        Ok(())
    } else {
        Err(CoreError::InvalidInput(format!(
            "Session must end after it starts ({} - {})",
            start.format("%H:%M"),
            end.format("%H:%M")
        )))
    }
}

/// Builds the conflict-check view of `data`, or `None` when a required field is absent.
pub fn candidate_from(data: &NewScheduleData) -> Option<ScheduleCandidate> {
    if !missing_fields(data).is_empty() {
        return None;
    }
    Some(ScheduleCandidate {
        lecturer_id: data.lecturer_id?,
        class_id: data.class_id.clone()?,
        room_id: data.room_id,
        start_time: data.start_time?,
        end_time: data.end_time?,
        specific_date: data.specific_date,
    })
}

pub struct ScheduleValidator<'a, R: ?Sized> {
    repo: &'a R,
}

impl<'a, R: ScheduleRepository + ?Sized> ScheduleValidator<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// Field presence only.
    pub fn validate(&self, data: &NewScheduleData) -> Result<(), CoreError> {
        let missing = missing_fields(data);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CoreError::MissingFields(missing))
        }
    }

    /// Checks the lecturer and class dimensions, and the room when one is set.
    ///
    /// Missing required fields short-circuit with every conflict flag false.
    pub async fn validate_for_conflicts(
        &self,
        data: &NewScheduleData,
        exclude_id: Option<i64>,
    ) -> Result<ValidationOutcome, CoreError> {
        let Some(candidate) = candidate_from(data) else {
            return Ok(ValidationOutcome {
                missing_fields: true,
                ..Default::default()
            });
        };

        let checker = ConflictChecker::new(self.repo);
        let lecturer_conflict = checker
            .has_conflict(ConflictDimension::Lecturer, &candidate, exclude_id)
            .await?;
        let class_conflict = checker
            .has_conflict(ConflictDimension::ClassSection, &candidate, exclude_id)
            .await?;
        let room_conflict = if candidate.room_id.is_some() {
            checker
                .has_conflict(ConflictDimension::Room, &candidate, exclude_id)
                .await?
        } else {
            false
        };

        let outcome = ValidationOutcome {
            missing_fields: false,
            lecturer_conflict,
            class_conflict,
            room_conflict,
        };
        debug!(?outcome, ?exclude_id, "validated schedule candidate");
        Ok(outcome)
    }
}
