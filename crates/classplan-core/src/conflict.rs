//! Collision detection between a proposed session and existing bookings.
//!
//! A session occupies three independent resources: its lecturer, its class
//! section and (optionally) its room. Two sessions collide on a resource when
//! their dates are compatible and their time windows overlap under the
//! boundary policy of [`times_overlap`].

use crate::error::CoreError;
use crate::models::ScheduleEntry;
use crate::repository::ScheduleRepository;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A resource whose bookings must not overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictDimension {
    Lecturer,
    ClassSection,
    Room,
}

impl std::fmt::Display for ConflictDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConflictDimension::Lecturer => write!(f, "lecturer"),
            ConflictDimension::ClassSection => write!(f, "class"),
            ConflictDimension::Room => write!(f, "room"),
        }
    }
}

/// The fields of a proposed session that take part in a conflict check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleCandidate {
    pub lecturer_id: i64,
    pub class_id: String,
    pub room_id: Option<i64>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub specific_date: Option<NaiveDate>,
}

/// Whether two entries' dates allow them to collide at all.
///
/// Two dated entries must share the date; two templates always may collide.
/// A template is never compared against a dated entry, even one falling on
/// the same weekday.
#[inline]
pub fn dates_compatible(a: Option<NaiveDate>, b: Option<NaiveDate>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        (None, None) => true,
        _ => false,
    }
}

/// Overlap test with the boundary policy the timetable has always used: a
/// strict interval overlap, or identical starts, or identical ends.
///
/// Back-to-back windows (`a_end == b_start`) only count when one of the
/// equality arms also holds.
#[inline]
pub fn times_overlap(
    a_start: NaiveTime,
    a_end: NaiveTime,
    b_start: NaiveTime,
    b_end: NaiveTime,
) -> bool {
    (a_start < b_end && a_end > b_start) || a_start == b_start || a_end == b_end
}

/// Whether `candidate` collides with `existing`, ignoring which resource they share.
pub fn collides_with(candidate: &ScheduleCandidate, existing: &ScheduleEntry) -> bool {
    dates_compatible(candidate.specific_date, existing.specific_date)
        && times_overlap(
            candidate.start_time,
            candidate.end_time,
            existing.start_time,
            existing.end_time,
        )
}

/// Entries from `existing` that collide with `candidate`.
///
/// Inactive entries and the entry whose id is `exclude_id` are skipped.
pub fn find_conflicts<'a>(
    candidate: &'a ScheduleCandidate,
    existing: &'a [ScheduleEntry],
    exclude_id: Option<i64>,
) -> impl Iterator<Item = &'a ScheduleEntry> + 'a {
    existing.iter().filter(move |entry| {
        entry.is_active && Some(entry.id) != exclude_id && collides_with(candidate, entry)
    })
}

/// Runs one-dimension conflict checks against a repository.
pub struct ConflictChecker<'a, R: ?Sized> {
    repo: &'a R,
}

impl<'a, R: ScheduleRepository + ?Sized> ConflictChecker<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// Active entries that share the candidate's resource on `dimension`.
    ///
    /// A candidate without a room has nothing to share on [`ConflictDimension::Room`].
    pub async fn bookings_for(
        &self,
        dimension: ConflictDimension,
        candidate: &ScheduleCandidate,
    ) -> Result<Vec<ScheduleEntry>, CoreError> {
        match dimension {
            ConflictDimension::Lecturer => {
                self.repo.find_active_by_lecturer(candidate.lecturer_id).await
            }
            ConflictDimension::ClassSection => {
                self.repo.find_active_by_class(&candidate.class_id).await
            }
            ConflictDimension::Room => match candidate.room_id {
                Some(room_id) => self.repo.find_active_by_room(room_id).await,
                None => Ok(Vec::new()),
            },
        }
    }

    pub async fn has_conflict(
        &self,
        dimension: ConflictDimension,
        candidate: &ScheduleCandidate,
        exclude_id: Option<i64>,
    ) -> Result<bool, CoreError> {
        let existing = self.bookings_for(dimension, candidate).await?;
        let conflicting: Vec<i64> = find_conflicts(candidate, &existing, exclude_id)
            .map(|e| e.id)
            .collect();

        debug!(
            %dimension,
            checked = existing.len(),
            ?conflicting,
            "conflict check"
        );

        Ok(!conflicting.is_empty())
    }
}
