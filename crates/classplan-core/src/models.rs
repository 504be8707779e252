use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use thiserror::Error;

/// Attendance state of a teaching session.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    #[default]
    NotYet,
    Attended,
    Online,
    Absent,
}

impl std::fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleStatus::NotYet => write!(f, "not_yet"),
            ScheduleStatus::Attended => write!(f, "attended"),
            ScheduleStatus::Online => write!(f, "online"),
            ScheduleStatus::Absent => write!(f, "absent"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid schedule status: {0}")]
pub struct ParseScheduleStatusError(String);

impl FromStr for ScheduleStatus {
    type Err = ParseScheduleStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "not_yet" | "notyet" => Ok(ScheduleStatus::NotYet),
            "attended" => Ok(ScheduleStatus::Attended),
            "online" => Ok(ScheduleStatus::Online),
            "absent" => Ok(ScheduleStatus::Absent),
            _ => Err(ParseScheduleStatusError(s.to_string())),
        }
    }
}

/// A class/teaching session.
///
/// `specific_date == None` marks a recurring weekly template; a dated entry is
/// either a one-time session or an instance produced by recurring expansion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ScheduleEntry {
    pub id: i64,
    pub subject_id: i64,
    /// Class-section identifier
    pub class_id: String,
    pub lecturer_id: i64,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub specific_date: Option<NaiveDate>,
    pub room_id: Option<i64>,
    pub building: Option<String>,
    pub status: ScheduleStatus,
    pub term_id: Option<i64>,
    /// Inactive entries are kept but ignored by conflict checks and listings
    pub is_active: bool,
    pub is_recurring: bool,
    /// Size of the batch this entry was expanded with (same on every instance)
    pub recurrence_count: i32,
    /// 0-based position inside a recurring batch
    pub occurrence_index: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ScheduleEntry {
    pub fn is_template(&self) -> bool {
        self.specific_date.is_none()
    }

    /// ISO day of week (1 = Monday .. 7 = Sunday) of a dated entry.
    pub fn day_of_week(&self) -> Option<u32> {
        self.specific_date.map(|d| d.weekday().number_from_monday())
    }
}

/// A proposed session, used both for creation and as the candidate of a
/// conflict check. Required fields are optional here so that their absence can
/// be reported instead of rejected by the type system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewScheduleData {
    pub subject_id: Option<i64>,
    pub class_id: Option<String>,
    pub lecturer_id: Option<i64>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub specific_date: Option<NaiveDate>,
    pub room_id: Option<i64>,
    pub building: Option<String>,
    pub status: Option<ScheduleStatus>,
    pub term_id: Option<i64>,
    /// Defaults to true
    pub is_active: Option<bool>,
    /// Only read by recurring creation; defaults to 1
    pub recurrence_count: Option<i32>,
}

impl From<&ScheduleEntry> for NewScheduleData {
    fn from(entry: &ScheduleEntry) -> Self {
        Self {
            subject_id: Some(entry.subject_id),
            class_id: Some(entry.class_id.clone()),
            lecturer_id: Some(entry.lecturer_id),
            start_time: Some(entry.start_time),
            end_time: Some(entry.end_time),
            specific_date: entry.specific_date,
            room_id: entry.room_id,
            building: entry.building.clone(),
            status: Some(entry.status),
            term_id: entry.term_id,
            is_active: Some(entry.is_active),
            recurrence_count: Some(entry.recurrence_count),
        }
    }
}

/// Partial update of a schedule entry. `None` leaves the stored value alone;
/// for nullable columns `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct UpdateScheduleData {
    pub subject_id: Option<i64>,
    pub class_id: Option<String>,
    pub lecturer_id: Option<i64>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub specific_date: Option<Option<NaiveDate>>,
    pub room_id: Option<Option<i64>>,
    pub building: Option<Option<String>>,
    pub status: Option<ScheduleStatus>,
    pub term_id: Option<Option<i64>>,
    pub is_active: Option<bool>,
}

impl UpdateScheduleData {
    pub fn is_empty(&self) -> bool {
        self.subject_id.is_none()
            && self.class_id.is_none()
            && self.lecturer_id.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
            && self.specific_date.is_none()
            && self.room_id.is_none()
            && self.building.is_none()
            && self.status.is_none()
            && self.term_id.is_none()
            && self.is_active.is_none()
    }

    pub fn apply_to(self, entry: &mut ScheduleEntry) {
        if let Some(subject_id) = self.subject_id {
            entry.subject_id = subject_id;
        }
        if let Some(class_id) = self.class_id {
            entry.class_id = class_id;
        }
        if let Some(lecturer_id) = self.lecturer_id {
            entry.lecturer_id = lecturer_id;
        }
        if let Some(start_time) = self.start_time {
            entry.start_time = start_time;
        }
        if let Some(end_time) = self.end_time {
            entry.end_time = end_time;
        }
        if let Some(specific_date) = self.specific_date {
            entry.specific_date = specific_date;
        }
        if let Some(room_id) = self.room_id {
            entry.room_id = room_id;
        }
        if let Some(building) = self.building {
            entry.building = building;
        }
        if let Some(status) = self.status {
            entry.status = status;
        }
        if let Some(term_id) = self.term_id {
            entry.term_id = term_id;
        }
        if let Some(is_active) = self.is_active {
            entry.is_active = is_active;
        }
    }
}

// ============================================================================
// Personal calendar entries
// ============================================================================

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum PersonalEntryType {
    Class,
    Exam,
    Assignment,
    Meeting,
    Personal,
    #[default]
    Other,
}

impl std::fmt::Display for PersonalEntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersonalEntryType::Class => write!(f, "CLASS"),
            PersonalEntryType::Exam => write!(f, "EXAM"),
            PersonalEntryType::Assignment => write!(f, "ASSIGNMENT"),
            PersonalEntryType::Meeting => write!(f, "MEETING"),
            PersonalEntryType::Personal => write!(f, "PERSONAL"),
            PersonalEntryType::Other => write!(f, "OTHER"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid personal entry type: {0}")]
pub struct ParsePersonalEntryTypeError(String);

impl FromStr for PersonalEntryType {
    type Err = ParsePersonalEntryTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "class" => Ok(PersonalEntryType::Class),
            "exam" => Ok(PersonalEntryType::Exam),
            "assignment" => Ok(PersonalEntryType::Assignment),
            "meeting" => Ok(PersonalEntryType::Meeting),
            "personal" => Ok(PersonalEntryType::Personal),
            "other" => Ok(PersonalEntryType::Other),
            _ => Err(ParsePersonalEntryTypeError(s.to_string())),
        }
    }
}

impl PersonalEntryType {
    /// Case-insensitive parse that falls back to `Other` for blank or unknown input.
    pub fn parse_lenient(s: &str) -> Self {
        if s.trim().is_empty() {
            tracing::warn!("empty personal entry type, defaulting to OTHER");
            return PersonalEntryType::Other;
        }
        s.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(value = s, "unknown personal entry type, defaulting to OTHER");
            PersonalEntryType::Other
        })
    }
}

pub const DEFAULT_PERSONAL_COLOR: &str = "#3B82F6";
pub const DEFAULT_REMINDER_MINUTES: i32 = 15;

/// An item on an individual user's calendar. Unlike [`ScheduleEntry`] it
/// carries full datetimes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PersonalEntry {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    #[serde(rename = "type")]
    pub entry_type: PersonalEntryType,
    pub location: Option<String>,
    pub color: String,
    pub is_recurring: bool,
    /// Opaque; never interpreted by the engine
    pub recurrence_pattern: Option<String>,
    pub reminder_minutes: i32,
    pub is_reminder_sent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewPersonalEntryData {
    pub user_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    pub entry_type: Option<PersonalEntryType>,
    pub location: Option<String>,
    pub color: Option<String>,
    pub is_recurring: bool,
    pub recurrence_pattern: Option<String>,
    pub reminder_minutes: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdatePersonalEntryData {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    pub entry_type: Option<PersonalEntryType>,
    pub location: Option<Option<String>>,
    pub color: Option<String>,
    pub is_recurring: Option<bool>,
    pub recurrence_pattern: Option<Option<String>>,
    pub reminder_minutes: Option<i32>,
}

impl UpdatePersonalEntryData {
    pub fn apply_to(self, entry: &mut PersonalEntry) {
        if let Some(title) = self.title {
            entry.title = title;
        }
        if let Some(description) = self.description {
            entry.description = description;
        }
        if let Some(start_time) = self.start_time {
            entry.start_time = start_time;
        }
        if let Some(end_time) = self.end_time {
            entry.end_time = end_time;
        }
        if let Some(entry_type) = self.entry_type {
            entry.entry_type = entry_type;
        }
        if let Some(location) = self.location {
            entry.location = location;
        }
        if let Some(color) = self.color {
            entry.color = color;
        }
        if let Some(is_recurring) = self.is_recurring {
            entry.is_recurring = is_recurring;
        }
        if let Some(recurrence_pattern) = self.recurrence_pattern {
            entry.recurrence_pattern = recurrence_pattern;
        }
        if let Some(reminder_minutes) = self.reminder_minutes {
            entry.reminder_minutes = reminder_minutes;
        }
    }
}
