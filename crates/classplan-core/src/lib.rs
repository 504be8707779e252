//! # Classplan Core Library
//!
//! Engine for class timetables: conflict detection across lecturers, class
//! sections and rooms, weekly recurrence expansion, and materialization of
//! recurring templates and dated overrides into concrete calendars.
//!
//! ## Core Modules
//!
//! - [`db`]: Database connection and migration management
//! - [`models`]: Schedule entries, personal entries and transfer objects
//! - [`repository`]: Storage contracts and their SQLite implementation
//! - [`conflict`]: Per-dimension overlap checks
//! - [`validation`]: Required-field and conflict validation of proposals
//! - [`recurrence`]: Fixed weekly expansion of recurring sessions
//! - [`materialization`]: Template/override resolution and weekly views
//! - [`service`]: The operations exposed to callers
//! - [`timezone`]: Timezone parsing and local "today"
//! - [`config`]: Engine settings
//! - [`error`]: Error types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use classplan_core::{
//!     config::ScheduleConfig, db, models::NewScheduleData,
//!     repository::SqliteRepository, service::ScheduleService,
//! };
//! use chrono::NaiveTime;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = db::establish_connection("classplan.db").await?;
//!     let service = ScheduleService::new(SqliteRepository::new(pool), &ScheduleConfig::default())?;
//!
//!     let sessions = service
//!         .create_recurring_schedules(NewScheduleData {
//!             subject_id: Some(12),
//!             class_id: Some("SE1801".to_string()),
//!             lecturer_id: Some(7),
//!             start_time: NaiveTime::from_hms_opt(9, 0, 0),
//!             end_time: NaiveTime::from_hms_opt(10, 30, 0),
//!             recurrence_count: Some(10),
//!             ..Default::default()
//!         })
//!         .await?;
//!     println!("Created {} weekly sessions", sessions.len());
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod conflict;
pub mod db;
pub mod error;
pub mod materialization;
pub mod models;
pub mod recurrence;
pub mod repository;
pub mod service;
pub mod timezone;
pub mod validation;
