use crate::error::CoreError;
use crate::timezone::parse_timezone;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Runtime settings of the schedule engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// IANA zone in which "today" is evaluated
    pub timezone: String,
    /// How many personal entries an upcoming listing returns
    pub upcoming_limit: usize,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            upcoming_limit: 5,
        }
    }
}

impl ScheduleConfig {
    pub fn tz(&self) -> Result<Tz, CoreError> {
        parse_timezone(&self.timezone)
    }
}
