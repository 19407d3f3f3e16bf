use serde::{Deserialize, Serialize};

use crate::models::daily_record::TimelinePoint;
use crate::models::user::BaselineProfile;

pub const MAX_SEARCH_RESULTS: i64 = 50;
pub const DEFAULT_TIMELINE_DAYS: i64 = 30;
pub const MAX_TIMELINE_DAYS: i64 = 365;

#[derive(Debug, Deserialize)]
pub struct PatientSearchQuery {
    pub email: Option<String>,
    pub age_min: Option<i32>,
    pub age_max: Option<i32>,
}

impl PatientSearchQuery {
    pub fn validate(&self) -> Result<(), String> {
        if let (Some(min), Some(max)) = (self.age_min, self.age_max) {
            if min > max {
                return Err("age_min must not exceed age_max".to_string());
            }
        }
        Ok(())
    }

    /// Blank email filters match everything.
    pub fn email_filter(&self) -> Option<&str> {
        self.email.as_deref().map(str::trim).filter(|e| !e.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct TimelineQuery {
    #[serde(default = "default_days")]
    pub days: i64,
}

fn default_days() -> i64 {
    DEFAULT_TIMELINE_DAYS
}

impl TimelineQuery {
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=MAX_TIMELINE_DAYS).contains(&self.days) {
            return Err(format!("days must be between 1 and {}", MAX_TIMELINE_DAYS));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct PatientSearchResponse {
    pub count: usize,
    pub patients: Vec<BaselineProfile>,
}

#[derive(Debug, Serialize)]
pub struct TimelineResponse {
    pub patient_id: String,
    pub timeline: Vec<TimelinePoint>,
}
