use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct DateRange {
    pub earliest: Option<DateTime<Utc>>,
    pub latest: Option<DateTime<Utc>>,
}

/// Means over every retained record. `None` when there are no records.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct AverageMetrics {
    pub resting_heart_rate: Option<f64>,
    pub sleep_hours: Option<f64>,
    pub daily_steps: Option<f64>,
    pub energy_level: Option<f64>,
    pub mood_state: Option<f64>,
}

/// Derived view, recomputed on demand and never stored.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct HealthSummary {
    pub total_checkins: usize,
    pub date_range: DateRange,
    pub average_metrics: AverageMetrics,
    pub latest_weight_kg: Option<f64>,
    pub illness_count: usize,
}

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_patients: i64,
    pub active_patients_last_week: i64,
    pub total_checkins: i64,
}
