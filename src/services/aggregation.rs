use sqlx::PgPool;

use crate::db::daily_records;
use crate::error::AppError;
use crate::models::daily_record::DailyRecord;
use crate::models::summary::{AverageMetrics, DateRange, HealthSummary};

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Summary statistics over every record given, in any order.
///
/// An empty slice yields the empty summary: zero counts and no means.
pub fn summarize_records(records: &[DailyRecord]) -> HealthSummary {
    let Some(latest) = records.iter().max_by_key(|r| r.date) else {
        return HealthSummary::default();
    };
    let earliest = records.iter().map(|r| r.date).min();

    HealthSummary {
        total_checkins: records.len(),
        date_range: DateRange {
            earliest,
            latest: Some(latest.date),
        },
        average_metrics: AverageMetrics {
            resting_heart_rate: mean(records.iter().map(|r| r.device_data.heart_rate.resting_hr as f64)),
            sleep_hours: mean(records.iter().map(|r| r.device_data.sleep.sleep_duration_hours)),
            daily_steps: mean(records.iter().map(|r| r.device_data.activity.steps as f64)),
            energy_level: mean(records.iter().map(|r| r.checkin_data.energy_level as f64)),
            mood_state: mean(records.iter().map(|r| r.checkin_data.mood_state as f64)),
        },
        latest_weight_kg: Some(latest.checkin_data.body_weight_kg),
        illness_count: records
            .iter()
            .filter(|r| r.checkin_data.illness_symptoms.present)
            .count(),
    }
}

#[tracing::instrument(name = "Summarize records", skip(pool))]
pub async fn summarize(pool: &PgPool, owner_id: &str) -> Result<HealthSummary, AppError> {
    let records = daily_records::records_for_user(pool, owner_id, None).await?;
    Ok(summarize_records(&records))
}
