use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

use crate::models::checkin::CheckIn;
use crate::models::health_data::DeviceMetrics;

/// The persisted merge of exactly one check-in and one device snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub id: Uuid,
    pub user_id: String,
    pub date: DateTime<Utc>,
    pub checkin_data: CheckIn,
    pub device_data: DeviceMetrics,
}

impl DailyRecord {
    /// Stamps a fresh id and the current time. Nothing caller-supplied
    /// influences either. The time is truncated to microseconds, the
    /// precision of the stored column, so the returned record matches what
    /// is read back later.
    pub fn new(user_id: &str, checkin_data: CheckIn, device_data: DeviceMetrics) -> Self {
        DailyRecord {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            date: Utc::now().trunc_subsecs(6),
            checkin_data,
            device_data,
        }
    }
}

#[derive(sqlx::FromRow)]
pub struct DailyRecordRow {
    pub id: Uuid,
    pub user_id: String,
    pub recorded_at: DateTime<Utc>,
    pub checkin: Json<CheckIn>,
    pub device_metrics: Json<DeviceMetrics>,
}

impl From<DailyRecordRow> for DailyRecord {
    fn from(row: DailyRecordRow) -> Self {
        DailyRecord {
            id: row.id,
            user_id: row.user_id,
            date: row.recorded_at,
            checkin_data: row.checkin.0,
            device_data: row.device_metrics.0,
        }
    }
}

/// Headline metrics of one record, for charting.
#[derive(Debug, Serialize)]
pub struct TimelinePoint {
    pub date: DateTime<Utc>,
    pub heart_rate: u32,
    pub hrv: u32,
    pub sleep: f64,
    pub steps: u32,
    pub spo2: f64,
    pub energy: u8,
    pub mood: u8,
}

impl From<&DailyRecord> for TimelinePoint {
    fn from(record: &DailyRecord) -> Self {
        let device = &record.device_data;
        TimelinePoint {
            date: record.date,
            heart_rate: device.heart_rate.resting_hr,
            hrv: device.hrv.average_hrv,
            sleep: device.sleep.sleep_duration_hours,
            steps: device.activity.steps,
            spo2: device.spo2.average_spo2,
            energy: record.checkin_data.energy_level,
            mood: record.checkin_data.mood_state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::checkin::fixtures::checkin;
    use crate::models::health_data::fixtures::device_metrics;

    #[test]
    fn new_record_keeps_inputs_verbatim() {
        let submitted = checkin(72.5, 6, 7, true);
        let snapshot = device_metrics();
        let before = Utc::now().trunc_subsecs(6);

        let record = DailyRecord::new("u1", submitted.clone(), snapshot.clone());

        assert_eq!(record.user_id, "u1");
        assert_eq!(record.checkin_data, submitted);
        assert_eq!(record.device_data, snapshot);
        assert!(record.date >= before && record.date <= Utc::now());
        assert_eq!(
            serde_json::to_vec(&record.checkin_data).unwrap(),
            serde_json::to_vec(&submitted).unwrap()
        );
    }

    #[test]
    fn stamp_has_microsecond_precision() {
        let record = DailyRecord::new("u1", checkin(70.0, 5, 5, false), device_metrics());
        assert_eq!(record.date.timestamp_subsec_nanos() % 1_000, 0);
    }

    #[test]
    fn repeated_records_get_distinct_ids() {
        let ids: std::collections::HashSet<Uuid> = (0..50)
            .map(|_| DailyRecord::new("u1", checkin(70.0, 5, 5, false), device_metrics()).id)
            .collect();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn timeline_point_projects_headline_metrics() {
        let record = DailyRecord::new("u1", checkin(70.0, 4, 8, false), device_metrics());
        let point = TimelinePoint::from(&record);
        assert_eq!(point.heart_rate, 64);
        assert_eq!(point.steps, 6400);
        assert_eq!(point.energy, 4);
        assert_eq!(point.mood, 8);
    }
}
