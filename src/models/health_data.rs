use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartRate {
    pub resting_hr: u32,
    // The device simulators disagree on this name.
    #[serde(alias = "average_weekly_hr", alias = "average_daily_hr")]
    pub average_hr: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hrv {
    pub average_hrv: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sleep {
    pub sleep_duration_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalActivity {
    pub steps: u32,
    pub calories_burned: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpO2 {
    pub average_spo2: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkinTemperature {
    pub deviation_celsius: f64,
}

/// One device snapshot. Every group is required: a partial payload fails to
/// decode instead of being defaulted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceMetrics {
    pub date: NaiveDate,
    pub heart_rate: HeartRate,
    pub hrv: Hrv,
    pub sleep: Sleep,
    pub activity: PhysicalActivity,
    pub spo2: SpO2,
    pub skin_temp: SkinTemperature,
}

impl DeviceMetrics {
    /// Range checks on top of the structural decode.
    pub fn validate(&self) -> Result<(), String> {
        if self.heart_rate.resting_hr == 0 || self.heart_rate.resting_hr > 250 {
            return Err(format!("resting_hr out of range: {}", self.heart_rate.resting_hr));
        }
        if self.heart_rate.average_hr == 0 || self.heart_rate.average_hr > 250 {
            return Err(format!("average_hr out of range: {}", self.heart_rate.average_hr));
        }
        if !(0.0..=24.0).contains(&self.sleep.sleep_duration_hours) {
            return Err(format!(
                "sleep_duration_hours out of range: {}",
                self.sleep.sleep_duration_hours
            ));
        }
        if !(0.0..=100.0).contains(&self.spo2.average_spo2) {
            return Err(format!("average_spo2 out of range: {}", self.spo2.average_spo2));
        }
        if !self.skin_temp.deviation_celsius.is_finite() {
            return Err("deviation_celsius is not a finite number".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn device_metrics() -> DeviceMetrics {
        DeviceMetrics {
            date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            heart_rate: HeartRate { resting_hr: 64, average_hr: 81 },
            hrv: Hrv { average_hrv: 42 },
            sleep: Sleep { sleep_duration_hours: 7.2 },
            activity: PhysicalActivity { steps: 6400, calories_burned: 520 },
            spo2: SpO2 { average_spo2: 97.4 },
            skin_temp: SkinTemperature { deviation_celsius: -0.12 },
        }
    }
}
