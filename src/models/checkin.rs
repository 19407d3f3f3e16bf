use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const SCALE_MAX: u8 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IllnessReport {
    pub present: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration_days: Option<u32>,
}

/// Caller-submitted daily check-in. Carries no date: the record date is
/// stamped by the server when the check-in is merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckIn {
    pub body_weight_kg: f64,
    pub illness_symptoms: IllnessReport,
    pub energy_level: u8,
    pub muscle_soreness: u8,
    pub mood_state: u8,
    #[serde(default)]
    pub location_coordinates: Option<Coordinates>,
    #[serde(default)]
    pub additional_notes: Option<String>,
}

impl CheckIn {
    pub fn validate(&self) -> Result<(), AppError> {
        if !(self.body_weight_kg.is_finite() && self.body_weight_kg > 0.0) {
            return Err(AppError::Validation("body_weight_kg must be a positive number".to_string()));
        }
        for (name, value) in [
            ("energy_level", self.energy_level),
            ("muscle_soreness", self.muscle_soreness),
            ("mood_state", self.mood_state),
        ] {
            if value > SCALE_MAX {
                return Err(AppError::Validation(format!(
                    "{} must be between 0 and {}, got {}",
                    name, SCALE_MAX, value
                )));
            }
        }
        if let Some(coordinates) = &self.location_coordinates {
            if !(-90.0..=90.0).contains(&coordinates.latitude)
                || !(-180.0..=180.0).contains(&coordinates.longitude)
            {
                return Err(AppError::Validation("location_coordinates out of range".to_string()));
            }
        }
        Ok(())
    }

    /// Table cell for the illness column of the patient document.
    pub fn illness_label(&self) -> String {
        let illness = &self.illness_symptoms;
        if !illness.present {
            return "No".to_string();
        }
        let description = illness
            .description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or("Yes");
        match illness.duration_days {
            Some(days) if days > 0 => format!("{} ({} days)", description, days),
            _ => description.to_string(),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn checkin(weight: f64, energy: u8, mood: u8, ill: bool) -> CheckIn {
        CheckIn {
            body_weight_kg: weight,
            illness_symptoms: IllnessReport {
                present: ill,
                description: ill.then(|| "Headache".to_string()),
                duration_days: ill.then_some(2),
            },
            energy_level: energy,
            muscle_soreness: 3,
            mood_state: mood,
            location_coordinates: Some(Coordinates { latitude: 12.97, longitude: 77.59 }),
            additional_notes: None,
        }
    }
}
