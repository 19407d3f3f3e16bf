use std::fmt;
use std::str::FromStr;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use secrecy::{ExposeSecret, SecretString};
use sqlx::types::Json;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Doctor => "doctor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "patient" => Ok(Role::Patient),
            "doctor" => Ok(Role::Doctor),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MedicalHistory {
    #[serde(default)]
    pub chronic_conditions: Vec<String>,
    #[serde(default)]
    pub past_surgeries: Vec<String>,
    #[serde(default)]
    pub current_medications: Vec<String>,
    #[serde(default)]
    pub known_allergies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FamilyHistory {
    #[serde(default)]
    pub heart_disease: bool,
    #[serde(default)]
    pub diabetes: bool,
    #[serde(default)]
    pub cancer: bool,
    #[serde(default)]
    pub other_hereditary_conditions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifestyleFactors {
    pub smoking_status: String,
    pub alcohol_consumption: String,
    pub exercise_habits: String,
}

/// One-time registration data plus the mutable latest weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineProfile {
    pub id: String,
    pub email: String,
    pub age: i32,
    pub height_cm: f64,
    pub sex: String,
    pub latest_weight_kg: Option<f64>,
    pub medical_history: MedicalHistory,
    pub family_history: FamilyHistory,
    pub lifestyle_factors: LifestyleFactors,
}

/// Row shape of the `users` table. Nested history documents are decoded
/// from JSONB here; a document that does not match surfaces as a storage error.
#[derive(sqlx::FromRow)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub age: i32,
    pub height_cm: f64,
    pub sex: String,
    pub medical_history: Json<MedicalHistory>,
    pub family_history: Json<FamilyHistory>,
    pub lifestyle_factors: Json<LifestyleFactors>,
    pub latest_weight_kg: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for BaselineProfile {
    fn from(row: UserRow) -> Self {
        BaselineProfile {
            id: row.id,
            email: row.email,
            age: row.age,
            height_cm: row.height_cm,
            sex: row.sex,
            latest_weight_kg: row.latest_weight_kg,
            medical_history: row.medical_history.0,
            family_history: row.family_history.0,
            lifestyle_factors: row.lifestyle_factors.0,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    #[serde(serialize_with = "serialize_secret_string", deserialize_with = "deserialize_secret_string")]
    pub password: SecretString,
    pub age: i32,
    pub height_cm: f64,
    pub sex: String,
    #[serde(default)]
    pub medical_history: MedicalHistory,
    #[serde(default)]
    pub family_history: FamilyHistory,
    pub lifestyle_factors: LifestyleFactors,
}

impl SignUpRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if !is_plausible_email(&self.email) {
            return Err(AppError::Validation("A valid email address is required".to_string()));
        }
        if self.password.expose_secret().chars().count() < 8 {
            return Err(AppError::Validation("Password must be at least 8 characters".to_string()));
        }
        validate_demographics(self.age, self.height_cm)
    }
}

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub age: i32,
    pub height_cm: f64,
    pub sex: String,
    #[serde(default)]
    pub latest_weight_kg: Option<f64>,
    pub medical_history: MedicalHistory,
    pub family_history: FamilyHistory,
    pub lifestyle_factors: LifestyleFactors,
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(weight) = self.latest_weight_kg {
            if !(weight.is_finite() && weight > 0.0) {
                return Err(AppError::Validation("Weight must be a positive number".to_string()));
            }
        }
        validate_demographics(self.age, self.height_cm)
    }
}

#[derive(Serialize)]
pub struct SignUpResponse {
    pub message: String,
    pub user_id: String,
}

fn validate_demographics(age: i32, height_cm: f64) -> Result<(), AppError> {
    if !(0..=120).contains(&age) {
        return Err(AppError::Validation("Age must be between 0 and 120".to_string()));
    }
    if !(height_cm.is_finite() && height_cm > 0.0) {
        return Err(AppError::Validation("Height must be a positive number".to_string()));
    }
    Ok(())
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}

pub fn serialize_secret_string<S>(_: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str("[REDACTED]")
}

pub fn deserialize_secret_string<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(SecretString::new(s.into_boxed_str()))
}
