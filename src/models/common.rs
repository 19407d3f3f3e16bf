use serde::{Deserialize, Serialize};

use crate::models::user::BaselineProfile;

/// Success envelope for write endpoints. Failures go through `AppError`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }
}

pub const DEFAULT_PAGE_LIMIT: i64 = 50;
pub const MAX_PAGE_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_LIMIT
}

impl PageQuery {
    pub fn validate(&self) -> Result<(), String> {
        if self.skip < 0 {
            return Err("skip must be >= 0".to_string());
        }
        if !(1..=MAX_PAGE_LIMIT).contains(&self.limit) {
            return Err(format!("limit must be between 1 and {}", MAX_PAGE_LIMIT));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct PatientPage {
    pub patients: Vec<BaselineProfile>,
    pub total: i64,
    pub skip: i64,
    pub limit: i64,
}
