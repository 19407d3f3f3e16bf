pub mod auth;
pub mod checkin;
pub mod common;
pub mod daily_record;
pub mod doctor;
pub mod evaluation;
pub mod health_data;
pub mod llm;
pub mod summary;
pub mod user;
