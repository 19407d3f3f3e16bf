pub mod analysis_handler;
pub mod auth_handler;
pub mod backend_health_handler;
pub mod checkin_handler;
pub mod doctor_handler;
pub mod profile_handler;
