use actix_web::web;

pub mod auth;
pub mod backend_health;
pub mod checkins;
pub mod doctor;
pub mod patient;

use crate::middleware::auth::AuthMiddleware;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(backend_health::root)
        .service(backend_health::backend_health);

    cfg.service(
        web::scope("/api/v1/auth")
            .service(auth::signup)
            .service(auth::login)
    );
    // Patient routes (patient role only)
    cfg.service(
        web::scope("/api/v1/user")
            .wrap(AuthMiddleware::patient())
            .service(patient::get_profile)
            .service(patient::update_profile)
            .service(patient::create_checkin)
            .service(patient::list_checkins)
            .service(patient::summary)
            .service(patient::evaluation)
            .service(patient::recommendation)
            .service(patient::disease_risk)
            .service(patient::latest_insight)
    );
    // Single check-in routes (either role; ownership checked in handlers)
    cfg.service(
        web::scope("/api/v1/checkins")
            .wrap(AuthMiddleware::any())
            .service(checkins::get_record)
            .service(checkins::delete_record)
    );
    // Doctor routes (doctor role only)
    cfg.service(
        web::scope("/api/v1/doctor")
            .wrap(AuthMiddleware::doctor())
            .service(doctor::list_patients)
            .service(doctor::search_patients)
            .service(doctor::patient_profile)
            .service(doctor::patient_checkins)
            .service(doctor::patient_summary)
            .service(doctor::patient_timeline)
            .service(doctor::analyze_patient)
            .service(doctor::recommend_for_patient)
            .service(doctor::patient_disease_risk)
            .service(doctor::dashboard)
    );
}
