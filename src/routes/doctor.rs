use actix_web::{get, web, HttpResponse};
use sqlx::PgPool;

use crate::auth::identity::Caller;
use crate::error::AppError;
use crate::handlers::doctor_handler;
use crate::models::common::PageQuery;
use crate::models::doctor::{PatientSearchQuery, TimelineQuery};
use crate::services::evaluation_service::EvaluationOrchestrator;

#[get("/patients")]
async fn list_patients(
    pool: web::Data<PgPool>,
    caller: web::ReqData<Caller>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    doctor_handler::list_patients(pool, caller, query).await
}

#[get("/patients/search")]
async fn search_patients(
    pool: web::Data<PgPool>,
    caller: web::ReqData<Caller>,
    query: web::Query<PatientSearchQuery>,
) -> Result<HttpResponse, AppError> {
    doctor_handler::search_patients(pool, caller, query).await
}

#[get("/patients/{patient_id}/profile")]
async fn patient_profile(
    pool: web::Data<PgPool>,
    caller: web::ReqData<Caller>,
    patient_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    doctor_handler::get_patient_profile(pool, caller, patient_id).await
}

#[get("/patients/{patient_id}/checkins")]
async fn patient_checkins(
    pool: web::Data<PgPool>,
    caller: web::ReqData<Caller>,
    patient_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    doctor_handler::get_patient_checkins(pool, caller, patient_id).await
}

#[get("/patients/{patient_id}/summary")]
async fn patient_summary(
    pool: web::Data<PgPool>,
    caller: web::ReqData<Caller>,
    patient_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    doctor_handler::get_patient_summary(pool, caller, patient_id).await
}

#[get("/patients/{patient_id}/timeline")]
async fn patient_timeline(
    pool: web::Data<PgPool>,
    caller: web::ReqData<Caller>,
    patient_id: web::Path<String>,
    query: web::Query<TimelineQuery>,
) -> Result<HttpResponse, AppError> {
    doctor_handler::get_patient_timeline(pool, caller, patient_id, query).await
}

#[get("/patients/{patient_id}/analyze")]
async fn analyze_patient(
    pool: web::Data<PgPool>,
    orchestrator: web::Data<EvaluationOrchestrator>,
    caller: web::ReqData<Caller>,
    patient_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    doctor_handler::analyze_patient(pool, orchestrator, caller, patient_id).await
}

#[get("/patients/{patient_id}/recommend")]
async fn recommend_for_patient(
    pool: web::Data<PgPool>,
    orchestrator: web::Data<EvaluationOrchestrator>,
    caller: web::ReqData<Caller>,
    patient_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    doctor_handler::recommend_for_patient(pool, orchestrator, caller, patient_id).await
}

#[get("/patients/{patient_id}/disease-risk")]
async fn patient_disease_risk(
    pool: web::Data<PgPool>,
    orchestrator: web::Data<EvaluationOrchestrator>,
    caller: web::ReqData<Caller>,
    patient_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    doctor_handler::disease_risk_for_patient(pool, orchestrator, caller, patient_id).await
}

#[get("/dashboard")]
async fn dashboard(
    pool: web::Data<PgPool>,
    caller: web::ReqData<Caller>,
) -> Result<HttpResponse, AppError> {
    doctor_handler::get_dashboard(pool, caller).await
}
