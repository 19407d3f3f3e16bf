use actix_web::{web, HttpResponse};
use chrono::{Duration, Utc};
use sqlx::PgPool;

use crate::auth::identity::Caller;
use crate::db::{daily_records, users};
use crate::error::AppError;
use crate::handlers::analysis_handler::{disease_risk_for, evaluation_for, recommendations_for, summary_for};
use crate::models::common::{PageQuery, PatientPage};
use crate::models::daily_record::TimelinePoint;
use crate::models::doctor::{
    PatientSearchQuery, PatientSearchResponse, TimelineQuery, TimelineResponse, MAX_SEARCH_RESULTS,
};
use crate::models::summary::DashboardStats;
use crate::services::evaluation_service::EvaluationOrchestrator;

const ACTIVE_WINDOW_DAYS: i64 = 7;

#[tracing::instrument(name = "List patients", skip(pool, caller, query), fields(doctor_id = %caller.subject_id))]
pub async fn list_patients(
    pool: web::Data<PgPool>,
    caller: web::ReqData<Caller>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    caller.require_doctor()?;
    query.validate().map_err(AppError::Validation)?;

    let patients = users::list_patients(&pool, query.skip, query.limit).await?;
    let total = users::count_patients(&pool).await?;

    Ok(HttpResponse::Ok().json(PatientPage {
        patients,
        total,
        skip: query.skip,
        limit: query.limit,
    }))
}

#[tracing::instrument(name = "Search patients", skip(pool, caller, query), fields(doctor_id = %caller.subject_id))]
pub async fn search_patients(
    pool: web::Data<PgPool>,
    caller: web::ReqData<Caller>,
    query: web::Query<PatientSearchQuery>,
) -> Result<HttpResponse, AppError> {
    caller.require_doctor()?;
    query.validate().map_err(AppError::Validation)?;

    let patients = users::search_patients(
        &pool,
        query.email_filter(),
        query.age_min,
        query.age_max,
        MAX_SEARCH_RESULTS,
    )
    .await?;

    Ok(HttpResponse::Ok().json(PatientSearchResponse {
        count: patients.len(),
        patients,
    }))
}

#[tracing::instrument(name = "Doctor views patient profile", skip(pool, caller), fields(doctor_id = %caller.subject_id))]
pub async fn get_patient_profile(
    pool: web::Data<PgPool>,
    caller: web::ReqData<Caller>,
    patient_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    caller.require_doctor()?;
    let profile = users::find_profile(&pool, &patient_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Patient not found".to_string()))?;
    Ok(HttpResponse::Ok().json(profile))
}

#[tracing::instrument(name = "Doctor views patient check-ins", skip(pool, caller), fields(doctor_id = %caller.subject_id))]
pub async fn get_patient_checkins(
    pool: web::Data<PgPool>,
    caller: web::ReqData<Caller>,
    patient_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    caller.require_doctor()?;
    let records = daily_records::records_for_user(&pool, &patient_id, None).await?;
    Ok(HttpResponse::Ok().json(records))
}

#[tracing::instrument(name = "Doctor views patient summary", skip(pool, caller), fields(doctor_id = %caller.subject_id))]
pub async fn get_patient_summary(
    pool: web::Data<PgPool>,
    caller: web::ReqData<Caller>,
    patient_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    caller.require_doctor()?;
    summary_for(&pool, &patient_id).await
}

#[tracing::instrument(name = "Doctor views patient timeline", skip(pool, caller, query), fields(doctor_id = %caller.subject_id))]
pub async fn get_patient_timeline(
    pool: web::Data<PgPool>,
    caller: web::ReqData<Caller>,
    patient_id: web::Path<String>,
    query: web::Query<TimelineQuery>,
) -> Result<HttpResponse, AppError> {
    caller.require_doctor()?;
    query.validate().map_err(AppError::Validation)?;

    let since = Utc::now() - Duration::days(query.days);
    let records = daily_records::records_since(&pool, &patient_id, since).await?;

    Ok(HttpResponse::Ok().json(TimelineResponse {
        patient_id: patient_id.into_inner(),
        timeline: records.iter().map(TimelinePoint::from).collect(),
    }))
}

#[tracing::instrument(name = "Doctor analyzes patient", skip(pool, orchestrator, caller), fields(doctor_id = %caller.subject_id))]
pub async fn analyze_patient(
    pool: web::Data<PgPool>,
    orchestrator: web::Data<EvaluationOrchestrator>,
    caller: web::ReqData<Caller>,
    patient_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    caller.require_doctor()?;
    evaluation_for(&pool, &orchestrator, &patient_id).await
}

#[tracing::instrument(name = "Doctor requests recommendations", skip(pool, orchestrator, caller), fields(doctor_id = %caller.subject_id))]
pub async fn recommend_for_patient(
    pool: web::Data<PgPool>,
    orchestrator: web::Data<EvaluationOrchestrator>,
    caller: web::ReqData<Caller>,
    patient_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    caller.require_doctor()?;
    recommendations_for(&pool, &orchestrator, &patient_id).await
}

#[tracing::instrument(name = "Doctor requests disease risk", skip(pool, orchestrator, caller), fields(doctor_id = %caller.subject_id))]
pub async fn disease_risk_for_patient(
    pool: web::Data<PgPool>,
    orchestrator: web::Data<EvaluationOrchestrator>,
    caller: web::ReqData<Caller>,
    patient_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    caller.require_doctor()?;
    disease_risk_for(&pool, &orchestrator, &patient_id).await
}

#[tracing::instrument(name = "Doctor dashboard", skip(pool, caller), fields(doctor_id = %caller.subject_id))]
pub async fn get_dashboard(
    pool: web::Data<PgPool>,
    caller: web::ReqData<Caller>,
) -> Result<HttpResponse, AppError> {
    caller.require_doctor()?;

    let week_ago = Utc::now() - Duration::days(ACTIVE_WINDOW_DAYS);
    let stats = DashboardStats {
        total_patients: users::count_patients(&pool).await?,
        active_patients_last_week: daily_records::count_active_users_since(&pool, week_ago).await?,
        total_checkins: daily_records::count_records(&pool).await?,
    };
    Ok(HttpResponse::Ok().json(stats))
}
