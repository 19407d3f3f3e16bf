use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::auth::identity::Caller;
use crate::db::daily_records;
use crate::error::AppError;
use crate::handlers::profile_handler::load_profile;
use crate::models::daily_record::DailyRecord;
use crate::models::evaluation::{AnalysisResponse, InsightResponse, RecommendationsResponse};
use crate::models::user::BaselineProfile;
use crate::services::aggregation;
use crate::services::evaluation_service::EvaluationOrchestrator;
use crate::services::patient_document::MAX_DOCUMENT_RECORDS;

/// Profile plus the records the evaluation window can use. No records is a
/// 404: there is nothing to analyze.
async fn load_for_analysis(
    pool: &PgPool,
    patient_id: &str,
) -> Result<(BaselineProfile, Vec<DailyRecord>), AppError> {
    let profile = load_profile(pool, patient_id).await?;
    let records = daily_records::records_for_user(pool, patient_id, Some(MAX_DOCUMENT_RECORDS as i64)).await?;
    if records.is_empty() {
        return Err(AppError::NotFound("No data for analysis".to_string()));
    }
    Ok((profile, records))
}

pub async fn summary_for(pool: &PgPool, patient_id: &str) -> Result<HttpResponse, AppError> {
    let summary = aggregation::summarize(pool, patient_id).await?;
    Ok(HttpResponse::Ok().json(summary))
}

pub async fn evaluation_for(
    pool: &PgPool,
    orchestrator: &EvaluationOrchestrator,
    patient_id: &str,
) -> Result<HttpResponse, AppError> {
    let (profile, records) = load_for_analysis(pool, patient_id).await?;
    let evaluation = orchestrator.evaluate(&profile, &records).await.into_result()?;
    let result = evaluation.into_result();
    Ok(HttpResponse::Ok().json(AnalysisResponse {
        patient_id: patient_id.to_string(),
        analysis_text: result.text,
        structured: result.structured,
    }))
}

/// Evaluate, then recommend from that evaluation. Both calls run in order
/// within the request; a failed evaluation stops before the second call.
pub async fn recommendations_for(
    pool: &PgPool,
    orchestrator: &EvaluationOrchestrator,
    patient_id: &str,
) -> Result<HttpResponse, AppError> {
    let (profile, records) = load_for_analysis(pool, patient_id).await?;
    let evaluation = orchestrator.evaluate(&profile, &records).await.into_result()?;
    let recommendations = orchestrator
        .recommend(&profile, &records, &evaluation)
        .await
        .into_result()?;
    Ok(HttpResponse::Ok().json(RecommendationsResponse {
        patient_id: patient_id.to_string(),
        evaluation: evaluation.into_result(),
        recommendations,
    }))
}

pub async fn disease_risk_for(
    pool: &PgPool,
    orchestrator: &EvaluationOrchestrator,
    patient_id: &str,
) -> Result<HttpResponse, AppError> {
    let (profile, records) = load_for_analysis(pool, patient_id).await?;
    let result = orchestrator.disease_risk(&profile, &records).await.into_result()?;
    Ok(HttpResponse::Ok().json(AnalysisResponse {
        patient_id: patient_id.to_string(),
        analysis_text: result.text,
        structured: result.structured,
    }))
}

#[tracing::instrument(name = "Get own summary", skip(pool, caller), fields(user_id = %caller.subject_id))]
pub async fn get_own_summary(
    pool: web::Data<PgPool>,
    caller: web::ReqData<Caller>,
) -> Result<HttpResponse, AppError> {
    summary_for(&pool, caller.require_patient()?).await
}

#[tracing::instrument(name = "Get own evaluation", skip(pool, orchestrator, caller), fields(user_id = %caller.subject_id))]
pub async fn get_own_evaluation(
    pool: web::Data<PgPool>,
    orchestrator: web::Data<EvaluationOrchestrator>,
    caller: web::ReqData<Caller>,
) -> Result<HttpResponse, AppError> {
    evaluation_for(&pool, &orchestrator, caller.require_patient()?).await
}

#[tracing::instrument(name = "Get own recommendation", skip(pool, orchestrator, caller), fields(user_id = %caller.subject_id))]
pub async fn get_own_recommendation(
    pool: web::Data<PgPool>,
    orchestrator: web::Data<EvaluationOrchestrator>,
    caller: web::ReqData<Caller>,
) -> Result<HttpResponse, AppError> {
    recommendations_for(&pool, &orchestrator, caller.require_patient()?).await
}

#[tracing::instrument(name = "Get own disease risk", skip(pool, orchestrator, caller), fields(user_id = %caller.subject_id))]
pub async fn get_own_disease_risk(
    pool: web::Data<PgPool>,
    orchestrator: web::Data<EvaluationOrchestrator>,
    caller: web::ReqData<Caller>,
) -> Result<HttpResponse, AppError> {
    disease_risk_for(&pool, &orchestrator, caller.require_patient()?).await
}

#[tracing::instrument(name = "Get latest insight", skip(pool, orchestrator, caller), fields(user_id = %caller.subject_id))]
pub async fn get_latest_insight(
    pool: web::Data<PgPool>,
    orchestrator: web::Data<EvaluationOrchestrator>,
    caller: web::ReqData<Caller>,
) -> Result<HttpResponse, AppError> {
    let user_id = caller.require_patient()?;
    let latest = daily_records::records_for_user(&pool, user_id, Some(1))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound("No check-in data found".to_string()))?;

    let insight = orchestrator.quick_insight(&latest).await.into_result()?;
    Ok(HttpResponse::Ok().json(InsightResponse {
        record_id: latest.id,
        date: latest.date,
        insight,
    }))
}
