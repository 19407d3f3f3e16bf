use actix_web::{get, post, put, web, HttpResponse};
use sqlx::PgPool;

use crate::auth::identity::Caller;
use crate::error::AppError;
use crate::handlers::analysis_handler::{
    get_latest_insight, get_own_disease_risk, get_own_evaluation, get_own_recommendation,
    get_own_summary,
};
use crate::handlers::checkin_handler::{list_own_checkins, submit_checkin};
use crate::handlers::profile_handler::{get_own_profile, update_own_profile};
use crate::models::checkin::CheckIn;
use crate::models::user::UpdateProfileRequest;
use crate::services::evaluation_service::EvaluationOrchestrator;
use crate::services::record_merge::RecordMergeService;

#[get("/profile")]
async fn get_profile(
    pool: web::Data<PgPool>,
    caller: web::ReqData<Caller>,
) -> Result<HttpResponse, AppError> {
    get_own_profile(pool, caller).await
}

#[put("/profile")]
async fn update_profile(
    pool: web::Data<PgPool>,
    caller: web::ReqData<Caller>,
    update_form: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, AppError> {
    update_own_profile(pool, caller, update_form).await
}

#[post("/checkin")]
async fn create_checkin(
    pool: web::Data<PgPool>,
    caller: web::ReqData<Caller>,
    merge_service: web::Data<RecordMergeService>,
    checkin_form: web::Json<CheckIn>,
) -> Result<HttpResponse, AppError> {
    submit_checkin(pool, caller, merge_service, checkin_form).await
}

#[get("/checkins")]
async fn list_checkins(
    pool: web::Data<PgPool>,
    caller: web::ReqData<Caller>,
) -> Result<HttpResponse, AppError> {
    list_own_checkins(pool, caller).await
}

#[get("/summary")]
async fn summary(
    pool: web::Data<PgPool>,
    caller: web::ReqData<Caller>,
) -> Result<HttpResponse, AppError> {
    get_own_summary(pool, caller).await
}

#[get("/evaluation")]
async fn evaluation(
    pool: web::Data<PgPool>,
    orchestrator: web::Data<EvaluationOrchestrator>,
    caller: web::ReqData<Caller>,
) -> Result<HttpResponse, AppError> {
    get_own_evaluation(pool, orchestrator, caller).await
}

#[get("/recommendation")]
async fn recommendation(
    pool: web::Data<PgPool>,
    orchestrator: web::Data<EvaluationOrchestrator>,
    caller: web::ReqData<Caller>,
) -> Result<HttpResponse, AppError> {
    get_own_recommendation(pool, orchestrator, caller).await
}

#[get("/disease-risk")]
async fn disease_risk(
    pool: web::Data<PgPool>,
    orchestrator: web::Data<EvaluationOrchestrator>,
    caller: web::ReqData<Caller>,
) -> Result<HttpResponse, AppError> {
    get_own_disease_risk(pool, orchestrator, caller).await
}

#[get("/latest-insight")]
async fn latest_insight(
    pool: web::Data<PgPool>,
    orchestrator: web::Data<EvaluationOrchestrator>,
    caller: web::ReqData<Caller>,
) -> Result<HttpResponse, AppError> {
    get_latest_insight(pool, orchestrator, caller).await
}
