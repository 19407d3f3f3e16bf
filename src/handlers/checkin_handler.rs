use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::identity::Caller;
use crate::db::daily_records;
use crate::error::AppError;
use crate::models::checkin::CheckIn;
use crate::models::common::ApiResponse;
use crate::models::user::Role;
use crate::services::record_merge::RecordMergeService;

#[tracing::instrument(
    name = "Submit daily check-in",
    skip(pool, caller, merge_service, checkin_form),
    fields(user_id = %caller.subject_id)
)]
pub async fn submit_checkin(
    pool: web::Data<PgPool>,
    caller: web::ReqData<Caller>,
    merge_service: web::Data<RecordMergeService>,
    checkin_form: web::Json<CheckIn>,
) -> Result<HttpResponse, AppError> {
    let user_id = caller.require_patient()?;
    let record = merge_service
        .submit_checkin(&pool, user_id, checkin_form.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success("Check-in saved", record)))
}

#[tracing::instrument(
    name = "List own check-ins",
    skip(pool, caller),
    fields(user_id = %caller.subject_id)
)]
pub async fn list_own_checkins(
    pool: web::Data<PgPool>,
    caller: web::ReqData<Caller>,
) -> Result<HttpResponse, AppError> {
    let user_id = caller.require_patient()?;
    let records = daily_records::records_for_user(&pool, user_id, None).await?;
    Ok(HttpResponse::Ok().json(records))
}

/// Owners see their own records; doctors see any record. Other callers get
/// the same 404 as a missing record.
#[tracing::instrument(
    name = "Get check-in",
    skip(pool, caller),
    fields(user_id = %caller.subject_id)
)]
pub async fn get_checkin(
    pool: web::Data<PgPool>,
    caller: web::ReqData<Caller>,
    record_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let record = daily_records::find_record(&pool, *record_id)
        .await?
        .filter(|r| caller.role == Role::Doctor || r.user_id == caller.subject_id)
        .ok_or_else(|| AppError::NotFound("Check-in not found".to_string()))?;
    Ok(HttpResponse::Ok().json(record))
}

#[tracing::instrument(
    name = "Delete check-in",
    skip(pool, caller),
    fields(user_id = %caller.subject_id)
)]
pub async fn delete_checkin(
    pool: web::Data<PgPool>,
    caller: web::ReqData<Caller>,
    record_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let user_id = caller.require_patient()?;
    let deleted = daily_records::delete_owned_record(&pool, *record_id, user_id).await?;
    if !deleted {
        return Err(AppError::NotFound("Check-in not found".to_string()));
    }
    tracing::info!("Deleted check-in {} for {}", record_id, user_id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_message("Check-in deleted")))
}
