use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::auth::identity::Caller;
use crate::db::users;
use crate::error::AppError;
use crate::models::common::ApiResponse;
use crate::models::user::{BaselineProfile, UpdateProfileRequest};

pub async fn load_profile(pool: &PgPool, user_id: &str) -> Result<BaselineProfile, AppError> {
    users::find_profile(pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
}

#[tracing::instrument(
    name = "Get own profile",
    skip(pool, caller),
    fields(user_id = %caller.subject_id)
)]
pub async fn get_own_profile(
    pool: web::Data<PgPool>,
    caller: web::ReqData<Caller>,
) -> Result<HttpResponse, AppError> {
    let user_id = caller.require_patient()?;
    let profile = load_profile(&pool, user_id).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[tracing::instrument(
    name = "Update own profile",
    skip(pool, caller, update_form),
    fields(user_id = %caller.subject_id)
)]
pub async fn update_own_profile(
    pool: web::Data<PgPool>,
    caller: web::ReqData<Caller>,
    update_form: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = caller.require_patient()?;
    update_form.validate()?;

    let profile = users::update_profile(&pool, user_id, &update_form)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    tracing::info!("Profile updated for {}", user_id);
    Ok(HttpResponse::Ok().json(ApiResponse::success("Profile updated", profile)))
}
