use actix_web::{post, web, HttpResponse};
use sqlx::PgPool;

use crate::config::settings::AuthSettings;
use crate::error::AppError;
use crate::handlers::auth_handler::{login_user, signup_user};
use crate::models::auth::LoginRequest;
use crate::models::user::SignUpRequest;

#[post("/signup")]
async fn signup(
    signup_form: web::Json<SignUpRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    signup_user(signup_form, pool).await
}

#[post("/login")]
async fn login(
    login_form: web::Json<LoginRequest>,
    pool: web::Data<PgPool>,
    auth_settings: web::Data<AuthSettings>,
) -> Result<HttpResponse, AppError> {
    login_user(login_form, pool, auth_settings).await
}
