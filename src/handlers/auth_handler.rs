use actix_web::{web, HttpResponse};
use secrecy::ExposeSecret;
use sqlx::PgPool;

use crate::auth::identity::{issue_token, PRIVILEGED_DOCTOR_ID};
use crate::config::settings::AuthSettings;
use crate::db::users;
use crate::error::AppError;
use crate::models::auth::{LoginRequest, LoginResponse};
use crate::models::user::{Role, SignUpRequest, SignUpResponse};
use crate::utils::password::{hash_password, verify_password};

const UNIQUE_VIOLATION: &str = "23505";

#[tracing::instrument(
    name = "Signing up a new patient",
    skip(signup_form, pool),
    fields(email = %signup_form.email)
)]
pub async fn signup_user(
    signup_form: web::Json<SignUpRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    signup_form.validate()?;

    if users::email_exists(&pool, &signup_form.email).await? {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = hash_password(signup_form.password.expose_secret()).map_err(|e| {
        tracing::error!("Failed to hash password: {:?}", e);
        AppError::Validation("Password could not be processed".to_string())
    })?;

    let user_id = users::insert_patient(&pool, &signup_form, &password_hash)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                AppError::Conflict("Email already registered".to_string())
            }
            _ => {
                tracing::error!("Failed to insert user: {:?}", e);
                AppError::from(e)
            }
        })?;

    tracing::info!("New patient signed up: {}", user_id);
    Ok(HttpResponse::Created().json(SignUpResponse {
        message: "User signed up successfully".to_string(),
        user_id,
    }))
}

#[tracing::instrument(
    name = "Login attempt",
    skip(login_form, pool, auth_settings),
    fields(email = %login_form.email)
)]
pub async fn login_user(
    login_form: web::Json<LoginRequest>,
    pool: web::Data<PgPool>,
    auth_settings: web::Data<AuthSettings>,
) -> Result<HttpResponse, AppError> {
    let password = login_form.password.expose_secret();

    if login_form.email == auth_settings.doctor_email
        && password == auth_settings.doctor_password.expose_secret()
    {
        tracing::info!("Built-in doctor account logged in");
        return Ok(HttpResponse::Ok().json(LoginResponse {
            message: "Doctor logged in".to_string(),
            token: issue_token(PRIVILEGED_DOCTOR_ID, Role::Doctor),
            role: Role::Doctor,
        }));
    }

    let user = users::find_by_email(&pool, &login_form.email).await?;
    let Some(user) = user else {
        tracing::info!("Login failed: unknown email");
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    };

    if !verify_password(password, &user.password_hash) {
        tracing::info!("Login failed: bad password for {}", user.id);
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    // Stored credentials only ever log in patients.
    if user.role != Role::Patient.as_str() {
        tracing::warn!("Non-patient account {} attempted password login", user.id);
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    tracing::info!("Patient logged in: {}", user.id);
    Ok(HttpResponse::Ok().json(LoginResponse {
        message: "Patient logged in".to_string(),
        token: issue_token(&user.id, Role::Patient),
        role: Role::Patient,
    }))
}
