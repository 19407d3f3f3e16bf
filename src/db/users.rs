use sqlx::{PgPool, Row};
use sqlx::types::Json;
use uuid::Uuid;

use crate::models::user::{BaselineProfile, Role, SignUpRequest, UpdateProfileRequest, UserRow};

const USER_COLUMNS: &str = r#"
    id, email, password_hash, role, age, height_cm, sex,
    medical_history, family_history, lifestyle_factors,
    latest_weight_kg, created_at
"#;

/// Stored role for a subject, `None` when the subject does not exist.
pub async fn find_role(pool: &PgPool, user_id: &str) -> Result<Option<Role>, sqlx::Error> {
    let row = sqlx::query("SELECT role FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => {
            let role: String = row.try_get("role")?;
            role.parse::<Role>()
                .map(Some)
                .map_err(|e| sqlx::Error::Decode(e.into()))
        }
        None => Ok(None),
    }
}

pub async fn find_by_id(pool: &PgPool, user_id: &str) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(&format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS))
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_profile(pool: &PgPool, user_id: &str) -> Result<Option<BaselineProfile>, sqlx::Error> {
    Ok(find_by_id(pool, user_id).await?.map(BaselineProfile::from))
}

pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
    let row = sqlx::query("SELECT 1 AS found FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}

/// Inserts a new patient and returns its id. New accounts always get the
/// patient role and no recorded weight.
pub async fn insert_patient(
    pool: &PgPool,
    request: &SignUpRequest,
    password_hash: &str,
) -> Result<String, sqlx::Error> {
    let user_id = Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO users (
            id, email, password_hash, role, age, height_cm, sex,
            medical_history, family_history, lifestyle_factors, latest_weight_kg
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NULL)
        "#,
    )
    .bind(&user_id)
    .bind(&request.email)
    .bind(password_hash)
    .bind(Role::Patient.as_str())
    .bind(request.age)
    .bind(request.height_cm)
    .bind(&request.sex)
    .bind(Json(&request.medical_history))
    .bind(Json(&request.family_history))
    .bind(Json(&request.lifestyle_factors))
    .execute(pool)
    .await?;

    Ok(user_id)
}

/// Replaces the demographic and history fields. A weight in the request
/// overwrites the stored one; an absent weight leaves it untouched.
pub async fn update_profile(
    pool: &PgPool,
    user_id: &str,
    request: &UpdateProfileRequest,
) -> Result<Option<BaselineProfile>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(&format!(
        r#"
        UPDATE users SET
            age = $2,
            height_cm = $3,
            sex = $4,
            medical_history = $5,
            family_history = $6,
            lifestyle_factors = $7,
            latest_weight_kg = COALESCE($8, latest_weight_kg),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {}
        "#,
        USER_COLUMNS
    ))
    .bind(user_id)
    .bind(request.age)
    .bind(request.height_cm)
    .bind(&request.sex)
    .bind(Json(&request.medical_history))
    .bind(Json(&request.family_history))
    .bind(Json(&request.lifestyle_factors))
    .bind(request.latest_weight_kg)
    .fetch_optional(pool)
    .await
    .map(|row| row.map(BaselineProfile::from))
}

/// Idempotent: writing the same weight twice leaves the same state.
pub async fn set_latest_weight(pool: &PgPool, user_id: &str, weight_kg: f64) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET latest_weight_kg = $2, updated_at = NOW() WHERE id = $1")
        .bind(user_id)
        .bind(weight_kg)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn list_patients(pool: &PgPool, skip: i64, limit: i64) -> Result<Vec<BaselineProfile>, sqlx::Error> {
    let rows = sqlx::query_as::<_, UserRow>(&format!(
        "SELECT {} FROM users WHERE role = $1 ORDER BY created_at, id OFFSET $2 LIMIT $3",
        USER_COLUMNS
    ))
    .bind(Role::Patient.as_str())
    .bind(skip)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(BaselineProfile::from).collect())
}

pub async fn count_patients(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(*) AS total FROM users WHERE role = $1")
        .bind(Role::Patient.as_str())
        .fetch_one(pool)
        .await?;
    row.try_get("total")
}

/// Case-insensitive email substring plus an optional inclusive age range.
pub async fn search_patients(
    pool: &PgPool,
    email: Option<&str>,
    age_min: Option<i32>,
    age_max: Option<i32>,
    limit: i64,
) -> Result<Vec<BaselineProfile>, sqlx::Error> {
    let email_pattern = email.map(|e| format!("%{}%", escape_like(e)));
    let rows = sqlx::query_as::<_, UserRow>(&format!(
        r#"
        SELECT {} FROM users
        WHERE role = $1
          AND ($2::TEXT IS NULL OR email ILIKE $2)
          AND ($3::INTEGER IS NULL OR age >= $3)
          AND ($4::INTEGER IS NULL OR age <= $4)
        ORDER BY created_at, id
        LIMIT $5
        "#,
        USER_COLUMNS
    ))
    .bind(Role::Patient.as_str())
    .bind(email_pattern)
    .bind(age_min)
    .bind(age_max)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(BaselineProfile::from).collect())
}

fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("john_doe%"), "john\\_doe\\%");
        assert_eq!(escape_like("plain"), "plain");
    }
}
