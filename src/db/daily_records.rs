use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use sqlx::types::Json;
use uuid::Uuid;

use crate::models::daily_record::{DailyRecord, DailyRecordRow};

const RECORD_COLUMNS: &str = "id, user_id, recorded_at, checkin, device_metrics";

/// Single-statement insert: the record is either fully stored or not at all.
pub async fn insert_record(pool: &PgPool, record: &DailyRecord) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO daily_records (id, user_id, recorded_at, checkin, device_metrics)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(record.id)
    .bind(&record.user_id)
    .bind(record.date)
    .bind(Json(&record.checkin_data))
    .bind(Json(&record.device_data))
    .execute(pool)
    .await?;
    Ok(())
}

/// Most recent first. `limit = None` returns every record.
pub async fn records_for_user(
    pool: &PgPool,
    user_id: &str,
    limit: Option<i64>,
) -> Result<Vec<DailyRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, DailyRecordRow>(&format!(
        r#"
        SELECT {} FROM daily_records
        WHERE user_id = $1
        ORDER BY recorded_at DESC, id
        LIMIT $2
        "#,
        RECORD_COLUMNS
    ))
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(DailyRecord::from).collect())
}

/// Oldest first, for charting.
pub async fn records_since(
    pool: &PgPool,
    user_id: &str,
    since: DateTime<Utc>,
) -> Result<Vec<DailyRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, DailyRecordRow>(&format!(
        r#"
        SELECT {} FROM daily_records
        WHERE user_id = $1 AND recorded_at >= $2
        ORDER BY recorded_at ASC, id
        "#,
        RECORD_COLUMNS
    ))
    .bind(user_id)
    .bind(since)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(DailyRecord::from).collect())
}

pub async fn find_record(pool: &PgPool, record_id: Uuid) -> Result<Option<DailyRecord>, sqlx::Error> {
    let row = sqlx::query_as::<_, DailyRecordRow>(&format!(
        "SELECT {} FROM daily_records WHERE id = $1",
        RECORD_COLUMNS
    ))
    .bind(record_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(DailyRecord::from))
}

/// Deletes only when `owner_id` owns the record. Returns whether a row went away.
pub async fn delete_owned_record(pool: &PgPool, record_id: Uuid, owner_id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM daily_records WHERE id = $1 AND user_id = $2")
        .bind(record_id)
        .bind(owner_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn count_records(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(*) AS total FROM daily_records")
        .fetch_one(pool)
        .await?;
    row.try_get("total")
}

pub async fn count_active_users_since(pool: &PgPool, since: DateTime<Utc>) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(DISTINCT user_id) AS active FROM daily_records WHERE recorded_at >= $1")
        .bind(since)
        .fetch_one(pool)
        .await?;
    row.try_get("active")
}
