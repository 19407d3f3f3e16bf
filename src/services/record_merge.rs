use std::sync::Arc;
use std::time::Duration;
use sqlx::PgPool;

use crate::db::{daily_records, users};
use crate::error::AppError;
use crate::models::checkin::CheckIn;
use crate::models::daily_record::DailyRecord;
use crate::models::health_data::DeviceMetrics;
use crate::services::device_client::{TelemetryError, TelemetrySource};

/// Turns a check-in plus a fresh device snapshot into a persisted record.
#[derive(Clone)]
pub struct RecordMergeService {
    source: Arc<dyn TelemetrySource>,
    fetch_timeout: Duration,
}

impl RecordMergeService {
    pub fn new(source: Arc<dyn TelemetrySource>, fetch_timeout: Duration) -> Self {
        Self { source, fetch_timeout }
    }

    /// One snapshot, bounded by this service's own timeout regardless of what
    /// the source does internally.
    pub async fn fetch_snapshot(&self) -> Result<DeviceMetrics, AppError> {
        match tokio::time::timeout(self.fetch_timeout, self.source.fetch()).await {
            Ok(Ok(metrics)) => Ok(metrics),
            Ok(Err(e)) => {
                tracing::error!("Device snapshot fetch failed: {}", e);
                Err(e.into())
            }
            Err(_) => {
                tracing::error!("Device snapshot fetch exceeded {:?}", self.fetch_timeout);
                Err(TelemetryError::Timeout.into())
            }
        }
    }

    /// Validates, fetches, then merges. Nothing is written unless the
    /// snapshot arrived and validated.
    #[tracing::instrument(
        name = "Submit check-in",
        skip(self, pool, checkin),
        fields(owner_id = %owner_id)
    )]
    pub async fn submit_checkin(
        &self,
        pool: &PgPool,
        owner_id: &str,
        checkin: CheckIn,
    ) -> Result<DailyRecord, AppError> {
        checkin.validate()?;
        let snapshot = self.fetch_snapshot().await?;
        merge(pool, owner_id, checkin, snapshot).await
    }
}

/// Persist the merge of `checkin` and `snapshot` for `owner_id`.
///
/// Two independent writes: the owner's latest weight first, then the record
/// insert. If the insert fails the weight update stays applied. Both writes
/// are safe to repeat.
pub async fn merge(
    pool: &PgPool,
    owner_id: &str,
    checkin: CheckIn,
    snapshot: DeviceMetrics,
) -> Result<DailyRecord, AppError> {
    users::set_latest_weight(pool, owner_id, checkin.body_weight_kg)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update latest weight for {}: {:?}", owner_id, e);
            e
        })?;

    let record = DailyRecord::new(owner_id, checkin, snapshot);
    daily_records::insert_record(pool, &record)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert daily record {}: {:?}", record.id, e);
            e
        })?;

    tracing::info!("Saved daily record {} for {}", record.id, owner_id);
    Ok(record)
}
