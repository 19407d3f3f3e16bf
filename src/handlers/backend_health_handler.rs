use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::PgPool;

use crate::services::evaluation_service::EvaluationOrchestrator;

pub async fn service_info() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "status": "running",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Always 200; each dependency reports its own state.
pub async fn backend_health_check(
    pool: web::Data<PgPool>,
    orchestrator: web::Data<EvaluationOrchestrator>,
) -> HttpResponse {
    let database = match sqlx::query("SELECT 1").execute(pool.get_ref()).await {
        Ok(_) => "connected",
        Err(e) => {
            tracing::warn!("Database health probe failed: {}", e);
            "unreachable"
        }
    };

    let ai_service = if orchestrator.model_available().await {
        "enabled"
    } else {
        "unavailable"
    };

    HttpResponse::Ok().json(json!({
        "api": "healthy",
        "ai_service": ai_service,
        "database": database
    }))
}
