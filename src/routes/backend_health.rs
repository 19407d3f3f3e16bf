use actix_web::{get, web, HttpResponse};
use sqlx::PgPool;

use crate::handlers::backend_health_handler::{backend_health_check, service_info};
use crate::services::evaluation_service::EvaluationOrchestrator;

#[get("/")]
async fn root() -> HttpResponse {
    service_info().await
}

#[get("/health")]
async fn backend_health(
    pool: web::Data<PgPool>,
    orchestrator: web::Data<EvaluationOrchestrator>,
) -> HttpResponse {
    backend_health_check(pool, orchestrator).await
}
