use actix_web::{http, web, App, HttpServer};
use actix_web::dev::Server;
use tracing_actix_web::TracingLogger;
use sqlx::PgPool;
use std::net::TcpListener;
use actix_cors::Cors;

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
mod handlers;
mod middleware;
pub mod models;
mod routes;
pub mod services;
pub mod telemetry;
pub mod utils;

use crate::config::settings::AuthSettings;
use crate::routes::init_routes;
use crate::services::{EvaluationOrchestrator, RecordMergeService};

pub fn run(
    listener: TcpListener,
    db_pool: PgPool,
    merge_service: RecordMergeService,
    orchestrator: EvaluationOrchestrator,
    auth_settings: AuthSettings,
) -> Result<Server, std::io::Error> {
    // Wrap using web::Data, which boils down to an Arc smart pointer
    let db_pool_data = web::Data::new(db_pool);
    let merge_service = web::Data::new(merge_service);
    let orchestrator = web::Data::new(orchestrator);
    let auth_settings = web::Data::new(auth_settings);

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://127.0.0.1:3000")
            .allowed_origin("http://localhost:5173")
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allowed_headers(vec![
                http::header::AUTHORIZATION,
                http::header::ACCEPT,
                http::header::CONTENT_TYPE,
            ])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(TracingLogger::default())
            .wrap(cors)
            // Get a pointer copy and attach it to the application state
            .app_data(db_pool_data.clone())
            .app_data(merge_service.clone())
            .app_data(orchestrator.clone())
            .app_data(auth_settings.clone())
            .configure(init_routes)
    })
    .listen(listener)?
    .run();

    Ok(server)
}
