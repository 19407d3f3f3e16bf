use std::net::TcpListener;
use std::sync::Arc;
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

use wellbeing_backend::run;
use wellbeing_backend::config::settings::get_config;
use wellbeing_backend::telemetry::{get_subscriber, init_subscriber};
use wellbeing_backend::services::{
    DisabledGenerator, EvaluationOrchestrator, HttpTelemetrySource, Ollama, RecordMergeService,
    TextGenerator,
};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Panic if we can't read the config
    let config = get_config().expect("Failed to read the config.");

    let subscriber = get_subscriber(
        "wellbeing-backend".into(),
        config.application.log_level.clone(),
        std::io::stdout
    );
    init_subscriber(subscriber);

    // Only try to establish connection when actually used
    let connection_pool = PgPoolOptions::new()
        .max_connections(32)
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect_lazy(
            config.database.connection_string().expose_secret()
        )
        .expect("Failed to create Postgres connection pool");

    if let Err(e) = sqlx::migrate!("./migrations").run(&connection_pool).await {
        tracing::error!("Failed to run database migrations: {}", e);
        std::process::exit(1);
    }

    let telemetry_source = Arc::new(HttpTelemetrySource::new(&config.device));
    let merge_service = RecordMergeService::new(telemetry_source, config.device.timeout());

    let generator: Arc<dyn TextGenerator> = if config.llm.enabled {
        tracing::info!("AI model enabled: {} at {}", config.llm.model_name, config.llm.base_url);
        Arc::new(Ollama::new(&config.llm))
    } else {
        tracing::warn!("AI model disabled; analysis endpoints will report it as not configured");
        Arc::new(DisabledGenerator)
    };
    let orchestrator = EvaluationOrchestrator::new(generator, config.llm.timeout());

    let address = format!("{}:{}", config.application.host, config.application.port);
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Listening on {}", address);

    run(
        listener,
        connection_pool,
        merge_service,
        orchestrator,
        config.auth,
    )?.await
}
