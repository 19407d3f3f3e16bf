use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use sqlx::{PgPool, PgConnection, Connection, Executor};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;
use once_cell::sync::Lazy;
use reqwest::Client;

use wellbeing_backend::run;
use wellbeing_backend::config::settings::{get_config, AuthSettings, DatabaseSettings};
use wellbeing_backend::models::health_data::DeviceMetrics;
use wellbeing_backend::models::llm::LlmError;
use wellbeing_backend::services::device_client::TelemetryError;
use wellbeing_backend::services::{
    EvaluationOrchestrator, RecordMergeService, TelemetrySource, TextGenerator,
};
use wellbeing_backend::telemetry::{get_subscriber, init_subscriber};

pub const DOCTOR_EMAIL: &str = "doctor@example.com";
pub const DOCTOR_PASSWORD: &str = "doctorpass";
pub const PRIVILEGED_DOCTOR_TOKEN: &str = "fake-token::doc-123::doctor";

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::stdout
        );
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::sink
        );
        init_subscriber(subscriber);
    }
});

pub fn device_payload() -> Value {
    json!({
        "date": "2025-03-14",
        "heart_rate": { "resting_hr": 64, "average_daily_hr": 81 },
        "hrv": { "average_hrv": 42 },
        "sleep": { "sleep_duration_hours": 7.2 },
        "activity": { "steps": 6400, "calories_burned": 520 },
        "spo2": { "average_spo2": 97.4 },
        "skin_temp": { "deviation_celsius": -0.12 }
    })
}

pub fn device_metrics() -> DeviceMetrics {
    serde_json::from_value(device_payload()).expect("Fixture payload must decode")
}

/// What the stub device service does on the next fetch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DeviceMode {
    Healthy,
    Down,
    Invalid,
    Stalled,
}

pub struct StubTelemetry {
    mode: Mutex<DeviceMode>,
}

impl StubTelemetry {
    pub fn new(mode: DeviceMode) -> Arc<Self> {
        Arc::new(Self { mode: Mutex::new(mode) })
    }

    pub fn set_mode(&self, mode: DeviceMode) {
        *self.mode.lock().unwrap() = mode;
    }
}

#[async_trait]
impl TelemetrySource for StubTelemetry {
    async fn fetch(&self) -> Result<DeviceMetrics, TelemetryError> {
        let mode = *self.mode.lock().unwrap();
        match mode {
            DeviceMode::Healthy => Ok(device_metrics()),
            DeviceMode::Down => Err(TelemetryError::Unavailable("connection refused".to_string())),
            DeviceMode::Invalid => Err(TelemetryError::InvalidPayload("missing field `spo2`".to_string())),
            DeviceMode::Stalled => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(device_metrics())
            }
        }
    }
}

/// Model stand-in: replies with a fixed text, or fails when `reply` is None.
/// Every prompt it receives is kept for inspection.
pub struct StubGenerator {
    reply: Mutex<Option<String>>,
    pub prompts: Mutex<Vec<String>>,
}

pub const EVALUATION_REPLY: &str =
    "Summary follows.\n{\"STATUS\": \"NORMAL\", \"Current_Status\": \"Stable week\"}\nTake care.";

impl StubGenerator {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Mutex::new(Some(reply.to_string())),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: Mutex::new(None),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, document: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(document.to_string());
        match self.reply.lock().unwrap().clone() {
            Some(reply) => Ok(reply),
            None => Err(LlmError::ServiceUnavailable("model offline".to_string())),
        }
    }
}

pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
    pub telemetry: Arc<StubTelemetry>,
    pub generator: Arc<StubGenerator>,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(StubGenerator::replying(EVALUATION_REPLY)).await
}

pub async fn spawn_app_with(generator: Arc<StubGenerator>) -> TestApp {
    // The first time `initialize` is invoked the code in `TRACING` is executed.
    // All other invocations will instead skip execution.
    Lazy::force(&TRACING);

    let listener = TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind random port");
    // Get port assigned by the OS
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);
    let mut configuration = get_config().expect("Failed to read configuration.");
    configuration.database.db_name = Uuid::new_v4().to_string();
    let connection_pool = configure_db(&configuration.database)
        .await;

    let telemetry = StubTelemetry::new(DeviceMode::Healthy);
    let merge_service = RecordMergeService::new(telemetry.clone(), Duration::from_millis(500));
    let orchestrator = EvaluationOrchestrator::new(generator.clone(), Duration::from_secs(5));
    let auth_settings = AuthSettings {
        doctor_email: DOCTOR_EMAIL.to_string(),
        doctor_password: SecretString::from(DOCTOR_PASSWORD.to_string()),
    };

    let server = run(
        listener,
        connection_pool.clone(),
        merge_service,
        orchestrator,
        auth_settings,
    )
        .expect("Failed to bind address");
    // Launch the server as a background task
    let _ = tokio::spawn(server);
    TestApp {
        address,
        db_pool: connection_pool,
        telemetry,
        generator,
    }
}

pub async fn configure_db(config: &DatabaseSettings) -> PgPool {
    // Create database
    let mut connection = PgConnection::connect(
            &config.connection_string_without_db()
        )
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, config.db_name).as_str())
        .await
        .expect("Failed to create database.");

    // Migrate database
    let connection_pool = PgPool::connect(config.connection_string().expose_secret())
        .await
        .expect("Failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database");

    connection_pool
}

pub fn signup_payload(email: &str) -> Value {
    json!({
        "email": email,
        "password": "password123",
        "age": 34,
        "height_cm": 171.5,
        "sex": "female",
        "medical_history": {
            "chronic_conditions": ["asthma"],
            "current_medications": ["salbutamol"]
        },
        "family_history": { "diabetes": true },
        "lifestyle_factors": {
            "smoking_status": "never",
            "alcohol_consumption": "occasional",
            "exercise_habits": "3x per week"
        }
    })
}

pub fn checkin_payload(weight: f64) -> Value {
    json!({
        "body_weight_kg": weight,
        "illness_symptoms": { "present": false },
        "energy_level": 7,
        "muscle_soreness": 2,
        "mood_state": 8,
        "location_coordinates": { "latitude": 12.97, "longitude": 77.59 },
        "additional_notes": "Slept well"
    })
}

/// Sign up a fresh patient and log in. Returns (user_id, token).
pub async fn create_patient_and_login(app_address: &str) -> (String, String) {
    let client = Client::new();
    let email = format!("patient-{}@example.com", Uuid::new_v4());

    let signup_response = client
        .post(&format!("{}/api/v1/auth/signup", app_address))
        .json(&signup_payload(&email))
        .send()
        .await
        .expect("Failed to sign up.");
    assert_eq!(signup_response.status().as_u16(), 201);
    let signup_body: Value = signup_response.json().await.expect("Failed to parse signup response");
    let user_id = signup_body["user_id"].as_str().expect("No user_id in response").to_string();

    let login_response = client
        .post(&format!("{}/api/v1/auth/login", app_address))
        .json(&json!({ "email": email, "password": "password123" }))
        .send()
        .await
        .expect("Failed to execute login request.");
    let login_body: Value = login_response.json().await.expect("Failed to parse login response");
    let token = login_body["token"].as_str().expect("No token in response").to_string();

    (user_id, token)
}

pub async fn submit_checkin(app_address: &str, token: &str, weight: f64) -> reqwest::Response {
    Client::new()
        .post(&format!("{}/api/v1/user/checkin", app_address))
        .bearer_auth(token)
        .json(&checkin_payload(weight))
        .send()
        .await
        .expect("Failed to submit check-in.")
}
