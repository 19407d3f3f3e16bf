use reqwest::Client;
use serde_json::{json, Value};

mod common;
use common::utils::{
    create_patient_and_login, spawn_app, submit_checkin, DeviceMode, PRIVILEGED_DOCTOR_TOKEN,
};

async fn record_count(pool: &sqlx::PgPool, user_id: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM daily_records WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .expect("Failed to count records.")
}

#[tokio::test]
async fn checkin_is_merged_with_device_snapshot() {
    let test_app = spawn_app().await;
    let (user_id, token) = create_patient_and_login(&test_app.address).await;

    let response = submit_checkin(&test_app.address, &token, 72.5).await;
    assert_eq!(response.status().as_u16(), 201);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    let record = &body["data"];
    assert_eq!(record["user_id"], user_id.as_str());
    assert_eq!(record["checkin_data"]["body_weight_kg"], 72.5);
    assert_eq!(record["checkin_data"]["additional_notes"], "Slept well");
    assert_eq!(record["device_data"]["heart_rate"]["resting_hr"], 64);
    assert_eq!(record["device_data"]["activity"]["steps"], 6400);
    assert!(record["id"].as_str().is_some());
    assert_eq!(record_count(&test_app.db_pool, &user_id).await, 1);
}

#[tokio::test]
async fn checkin_updates_latest_weight() {
    let test_app = spawn_app().await;
    let client = Client::new();
    let (_, token) = create_patient_and_login(&test_app.address).await;

    submit_checkin(&test_app.address, &token, 80.0).await;
    submit_checkin(&test_app.address, &token, 79.2).await;

    let profile: Value = client
        .get(&format!("{}/api/v1/user/profile", &test_app.address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(profile["latest_weight_kg"], 79.2);
}

#[tokio::test]
async fn same_day_checkins_are_all_kept() {
    let test_app = spawn_app().await;
    let (user_id, token) = create_patient_and_login(&test_app.address).await;

    for weight in [70.0, 70.4, 70.8] {
        let response = submit_checkin(&test_app.address, &token, weight).await;
        assert_eq!(response.status().as_u16(), 201);
    }
    assert_eq!(record_count(&test_app.db_pool, &user_id).await, 3);
}

#[tokio::test]
async fn device_outage_returns_retryable_error_and_stores_nothing() {
    let test_app = spawn_app().await;
    let (user_id, token) = create_patient_and_login(&test_app.address).await;

    for mode in [DeviceMode::Down, DeviceMode::Stalled] {
        test_app.telemetry.set_mode(mode);
        let response = submit_checkin(&test_app.address, &token, 71.0).await;

        assert_eq!(response.status().as_u16(), 503, "mode {:?}", mode);
        assert!(response.headers().contains_key("retry-after"));
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "service_unavailable");
    }

    assert_eq!(record_count(&test_app.db_pool, &user_id).await, 0);
    let weight: Option<f64> = sqlx::query_scalar("SELECT latest_weight_kg FROM users WHERE id = $1")
        .bind(&user_id)
        .fetch_one(&test_app.db_pool)
        .await
        .unwrap();
    assert_eq!(weight, None);
}

#[tokio::test]
async fn invalid_device_data_is_a_bad_gateway() {
    let test_app = spawn_app().await;
    let (user_id, token) = create_patient_and_login(&test_app.address).await;
    test_app.telemetry.set_mode(DeviceMode::Invalid);

    let response = submit_checkin(&test_app.address, &token, 71.0).await;
    assert_eq!(response.status().as_u16(), 502);
    assert!(!response.headers().contains_key("retry-after"));
    assert_eq!(record_count(&test_app.db_pool, &user_id).await, 0);
}

#[tokio::test]
async fn out_of_range_scales_are_rejected() {
    let test_app = spawn_app().await;
    let (user_id, token) = create_patient_and_login(&test_app.address).await;

    let response = Client::new()
        .post(&format!("{}/api/v1/user/checkin", &test_app.address))
        .bearer_auth(&token)
        .json(&json!({
            "body_weight_kg": 70.0,
            "illness_symptoms": { "present": false },
            "energy_level": 11,
            "muscle_soreness": 2,
            "mood_state": 5
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(record_count(&test_app.db_pool, &user_id).await, 0);
}

#[tokio::test]
async fn history_is_listed_newest_first() {
    let test_app = spawn_app().await;
    let (_, token) = create_patient_and_login(&test_app.address).await;

    for weight in [70.0, 71.0, 72.0] {
        submit_checkin(&test_app.address, &token, weight).await;
    }

    let records: Vec<Value> = Client::new()
        .get(&format!("{}/api/v1/user/checkins", &test_app.address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let weights: Vec<f64> = records
        .iter()
        .map(|r| r["checkin_data"]["body_weight_kg"].as_f64().unwrap())
        .collect();
    assert_eq!(weights, vec![72.0, 71.0, 70.0]);
}

#[tokio::test]
async fn single_record_is_visible_to_owner_and_doctor_only() {
    let test_app = spawn_app().await;
    let client = Client::new();
    let (_, owner_token) = create_patient_and_login(&test_app.address).await;
    let (_, other_token) = create_patient_and_login(&test_app.address).await;

    let created: Value = submit_checkin(&test_app.address, &owner_token, 70.0)
        .await
        .json()
        .await
        .unwrap();
    let record_id = created["data"]["id"].as_str().unwrap().to_string();
    let url = format!("{}/api/v1/checkins/{}", &test_app.address, record_id);

    for token in [owner_token.as_str(), PRIVILEGED_DOCTOR_TOKEN] {
        let response = client.get(&url).bearer_auth(token).send().await.unwrap();
        assert!(response.status().is_success());
        let record: Value = response.json().await.unwrap();
        assert_eq!(record["id"], record_id.as_str());
    }

    let response = client.get(&url).bearer_auth(&other_token).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn patients_delete_only_their_own_records() {
    let test_app = spawn_app().await;
    let client = Client::new();
    let (owner_id, owner_token) = create_patient_and_login(&test_app.address).await;
    let (_, other_token) = create_patient_and_login(&test_app.address).await;

    let created: Value = submit_checkin(&test_app.address, &owner_token, 70.0)
        .await
        .json()
        .await
        .unwrap();
    let url = format!(
        "{}/api/v1/checkins/{}",
        &test_app.address,
        created["data"]["id"].as_str().unwrap()
    );

    let response = client.delete(&url).bearer_auth(&other_token).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 404);
    assert_eq!(record_count(&test_app.db_pool, &owner_id).await, 1);

    let response = client.delete(&url).bearer_auth(&owner_token).send().await.unwrap();
    assert!(response.status().is_success());
    assert_eq!(record_count(&test_app.db_pool, &owner_id).await, 0);

    let response = client.delete(&url).bearer_auth(&owner_token).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn created_record_matches_the_stored_record() {
    let test_app = spawn_app().await;
    let (_, token) = create_patient_and_login(&test_app.address).await;

    let created: Value = submit_checkin(&test_app.address, &token, 70.0)
        .await
        .json()
        .await
        .unwrap();
    let fetched: Value = Client::new()
        .get(&format!(
            "{}/api/v1/checkins/{}",
            &test_app.address,
            created["data"]["id"].as_str().unwrap()
        ))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(created["data"], fetched);
}

#[tokio::test]
async fn failed_insert_keeps_the_weight_update() {
    let test_app = spawn_app().await;
    let (user_id, token) = create_patient_and_login(&test_app.address).await;

    sqlx::query("ALTER TABLE daily_records ADD CONSTRAINT reject_all CHECK (false) NOT VALID")
        .execute(&test_app.db_pool)
        .await
        .expect("Failed to add constraint.");

    let response = submit_checkin(&test_app.address, &token, 66.0).await;
    assert_eq!(response.status().as_u16(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "storage_failure");

    let weight: Option<f64> = sqlx::query_scalar("SELECT latest_weight_kg FROM users WHERE id = $1")
        .bind(&user_id)
        .fetch_one(&test_app.db_pool)
        .await
        .unwrap();
    assert_eq!(weight, Some(66.0));
    assert_eq!(record_count(&test_app.db_pool, &user_id).await, 0);
}
