use reqwest::Client;
use serde_json::Value;

mod common;
use common::utils::{
    create_patient_and_login, spawn_app, spawn_app_with, submit_checkin, StubGenerator,
    EVALUATION_REPLY,
};

async fn get(address: &str, path: &str, token: &str) -> reqwest::Response {
    Client::new()
        .get(&format!("{}/api/v1/user/{}", address, path))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to execute request.")
}

#[tokio::test]
async fn evaluation_returns_text_and_extracted_object() {
    let test_app = spawn_app().await;
    let (user_id, token) = create_patient_and_login(&test_app.address).await;
    submit_checkin(&test_app.address, &token, 70.0).await;

    let response = get(&test_app.address, "evaluation", &token).await;
    assert!(response.status().is_success());

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["patient_id"], user_id.as_str());
    assert_eq!(body["analysis_text"], EVALUATION_REPLY);
    assert_eq!(body["structured"]["STATUS"], "NORMAL");

    let prompts = test_app.generator.prompts.lock().unwrap().clone();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Slept well"));
    assert!(prompts[0].contains("asthma"));
}

#[tokio::test]
async fn unstructured_reply_is_returned_as_text() {
    let test_app = spawn_app_with(StubGenerator::replying("Everything looks fine.")).await;
    let (_, token) = create_patient_and_login(&test_app.address).await;
    submit_checkin(&test_app.address, &token, 70.0).await;

    let body: Value = get(&test_app.address, "evaluation", &token)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["analysis_text"], "Everything looks fine.");
    assert!(body["structured"].is_null());
}

#[tokio::test]
async fn analysis_without_records_is_not_found() {
    let test_app = spawn_app().await;
    let (_, token) = create_patient_and_login(&test_app.address).await;

    for path in ["evaluation", "recommendation", "disease-risk", "latest-insight"] {
        let response = get(&test_app.address, path, &token).await;
        assert_eq!(response.status().as_u16(), 404, "path {}", path);
    }
    assert_eq!(test_app.generator.prompt_count(), 0);
}

#[tokio::test]
async fn recommendation_chains_on_the_evaluation() {
    let test_app = spawn_app().await;
    let (_, token) = create_patient_and_login(&test_app.address).await;
    submit_checkin(&test_app.address, &token, 70.0).await;

    let response = get(&test_app.address, "recommendation", &token).await;
    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["evaluation"]["structured"]["STATUS"], "NORMAL");
    assert_eq!(body["recommendations"]["text"], EVALUATION_REPLY);

    let prompts = test_app.generator.prompts.lock().unwrap().clone();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[1].contains(EVALUATION_REPLY));
    assert!(prompts[1].contains("Slept well"));
}

#[tokio::test]
async fn failed_generation_is_a_retryable_error() {
    let test_app = spawn_app_with(StubGenerator::failing()).await;
    let (_, token) = create_patient_and_login(&test_app.address).await;
    submit_checkin(&test_app.address, &token, 70.0).await;

    let response = get(&test_app.address, "evaluation", &token).await;
    assert_eq!(response.status().as_u16(), 503);
    assert!(response.headers().contains_key("retry-after"));
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "generation_failed");
    assert!(body["message"].as_str().unwrap().starts_with("Error: AI analysis failed"));
}

#[tokio::test]
async fn failed_evaluation_skips_the_recommendation_call() {
    let test_app = spawn_app_with(StubGenerator::failing()).await;
    let (_, token) = create_patient_and_login(&test_app.address).await;
    submit_checkin(&test_app.address, &token, 70.0).await;

    let response = get(&test_app.address, "recommendation", &token).await;
    assert_eq!(response.status().as_u16(), 503);
    assert_eq!(test_app.generator.prompt_count(), 1);
}

#[tokio::test]
async fn disease_risk_uses_its_own_prompt() {
    let test_app = spawn_app().await;
    let (user_id, token) = create_patient_and_login(&test_app.address).await;
    submit_checkin(&test_app.address, &token, 70.0).await;

    let response = get(&test_app.address, "disease-risk", &token).await;
    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["patient_id"], user_id.as_str());

    let prompts = test_app.generator.prompts.lock().unwrap().clone();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("risk"));
    assert!(prompts[0].contains("Slept well"));
}

#[tokio::test]
async fn latest_insight_describes_newest_record() {
    let test_app = spawn_app_with(StubGenerator::replying("Good sleep, keep it up.")).await;
    let (_, token) = create_patient_and_login(&test_app.address).await;

    submit_checkin(&test_app.address, &token, 70.0).await;
    let newest: Value = submit_checkin(&test_app.address, &token, 71.5)
        .await
        .json()
        .await
        .unwrap();

    let response = get(&test_app.address, "latest-insight", &token).await;
    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["record_id"], newest["data"]["id"]);
    assert_eq!(body["insight"], "Good sleep, keep it up.");

    let prompts = test_app.generator.prompts.lock().unwrap().clone();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("71.5"));
}
