mod common;

use common::{catalog, mount_catalog, mount_generate, TestApp, PROVIDENCE_REPLY, TEST_MODEL};
use serde_json::{json, Value};
use wiremock::{MockServer, ResponseTemplate};

#[tokio::test]
async fn boston_returns_normalized_destinations() {
    let app = TestApp::spawn(PROVIDENCE_REPLY).await;

    let response = app
        .post_json("/recommendations", &json!({"location": "Boston", "budget": 200}))
        .await;

    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.expect("Failed to parse JSON");
    let destinations = body.as_array().expect("expected an array");
    assert_eq!(destinations.len(), 1);

    let providence = &destinations[0];
    assert_eq!(providence["name"], "Providence");
    assert_eq!(providence["cost"]["train"], 15.0);
    assert_eq!(providence["cost"]["bus"], 10.0);
    assert_eq!(providence["currency"], "$");
    assert_eq!(providence["travelTime"], "1h");
    assert!(providence["image"].as_str().is_some_and(|s| !s.is_empty()));

    let prompts = app.sent_prompts().await;
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Boston"));
    assert!(prompts[0].contains("200"));
}

#[tokio::test]
async fn api_alias_serves_the_same_pipeline() {
    let app = TestApp::spawn(PROVIDENCE_REPLY).await;

    let response = app
        .post_json(
            "/api/travel-recommendations",
            &json!({"location": "Boston", "budget": 200}),
        )
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body[0]["name"], "Providence");
}

#[tokio::test]
async fn foreign_budget_is_converted_before_prompting() {
    let app = TestApp::spawn(PROVIDENCE_REPLY).await;

    let response = app
        .post_json(
            "/recommendations",
            &json!({"location": "London", "budget": {"value": 78, "currency": "GBP"}}),
        )
        .await;

    assert_eq!(response.status().as_u16(), 200);

    let prompts = app.sent_prompts().await;
    assert!(prompts[0].contains("London"));
    assert!(prompts[0].contains("100"));
}

#[tokio::test]
async fn unknown_currency_is_rejected_without_calling_upstream() {
    let app = TestApp::spawn(PROVIDENCE_REPLY).await;

    let response = app
        .post_json(
            "/recommendations",
            &json!({"location": "Boston", "budget": {"value": 10, "currency": "XYZ"}}),
        )
        .await;

    assert_eq!(response.status().as_u16(), 400);
    assert!(app.sent_prompts().await.is_empty());
}

#[tokio::test]
async fn malformed_body_is_a_client_error() {
    let app = TestApp::spawn(PROVIDENCE_REPLY).await;

    let response = app
        .post_json("/recommendations", &json!({"budget": 200}))
        .await;

    assert!(response.status().is_client_error());
    assert!(app.sent_prompts().await.is_empty());
}

#[tokio::test]
async fn non_positive_budget_is_rejected() {
    let app = TestApp::spawn(PROVIDENCE_REPLY).await;

    let response = app
        .post_json("/recommendations", &json!({"location": "Boston", "budget": 0}))
        .await;

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn upstream_500_is_hidden_behind_uniform_error() {
    let gemini = MockServer::start().await;
    mount_catalog(&gemini, catalog(&[(TEST_MODEL, &["generateContent"])])).await;
    mount_generate(
        &gemini,
        ResponseTemplate::new(500).set_body_string("quota exhausted for project 42"),
    )
    .await;
    let app = TestApp::spawn_against(gemini)
        .await
        .expect("Failed to build test application");

    let response = app
        .post_json("/recommendations", &json!({"location": "Boston", "budget": 200}))
        .await;

    assert_eq!(response.status().as_u16(), 500);

    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("Failed to fetch recommendations"));
    assert!(!body.contains("quota exhausted"));
}

#[tokio::test]
async fn prose_only_reply_is_a_uniform_failure() {
    let app = TestApp::spawn("I'm sorry, I cannot suggest destinations right now.").await;

    let response = app
        .post_json("/recommendations", &json!({"location": "Boston", "budget": 200}))
        .await;

    assert_eq!(response.status().as_u16(), 500);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"], "Failed to fetch recommendations");
}

#[tokio::test]
async fn different_destination_count_passes_through() {
    let app = TestApp::spawn(r#"[{"name":"Salem"},{"name":"Worcester"}]"#).await;

    let response = app
        .post_json("/recommendations", &json!({"location": "Boston", "budget": 200}))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body.as_array().map(Vec::len), Some(2));
}
