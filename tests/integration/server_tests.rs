/*!
 * Tests for the admin HTTP surface, driving a real server socket with a
 * reqwest client. No test reaches the live provider: every exercised route
 * either fails validation first or finds no translation candidates.
 */

use serde_json::{Value, json};

use tripdash::app_config::Config;
use tripdash::server::{AppState, build_router};
use tripdash::store::RecordKind;

use crate::common::{seed_record, test_repository};

/// Start the router on an ephemeral port and return its base URL
async fn spawn_server(state: AppState) -> String {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local addr");

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    format!("http://{}", addr)
}

fn test_state() -> AppState {
    let mut config = Config::default();
    // A placeholder credential so provider construction succeeds; tests
    // never trigger an actual provider call.
    config.provider.api_key = "test-key".to_string();

    AppState {
        config,
        repository: test_repository(),
    }
}

#[tokio::test]
async fn test_health_shouldReportRecordCounts() {
    let state = test_state();
    seed_record(&state.repository, RecordKind::Schedule, "Xin chào", Some("你好")).await;
    let base = spawn_server(state).await;

    let response = reqwest::get(format!("{}/api/health", base))
        .await
        .expect("Request failed");

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Invalid JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["records"]["itinerary"], 1);
    assert_eq!(body["records"]["tasks"], 0);
}

#[tokio::test]
async fn test_batchTranslate_withEmptyStore_shouldSucceedWithZeroTotals() {
    let base = spawn_server(test_state()).await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/admin/batch-translate", base))
        .send()
        .await
        .expect("Request failed");

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Invalid JSON");
    assert_eq!(body["success"], true);
    assert_eq!(body["results"]["itinerary"]["processed"], 0);
    assert_eq!(body["results"]["tasks"]["updated"], 0);
    assert_eq!(body["results"]["info_cards"]["processed"], 0);
}

#[tokio::test]
async fn test_batchTranslate_withUnknownKind_shouldReturn400() {
    let base = spawn_server(test_state()).await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/admin/batch-translate", base))
        .json(&json!({ "kind": "widgets" }))
        .send()
        .await
        .expect("Request failed");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_translateRecord_withMissingTitle_shouldReturn400() {
    let base = spawn_server(test_state()).await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/admin/translate-record", base))
        .json(&json!({ "kind": "task", "id": 1, "source": { "description": "no title" } }))
        .send()
        .await
        .expect("Request failed");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Invalid JSON");
    assert!(
        body["message"]
            .as_str()
            .unwrap_or_default()
            .contains("title")
    );
}

#[tokio::test]
async fn test_translate_withBlankText_shouldReturn400() {
    let base = spawn_server(test_state()).await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/translate", base))
        .json(&json!({ "text": "  ", "direction": "vi2ko" }))
        .send()
        .await
        .expect("Request failed");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_translate_withBadDirection_shouldReturn400() {
    let base = spawn_server(test_state()).await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/translate", base))
        .json(&json!({ "text": "Xin chào", "direction": "vi2fr" }))
        .send()
        .await
        .expect("Request failed");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Invalid JSON");
    assert_eq!(body["message"], "Direction must be 'vi2ko' or 'ko2vi'.");
}

#[tokio::test]
async fn test_chat_withBlankMessage_shouldReturn400() {
    let base = spawn_server(test_state()).await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/chat", base))
        .json(&json!({ "message": "" }))
        .send()
        .await
        .expect("Request failed");

    assert_eq!(response.status(), 400);
}
