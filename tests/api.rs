use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use sticker_album::{
    build_app,
    config::{Config, ExchangeConfig},
    error::{AppError, AppResult},
    services::{
        generator::{validate_prompt, GeneratedImage, ImageGenerator},
        inventory::InventoryStore,
    },
    storage::{MemoryStorage, StateStorage},
    AppState,
};

const KEY: &str = "sticker_app_state";

struct StubGenerator;

#[async_trait]
impl ImageGenerator for StubGenerator {
    async fn generate(&self, prompt: &str) -> AppResult<GeneratedImage> {
        let prompt = validate_prompt(prompt)?;
        if prompt == "fail" {
            return Err(AppError::Generation("upstream timed out".to_string()));
        }
        Ok(GeneratedImage {
            src: format!("https://images.test/p/{}", prompt.replace(' ', "-")),
            prompt: prompt.to_string(),
        })
    }
}

async fn app_with(storage: Arc<MemoryStorage>) -> Router {
    let mut config = Config::load();
    config.exchange = ExchangeConfig::default();

    let store = Arc::new(InventoryStore::open(storage, KEY).await);
    build_app(AppState {
        store,
        generator: Arc::new(StubGenerator),
        config: Arc::new(config),
    })
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn srcs(value: &Value) -> Vec<String> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["src"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn health_check_responds() {
    let app = app_with(Arc::new(MemoryStorage::new())).await;

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn generate_then_save_persists_across_sessions() {
    let storage = Arc::new(MemoryStorage::new());
    let app = app_with(storage.clone()).await;

    let (status, image) = send(
        &app,
        Method::POST,
        "/api/v1/generate",
        Some(json!({"prompt": "  happy cat "})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(image["prompt"], "happy cat");

    // Generation alone does not touch the album
    let (_, list) = send(&app, Method::GET, "/api/v1/stickers", None).await;
    assert!(list.as_array().unwrap().is_empty());

    let (status, saved) = send(
        &app,
        Method::POST,
        "/api/v1/stickers",
        Some(json!({"src": image["src"], "prompt": image["prompt"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["prompt"], "happy cat");
    assert!(saved["date"].is_string());

    // New session on the same storage
    let app = app_with(storage).await;
    let (_, list) = send(&app, Method::GET, "/api/v1/stickers", None).await;
    assert_eq!(srcs(&list), vec!["https://images.test/p/happy-cat".to_string()]);
}

#[tokio::test]
async fn generation_failures_are_reported() {
    let app = app_with(Arc::new(MemoryStorage::new())).await;

    let (status, body) = send(&app, Method::POST, "/api/v1/generate", Some(json!({"prompt": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, Method::POST, "/api/v1/generate", Some(json!({"prompt": "fail"}))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn save_requires_src() {
    let app = app_with(Arc::new(MemoryStorage::new())).await;

    let (status, _) = send(&app, Method::POST, "/api/v1/stickers", Some(json!({"src": " "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_by_position_and_by_id() {
    let storage = Arc::new(MemoryStorage::new());
    storage
        .insert_raw(
            KEY,
            r#"{"inventory":[{"id":1,"src":"u1"},{"id":2,"src":"u2"},{"id":3,"src":"u3"}]}"#,
        )
        .await;
    let app = app_with(storage.clone()).await;

    let (status, removed) = send(&app, Method::DELETE, "/api/v1/stickers/at/0", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(removed["src"], "u1");

    let (status, _) = send(&app, Method::DELETE, "/api/v1/stickers/3", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::DELETE, "/api/v1/stickers/at/9", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::GET, "/api/v1/stickers/3", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let blob = storage.read(KEY).await.unwrap().unwrap();
    let persisted: Value = serde_json::from_str(&blob).unwrap();
    assert_eq!(persisted, json!({"inventory": [{"id": 2, "src": "u2"}]}));
}

#[tokio::test]
async fn qr_exchange_between_two_albums() {
    let giver_storage = Arc::new(MemoryStorage::new());
    giver_storage
        .insert_raw(KEY, r#"{"inventory":[{"id":1,"src":"u1"}]}"#)
        .await;
    let giver = app_with(giver_storage).await;
    let receiver = app_with(Arc::new(MemoryStorage::new())).await;

    let (status, qr) = send(&giver, Method::GET, "/api/v1/exchange/qr/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(qr["svg"].as_str().unwrap().contains("<svg"));
    let payload: Value = serde_json::from_str(qr["payload"].as_str().unwrap()).unwrap();
    assert_eq!(payload, json!({"id": 1, "src": "u1", "prompt": "Unknown"}));

    let (status, body) = send(
        &receiver,
        Method::POST,
        "/api/v1/exchange/receive",
        Some(json!({"payload": qr["payload"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "received");
    assert_eq!(body["sticker"]["src"], "u1");

    // Scanning the same code again is a duplicate
    let (_, body) = send(
        &receiver,
        Method::POST,
        "/api/v1/exchange/receive",
        Some(json!({"payload": qr["payload"]})),
    )
    .await;
    assert_eq!(body["status"], "duplicate");

    let (_, body) = send(
        &receiver,
        Method::POST,
        "/api/v1/exchange/receive",
        Some(json!({"payload": "https://example.com/not-a-sticker"})),
    )
    .await;
    assert_eq!(body["status"], "ignored");

    let (_, list) = send(&receiver, Method::GET, "/api/v1/stickers", None).await;
    assert_eq!(srcs(&list), vec!["u1".to_string()]);
}

#[tokio::test]
async fn duplicate_scan_leaves_album_unchanged() {
    let storage = Arc::new(MemoryStorage::new());
    storage
        .insert_raw(KEY, r#"{"inventory":[{"id":1,"src":"u1"}]}"#)
        .await;
    let app = app_with(storage).await;

    let (_, body) = send(
        &app,
        Method::POST,
        "/api/v1/exchange/receive",
        Some(json!({"payload": r#"{"id":1,"src":"u1"}"#})),
    )
    .await;
    assert_eq!(body["status"], "duplicate");

    let (_, list) = send(&app, Method::GET, "/api/v1/stickers", None).await;
    assert_eq!(list, json!([{"id": 1, "src": "u1"}]));
}

#[tokio::test]
async fn random_trade_swaps_sticker() {
    let storage = Arc::new(MemoryStorage::new());
    storage
        .insert_raw(KEY, r#"{"inventory":[{"id":1,"src":"u1"}]}"#)
        .await;
    let app = app_with(storage).await;
    let pool = ExchangeConfig::default().assets;

    let (status, drawn) = send(&app, Method::GET, "/api/v1/exchange/draw", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(pool.contains(&drawn["src"].as_str().unwrap().to_string()));

    let (status, trade) = send(
        &app,
        Method::POST,
        "/api/v1/exchange/random",
        Some(json!({"give_id": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(trade["given"]["src"], "u1");

    let (_, list) = send(&app, Method::GET, "/api/v1/stickers", None).await;
    let held = srcs(&list);
    assert_eq!(held.len(), 1);
    assert!(pool.contains(&held[0]));

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/exchange/random",
        Some(json!({"give_id": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn saved_album_with_largest_id_still_serves() {
    let storage = Arc::new(MemoryStorage::new());
    storage
        .insert_raw(
            KEY,
            &format!(r#"{{"inventory":[{{"id":{},"src":"u1"}}]}}"#, i64::MAX),
        )
        .await;
    let app = app_with(storage).await;

    let (status, body) = send(&app, Method::POST, "/api/v1/stickers", Some(json!({"src": "u2"}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());

    let (status, list) = send(&app, Method::GET, "/api/v1/stickers", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(srcs(&list), vec!["u1".to_string()]);
}
