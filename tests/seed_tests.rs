use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    routing::get,
};
use http_body_util::BodyExt;
use salesboard::config::{Config, SeedMode};
use salesboard::db::Store;
use salesboard::state::SharedState;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

fn feed_body() -> Value {
    json!([
        {
            "id": 1,
            "title": "Canvas backpack",
            "price": 50,
            "description": "Roomy and waterproof",
            "category": "men's clothing",
            "image": "https://img.test/1.jpg",
            "sold": true,
            "dateOfSale": "2021-03-05T20:29:54+05:30"
        },
        {
            "id": 2,
            "title": "Desk lamp",
            "price": 150.5,
            "description": "Warm light",
            "category": "electronics",
            "image": "https://img.test/2.jpg",
            "sold": false,
            "dateOfSale": "2021-03-10T08:00:00Z"
        },
        {
            "id": 3,
            "title": "Gold ring",
            "price": 999.99,
            "description": "Plated",
            "category": "jewelery",
            "image": "https://img.test/3.jpg",
            "dateOfSale": "2022-07-27T20:29:54+05:30"
        }
    ])
}

fn healthy_feed() -> Router {
    Router::new().route("/feed", get(|| async { axum::Json(feed_body()) }))
}

/// Serves `feed` at `/feed` on an ephemeral port and returns its URL.
async fn spawn_feed(feed: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, feed).await.unwrap();
    });
    format!("http://{addr}/feed")
}

async fn spawn_app(feed_url: String, mode: SeedMode) -> (Router, Store) {
    let mut config = Config::default();
    config.seed.feed_url = feed_url;
    config.seed.mode = mode;
    config.seed.request_timeout_seconds = 5;

    let store = Store::in_memory().await.unwrap();
    let shared = SharedState::with_store(config, store.clone()).unwrap();
    let app = salesboard::api::router(salesboard::api::create_app_state(Arc::new(shared), None));
    (app, store)
}

async fn initialize(app: &Router) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/initialize")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8_lossy(&body).into_owned())
}

#[tokio::test]
async fn test_initialize_seeds_store() {
    let url = spawn_feed(healthy_feed()).await;
    let (app, store) = spawn_app(url, SeedMode::Append).await;

    let (status, body) = initialize(&app).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Database initialized with seed data (3 records)");
    assert_eq!(store.count_sale_records().await.unwrap(), 3);

    // "+05:30" offset is normalized to UTC before the month is taken
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/statistics?month=3&year=2021")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let stats: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(stats["totalSoldItems"], 1);
    assert_eq!(stats["totalNotSoldItems"], 1);
}

#[tokio::test]
async fn test_repeated_initialize_conflicts_in_append_mode() {
    let url = spawn_feed(healthy_feed()).await;
    let (app, store) = spawn_app(url, SeedMode::Append).await;

    let (status, _) = initialize(&app).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = initialize(&app).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["success"], false);

    assert_eq!(store.count_sale_records().await.unwrap(), 3);
}

#[tokio::test]
async fn test_repeated_initialize_is_idempotent_in_upsert_mode() {
    let url = spawn_feed(healthy_feed()).await;
    let (app, store) = spawn_app(url, SeedMode::Upsert).await;

    let (status, _) = initialize(&app).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = initialize(&app).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(store.count_sale_records().await.unwrap(), 3);
}

#[tokio::test]
async fn test_feed_failure_is_bad_gateway() {
    let url = spawn_feed(Router::new().route(
        "/feed",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream down") }),
    ))
    .await;
    let (app, store) = spawn_app(url, SeedMode::Append).await;

    let (status, body) = initialize(&app).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(store.count_sale_records().await.unwrap(), 0);
}

#[tokio::test]
async fn test_malformed_feed_is_bad_gateway() {
    let url = spawn_feed(Router::new().route(
        "/feed",
        get(|| async { axum::Json(json!({"products": []})) }),
    ))
    .await;
    let (app, _) = spawn_app(url, SeedMode::Append).await;

    let (status, _) = initialize(&app).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_invalid_records_are_rejected_before_writing() {
    let mut feed = feed_body();
    feed[2]["price"] = json!(-5);
    let url = spawn_feed(Router::new().route(
        "/feed",
        get(move || {
            let feed = feed.clone();
            async move { axum::Json(feed) }
        }),
    ))
    .await;
    let (app, store) = spawn_app(url, SeedMode::Append).await;

    let (status, _) = initialize(&app).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(store.count_sale_records().await.unwrap(), 0);
}

#[tokio::test]
async fn test_unreachable_feed_is_bad_gateway() {
    // Bind then drop to obtain a port with nothing listening
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (app, _) = spawn_app(format!("http://{addr}/feed"), SeedMode::Append).await;

    let (status, _) = initialize(&app).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
}
