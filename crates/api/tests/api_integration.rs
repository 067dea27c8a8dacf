//! Integration tests for the API server.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use api::config::Config;
use api::state::{AppState, Publishers, Stores};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use document_store::{DocumentQuery, DocumentReader};
use domain::{BrandChange, BrandMessage, InMemoryPublisher, ProductChange, VariantChange};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{Value, json};
use tokio::sync::{mpsc, watch};
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

struct TestApp {
    router: Router,
    product_events: InMemoryPublisher<ProductChange>,
    brand_queue: mpsc::Receiver<BrandMessage>,
}

fn setup_with_queue(brand_queue_capacity: usize) -> TestApp {
    let product_events = InMemoryPublisher::new();
    let publishers = Publishers {
        products: Arc::new(product_events.clone()),
        variants: Arc::new(InMemoryPublisher::<VariantChange>::new()),
        brands: Arc::new(InMemoryPublisher::<BrandChange>::new()),
    };
    let (sender, brand_queue) = mpsc::channel(brand_queue_capacity);
    let state = Arc::new(AppState::new(Stores::in_memory(), publishers, sender));

    TestApp {
        router: api::create_app(state, get_metrics_handle()),
        product_events,
        brand_queue,
    }
}

fn setup() -> TestApp {
    setup_with_queue(8)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

async fn create_shirt(app: &Router) -> String {
    let (status, json) = send(
        app,
        "POST",
        "/products",
        Some(json!({ "name": "Shirt", "price": 100, "seller": "s1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_check() {
    let app = setup();

    let (status, json) = send(&app.router, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_create_product() {
    let app = setup();

    let (status, json) = send(
        &app.router,
        "POST",
        "/products",
        Some(json!({ "name": "Shirt", "price": 100, "seller": "s1" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["successful"], true);
    assert_eq!(json["message"], "Created Successfully");
    assert_eq!(json["data"]["version"], 3);
    assert!(json["data"]["id"].as_str().is_some());
    assert!(json.get("errors").is_none());
    assert_eq!(app.product_events.events().len(), 3);
}

#[tokio::test]
async fn test_create_product_reports_field_errors() {
    let app = setup();

    let (status, json) = send(
        &app.router,
        "POST",
        "/products",
        Some(json!({ "price": 100, "seller": "s1" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["successful"], false);
    assert_eq!(json["message"], "Provide valid Payload");
    let errors = json["errors"].as_array().unwrap();
    assert!(errors.iter().any(|e| e["field"] == "name"));
    assert!(app.product_events.events().is_empty());
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let app = setup();

    let request = Request::builder()
        .method("POST")
        .uri("/products")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["message"], "Provide valid Body");
}

#[tokio::test]
async fn test_update_product_and_stale_version() {
    let app = setup();
    let id = create_shirt(&app.router).await;

    let (status, json) = send(
        &app.router,
        "PATCH",
        &format!("/products/{id}/3"),
        Some(json!({ "name": "Tee", "price": 120 })),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(json["message"], "Updated Successfully");
    assert_eq!(json["data"]["version"], 5);

    let (status, json) = send(
        &app.router,
        "PATCH",
        &format!("/products/{id}/3"),
        Some(json!({ "name": "Top" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["message"], "Version conflict");
}

#[tokio::test]
async fn test_unchanged_and_empty_updates() {
    let app = setup();
    let id = create_shirt(&app.router).await;

    let (status, json) = send(
        &app.router,
        "PATCH",
        &format!("/products/{id}/3"),
        Some(json!({ "name": "Shirt" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["errors"],
        json!([{ "field": "name", "error": "Name already updated" }])
    );

    let (status, json) = send(&app.router, "PATCH", &format!("/products/{id}/3"), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "No updates found");
}

#[tokio::test]
async fn test_missing_product_is_not_found() {
    let app = setup();
    let id = common::AggregateId::new();

    let (status, json) = send(
        &app.router,
        "PATCH",
        &format!("/products/{id}/1"),
        Some(json!({ "name": "Tee" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["successful"], false);
}

#[tokio::test]
async fn test_invalid_path_is_bad_request() {
    let app = setup();

    let (status, _) = send(&app.router, "DELETE", "/products/not-a-uuid/1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let id = common::AggregateId::new();
    let (status, _) = send(&app.router, "DELETE", &format!("/products/{id}/zero"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_publish_then_delete() {
    let app = setup();
    let id = create_shirt(&app.router).await;

    let (status, json) = send(&app.router, "POST", &format!("/products/{id}/3/publish"), None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(json["data"]["version"], 4);

    let (status, _) = send(&app.router, "POST", &format!("/products/{id}/4/publish"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = send(&app.router, "DELETE", &format!("/products/{id}/4"), None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(json["message"], "Deleted Successfully");
    assert_eq!(json["data"], json!({}));

    let last = app.product_events.events().pop().unwrap();
    assert_eq!(last.event_type, "PRODUCT_DELETED");
    assert_eq!(last.version.as_i64(), 5);
}

#[tokio::test]
async fn test_variant_duplicate_attributes() {
    let app = setup();
    let product = create_shirt(&app.router).await;
    let body = json!({ "product": product, "attributes": { "Color": "Red" }, "price": 100 });

    let (status, json) = send(&app.router, "POST", "/variants", Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let first = json["data"]["id"].as_str().unwrap().to_string();

    let (status, json) = send(&app.router, "POST", "/variants", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["errors"],
        json!([{
            "field": "attributes",
            "error": format!("Variant Attributes Duplication with ID {first}")
        }])
    );
}

#[tokio::test]
async fn test_product_with_unknown_brand() {
    let app = setup();

    let (status, json) = send(
        &app.router,
        "POST",
        "/products",
        Some(json!({ "name": "Shirt", "price": 100, "seller": "s1", "brand": "Acme" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["errors"],
        json!([{ "field": "brand", "error": "Brand Acme Not found" }])
    );

    let (status, _) = send(&app.router, "POST", "/brands", Some(json!({ "name": "Acme" }))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app.router,
        "POST",
        "/products",
        Some(json!({ "name": "Shirt", "price": 100, "seller": "s1", "brand": "Acme" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_brand_message_is_queued() {
    let mut app = setup();

    let (status, json) = send(
        &app.router,
        "POST",
        "/brands/messages",
        Some(json!({ "type": "BRAND_CREATED", "payload": { "name": "Acme" } })),
    )
    .await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(json["successful"], true);
    let message = app.brand_queue.recv().await.unwrap();
    assert_eq!(message.message_type, "BRAND_CREATED");
    assert_eq!(message.payload.name.as_deref(), Some("Acme"));
}

#[tokio::test]
async fn test_full_brand_queue_is_unavailable() {
    let app = setup_with_queue(1);
    let message = json!({ "type": "BRAND_CREATED", "payload": { "name": "Acme" } });

    let (status, _) = send(&app.router, "POST", "/brands/messages", Some(message.clone())).await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let (status, json) = send(&app.router, "POST", "/brands/messages", Some(message)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["successful"], false);
}

#[tokio::test]
async fn test_brand_worker_creates_brands() {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (state, background) = api::start(&Config::default(), Stores::in_memory(), shutdown_rx);
    let app = api::create_app(state.clone(), get_metrics_handle());

    let (status, _) = send(
        &app,
        "POST",
        "/brands/messages",
        Some(json!({ "type": "BRAND_CREATED", "payload": { "name": "Acme" } })),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let brands = state.brands.engine().store();
    let mut found = None;
    for _ in 0..50 {
        found = brands
            .find_one(DocumentQuery::new().eq("name", "Acme"))
            .await
            .unwrap();
        if found.is_some() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(found.is_some());

    shutdown_tx.send(true).unwrap();
    assert_eq!(background.brand_worker.await.unwrap(), 1);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = setup();
    create_shirt(&app.router).await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("catalog_mutations_total"));
}
