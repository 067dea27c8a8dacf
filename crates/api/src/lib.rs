//! HTTP API server with observability for the product catalog.
//!
//! Exposes create, update and delete endpoints for products, variants and
//! brands over the mutation engine, with structured logging (tracing) and
//! Prometheus metrics.

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod sink;
pub mod state;

use std::sync::Arc;

use axum::Router;
use axum::routing::{patch, post};
use domain::{BrandChange, BrandMessageWorker, ChannelPublisher, ProductChange, VariantChange};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use state::{AppState, Publishers, Stores};

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", axum::routing::get(routes::metrics::render))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", axum::routing::get(routes::health::check))
        .route("/products", post(routes::products::create))
        .route(
            "/products/{id}/{version}",
            patch(routes::products::update).delete(routes::products::delete),
        )
        .route(
            "/products/{id}/{version}/publish",
            post(routes::products::publish),
        )
        .route(
            "/products/{id}/{version}/unpublish",
            post(routes::products::unpublish),
        )
        .route("/variants", post(routes::variants::create))
        .route(
            "/variants/{id}/{version}",
            patch(routes::variants::update).delete(routes::variants::delete),
        )
        .route("/brands", post(routes::brands::create))
        .route("/brands/messages", post(routes::brands::enqueue))
        .route(
            "/brands/{id}/{version}",
            patch(routes::brands::update).delete(routes::brands::delete),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(axum::middleware::from_fn(middleware::track_metrics))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Background tasks started alongside the router.
pub struct Background {
    /// Event sinks, one per topic; each ends once its publisher is dropped.
    pub sinks: Vec<JoinHandle<usize>>,
    /// Inbound brand worker; ends on shutdown.
    pub brand_worker: JoinHandle<usize>,
}

/// Wires the services over `stores`, spawns the event sinks and the brand
/// worker, and returns the shared state.
pub fn start(
    config: &Config,
    stores: Stores,
    shutdown: watch::Receiver<bool>,
) -> (Arc<AppState>, Background) {
    let capacity = config.event_queue_capacity;
    let (products, product_events) = ChannelPublisher::<ProductChange>::channel(capacity);
    let (variants, variant_events) = ChannelPublisher::<VariantChange>::channel(capacity);
    let (brands, brand_events) = ChannelPublisher::<BrandChange>::channel(capacity);

    let sinks = vec![
        sink::spawn("products", product_events),
        sink::spawn("variants", variant_events),
        sink::spawn("brands", brand_events),
    ];

    let publishers = Publishers {
        products: Arc::new(products),
        variants: Arc::new(variants),
        brands: Arc::new(brands),
    };

    let (brand_messages, brand_queue) = mpsc::channel(config.brand_queue_capacity);
    let state = Arc::new(AppState::new(stores, publishers, brand_messages));

    let worker = BrandMessageWorker::new(state.brands.clone(), brand_queue, shutdown);
    let brand_worker = tokio::spawn(worker.run());

    (state, Background { sinks, brand_worker })
}
