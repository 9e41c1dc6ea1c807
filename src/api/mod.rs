use axum::{
    Router,
    http::{HeaderValue, Method, Uri},
    middleware,
    routing::get,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::SharedState;

mod charts;
mod error;
mod observability;
mod seed;
mod system;
mod transactions;
mod types;
pub mod validation;

pub use error::ApiError;
pub use types::*;

use crate::services::{SeedService, TransactionService};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<Config> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn transaction_service(&self) -> &Arc<dyn TransactionService> {
        &self.shared.transaction_service
    }

    #[must_use]
    pub fn seed_service(&self) -> &Arc<SeedService> {
        &self.shared.seed_service
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().server.cors_allowed_origins.clone();

    let cors_layer = if cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .route("/initialize", get(seed::initialize))
        .route("/transactions", get(transactions::list_transactions))
        .route("/statistics", get(charts::get_statistics))
        .route("/barchart", get(charts::get_bar_chart))
        .route("/piechart", get(charts::get_pie_chart))
        .route("/combinedData", get(charts::get_combined))
        .route("/health/live", get(system::health_live))
        .route("/health/ready", get(system::health_ready))
        .route("/metrics", get(observability::get_metrics))
        .fallback(not_found)
        .with_state(state)
        .layer(
            cors_layer
                .allow_methods([Method::GET, Method::OPTIONS])
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found("Route", uri.path())
}
