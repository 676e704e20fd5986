//! HTTP API over the cash-flow projection engine
//!
//! Accounts and events are kept in a JSON file by [`store::Store`]; every
//! read of `/api/state` or `/api/calendar` projects them afresh.

pub mod calendar;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod routes;
pub mod store;
pub mod validation;

use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use handlers::{AppState, Clock};

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .merge(routes::account_routes())
        .merge(routes::event_routes())
        .merge(routes::projection_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
