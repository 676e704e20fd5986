use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::handlers::{self, AppState};

pub fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/api/events", get(handlers::list_events))
        .route("/api/events", post(handlers::create_event))
        .route("/api/events/{id}", delete(handlers::delete_event))
}
