use axum::{Router, routing::get};

use crate::handlers::{self, AppState};

pub fn projection_routes() -> Router<AppState> {
    Router::new()
        .route("/api/state", get(handlers::get_state))
        .route("/api/calendar", get(handlers::get_calendar))
}
