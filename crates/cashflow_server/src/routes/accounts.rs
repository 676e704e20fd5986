use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers::{self, AppState};

pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/api/accounts", get(handlers::list_accounts))
        .route("/api/accounts", post(handlers::create_account))
}
