use axum::{Json, extract::State, http::StatusCode};
use cashflow_core::model::Account;

use super::{AppState, write_store};
use crate::error::ApiResult;
use crate::models::CreateAccountRequest;
use crate::validation;

pub async fn list_accounts(State(state): State<AppState>) -> ApiResult<Json<Vec<Account>>> {
    Ok(Json(state.store.accounts()?))
}

pub async fn create_account(
    State(state): State<AppState>,
    Json(req): Json<CreateAccountRequest>,
) -> ApiResult<(StatusCode, Json<Account>)> {
    validation::validate_account(&req)?;

    let account = write_store(&state, move |store| store.create_account(req)).await?;
    tracing::info!(id = %account.id, name = account.name.as_str(), "account created");

    Ok((StatusCode::CREATED, Json(account)))
}
