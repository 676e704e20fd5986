use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use cashflow_core::model::{Event, EventId};

use super::{AppState, write_store};
use crate::error::ApiResult;
use crate::models::CreateEventRequest;
use crate::validation;

pub async fn list_events(State(state): State<AppState>) -> ApiResult<Json<Vec<Event>>> {
    Ok(Json(state.store.events()?))
}

pub async fn create_event(
    State(state): State<AppState>,
    Json(req): Json<CreateEventRequest>,
) -> ApiResult<(StatusCode, Json<Event>)> {
    validation::validate_event(&req)?;

    let event = write_store(&state, move |store| store.create_event(req)).await?;
    tracing::info!(
        id = %event.id,
        account = %event.account,
        recurring = event.is_recurring(),
        "event created"
    );

    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = EventId::new(id);
    let removed = write_store(&state, move |store| store.delete_event(&id)).await?;
    tracing::info!(id = %removed.id, "event deleted");

    Ok(StatusCode::NO_CONTENT)
}
