use axum::{
    Json,
    extract::{Query, State},
};
use cashflow_core::ProjectionConfig;
use cashflow_core::model::{Projection, Snapshot};

use super::AppState;
use crate::calendar::calendar_feed;
use crate::error::{ApiError, ApiResult};
use crate::models::{CalendarEvent, StateQuery, StateResponse};
use crate::validation;

pub async fn get_state(
    State(state): State<AppState>,
    Query(query): Query<StateQuery>,
) -> ApiResult<Json<StateResponse>> {
    let (snapshot, projection) = run_projection(&state, &query).await?;

    Ok(Json(StateResponse {
        event_occurrences: projection.occurrences,
        account_balances: projection.balances,
        events: snapshot.events,
        accounts: snapshot.accounts,
        diagnostics: projection.diagnostics,
    }))
}

pub async fn get_calendar(
    State(state): State<AppState>,
    Query(query): Query<StateQuery>,
) -> ApiResult<Json<Vec<CalendarEvent>>> {
    let (snapshot, projection) = run_projection(&state, &query).await?;

    Ok(Json(calendar_feed(
        &projection,
        &snapshot.events,
        &snapshot.accounts,
    )))
}

/// Project a consistent copy of the store off the async runtime
async fn run_projection(
    state: &AppState,
    query: &StateQuery,
) -> ApiResult<(Snapshot, Projection)> {
    let config = request_config(&state.projection, query)?;
    let snapshot = state.store.snapshot()?;
    let now = state.clock.now();

    let (snapshot, projection) = tokio::task::spawn_blocking(move || {
        let projection = snapshot.project(&config, now);
        (snapshot, projection)
    })
    .await
    .map_err(|_| ApiError::InternalError)?;

    if !projection.is_clean() {
        tracing::debug!(
            diagnostics = projection.diagnostics.len(),
            "projection has diagnostics"
        );
    }

    Ok((snapshot, projection))
}

fn request_config(base: &ProjectionConfig, query: &StateQuery) -> ApiResult<ProjectionConfig> {
    match query.horizon_years {
        Some(years) => {
            validation::validate_horizon_years(years)?;
            Ok(base.clone().with_horizon_years(years))
        }
        None => Ok(base.clone()),
    }
}
