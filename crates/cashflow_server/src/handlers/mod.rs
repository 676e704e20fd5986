pub mod accounts;
pub mod events;
pub mod projection;

pub use accounts::*;
pub use events::*;
pub use projection::*;

use std::sync::Arc;

use cashflow_core::ProjectionConfig;
use jiff::Timestamp;

use crate::error::{ApiError, ApiResult};
use crate::store::Store;

/// Shared state handed to every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    /// Horizon and zone used when a request does not override them
    pub projection: ProjectionConfig,
    pub clock: Clock,
}

impl AppState {
    pub fn new(store: Store, projection: ProjectionConfig) -> Self {
        Self {
            store: Arc::new(store),
            projection,
            clock: Clock::System,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}

/// Run a store write on the blocking pool; it holds the store lock across the
/// file write and fsync
pub(crate) async fn write_store<T, F>(state: &AppState, write: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce(&Store) -> ApiResult<T> + Send + 'static,
{
    let store = Arc::clone(&state.store);
    tokio::task::spawn_blocking(move || write(&store))
        .await
        .map_err(|_| ApiError::InternalError)?
}

/// Source of the projection's `now`
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    System,
    Fixed(Timestamp),
}

impl Clock {
    pub fn now(&self) -> Timestamp {
        match self {
            Clock::System => Timestamp::now(),
            Clock::Fixed(at) => *at,
        }
    }
}
