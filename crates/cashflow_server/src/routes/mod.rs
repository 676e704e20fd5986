pub mod accounts;
pub mod events;
pub mod projection;

pub use accounts::account_routes;
pub use events::event_routes;
pub use projection::projection_routes;
