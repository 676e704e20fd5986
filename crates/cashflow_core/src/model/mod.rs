mod accounts;
mod events;
mod ids;
mod results;
mod snapshot;
mod time;

pub use accounts::Account;
pub use events::{Direction, Event, Exception, ExceptionKind, parse_exception_key};
pub use ids::{AccountId, EventId, OccurrenceId};
pub use results::{AccountBalance, Diagnostic, DiagnosticKind, Occurrence, Projection};
pub use snapshot::Snapshot;
pub use time::OffsetTimestamp;
