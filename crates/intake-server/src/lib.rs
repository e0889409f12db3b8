//! Submission intake service.
//!
//! A submission moves through a fixed sequence: the payload is validated at
//! the boundary, the normalized record is upserted, and only then is a
//! best-effort welcome message attempted. A notification failure is logged and
//! dropped; it never changes what the caller is told.

pub mod auth;
pub mod error;
pub mod intake;
pub mod logging;
pub mod message;
pub mod notify;
pub mod response;
pub mod routes;
pub mod server;
pub mod store;

pub use error::{IntakeError, StorageFailure};
pub use intake::{Accepted, Intake, NotifyOutcome};
pub use notify::{Mailer, NotifyError, Notifier, OutboundMessage};
pub use routes::{router, AppState};
pub use store::{SqliteSubmissionStore, SubmissionStore};
