//! Invoice form: line items, header fields, totals and per-user sessions.

pub mod handlers;
pub mod model;
pub mod session;
pub mod store;

pub use handlers::config;
pub use session::{InvoiceSession, SessionError, SessionView};
pub use store::{SessionStore, SharedSession};
