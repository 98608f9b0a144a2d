//! Line-delimited JSON protocol for the sidecar: one request per line on
//! stdin, one response per line on stdout. Handlers are grouped per method
//! area and chained by the router.

mod error;
mod handlers;
mod helpers;
mod router;
mod types;

pub use router::handle_request;
pub use types::{AppState, Request};
