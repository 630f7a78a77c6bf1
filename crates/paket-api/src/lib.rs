//! Paket HTTP API.
//!
//! Exposes the delivery lifecycle over HTTP: delivery creation, status
//! lookup, carrier webhook ingestion, and a liveness probe. Configuration
//! loading and server wiring live here; the workflows themselves come from
//! `paket_tracking`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod handlers;
pub mod server;
pub mod state;

pub use config::Config;
pub use server::{create_router, start_server};
pub use state::AppState;
