//! Mindclub API Library
//!
//! HTTP handlers, authentication and application setup. The binary in main.rs
//! only loads config and starts the server built here.

mod api_doc;
pub mod auth;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;
pub mod telemetry;

pub use error::ErrorResponse;
pub use state::AppState;
