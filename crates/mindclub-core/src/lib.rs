//! Mindclub Core Library
//!
//! Domain models, error types, configuration, and validation shared by every
//! Mindclub crate.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod validation;

pub use config::{AppConfig, BaseConfig, Config, MediaConfig, PaymentConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::MediaBackend;
