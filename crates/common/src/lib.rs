//! Shared utilities, configuration, and error handling for the Coffee Shop API
//!
//! This crate provides common functionality used across the workspace:
//! - Configuration management following 12-factor principles
//! - Error types and the JSON error envelope shared with the auth layer
//! - Request extractors

pub mod config;
pub mod error;
pub mod extractors;
pub mod repository;

pub use config::Config;
pub use error::{error_body, Error, Result};
pub use extractors::ValidatedJson;
pub use repository::RepositoryError;
