//! # Workforce Config
//!
//! Configuration management for the Workforce HR API.
//! Supports layered configuration from files and environment variables,
//! validated on every load.

mod app_config;
mod loader;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::*;
