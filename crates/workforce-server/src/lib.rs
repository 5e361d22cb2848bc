//! # Workforce Server
//!
//! Wires configuration, storage, cache, security and the REST router into
//! a runnable application.

pub mod app;
pub mod shutdown;
pub mod telemetry;

pub use app::Application;
