//! # Workforce REST
//!
//! HTTP boundary of the Workforce HR API: authentication, employee routes
//! dispatched through the query and command dispatchers, health checks and
//! the OpenAPI document.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
