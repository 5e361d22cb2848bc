//! Request middleware.

mod auth;
mod request_context;

pub use auth::*;
pub use request_context::*;
