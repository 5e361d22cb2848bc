//! Custom Axum extractors.

mod claims;
mod context;
mod validated;

pub use claims::*;
pub use context::*;
pub use validated::*;
