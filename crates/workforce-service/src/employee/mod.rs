//! Employee query and command handlers.

mod commands;
mod queries;

pub use commands::*;
pub use queries::*;
