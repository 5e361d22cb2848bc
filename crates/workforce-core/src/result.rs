//! Result type aliases for the Workforce HR API.

use crate::WorkforceError;

/// A specialized `Result` type for Workforce operations.
pub type WorkforceResult<T> = Result<T, WorkforceError>;

