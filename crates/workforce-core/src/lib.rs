//! # Workforce Core
//!
//! Core types, traits, and error definitions for the Workforce HR API.
//! This crate provides the domain model, the predicate language used at the
//! repository boundary, and the messaging primitives (handler registry and
//! query/command dispatchers) that every request flows through.

pub mod domain;
pub mod error;
pub mod messaging;
pub mod pagination;
pub mod predicate;
pub mod result;
pub mod traits;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use pagination::*;
pub use predicate::*;
pub use result::*;
pub use traits::*;
pub use validation::*;
