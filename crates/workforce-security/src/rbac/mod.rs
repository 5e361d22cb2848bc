//! Policy-based authorization.

mod checker;
mod policy;

pub use checker::*;
pub use policy::*;
