//! # Workforce Security
//!
//! JWT issuance and validation, Argon2 credential checks, and the static
//! role-to-policy table enforced before any request is dispatched.

pub mod jwt;
pub mod password;
pub mod rbac;

pub use jwt::*;
pub use password::*;
pub use rbac::*;
