//! Password hashing and the login credential store.

mod credentials;
mod hasher;

pub use credentials::*;
pub use hasher::*;
