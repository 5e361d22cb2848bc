//! # Workforce Repository
//!
//! Generic data access for the Workforce HR API.
//!
//! ```text
//! Query handler    → Arc<dyn ReadRepository<T>>      (reads only)
//! Command handler  → Arc<dyn RepositoryFactory<T>>
//!                      ↓ scope()
//!                    Box<dyn RepositoryScope<T>>     (reads, staged writes, commit)
//!                      ↓
//!        SqlRepository<T> (MySQL)  |  InMemoryRepository<T>
//! ```
//!
//! Callers describe rows with [`workforce_core::Predicate`]; each store
//! translates it natively, so no raw query text crosses this boundary.

pub mod memory;
pub mod mysql;
pub mod pool;
mod tracking;
pub mod traits;

pub use memory::{InMemoryRepository, InMemoryStore};
pub use mysql::{EmployeeRow, SqlEntity, SqlRepository, SqlRepositoryFactory};
pub use pool::*;
pub use traits::*;
