//! MySQL persistence through SQLx.

mod employee;
mod repository;
mod sql;

pub use employee::EmployeeRow;
pub use repository::{SqlRepository, SqlRepositoryFactory};
pub use sql::SqlEntity;
