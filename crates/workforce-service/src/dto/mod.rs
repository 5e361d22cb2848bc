//! Data Transfer Objects (DTOs).

mod auth_dto;
mod employee_dto;

pub use auth_dto::*;
pub use employee_dto::*;
