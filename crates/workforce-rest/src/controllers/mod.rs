//! REST API controllers.

pub mod auth_controller;
pub mod employee_controller;
pub mod health_controller;
