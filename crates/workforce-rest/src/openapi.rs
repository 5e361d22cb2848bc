//! OpenAPI documentation configuration.

use crate::controllers::health_controller::{ComponentHealth, HealthResponse, ReadinessResponse};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use workforce_core::{ErrorResponse, FieldError, Role};
use workforce_service::{
    ClaimDto, CreateEmployeeCommand, EmployeePageResponse, EmployeeResponse, LoginRequest, LoginResponse,
    ProfileResponse, UpdateEmployeeRequest,
};

/// OpenAPI documentation for the Workforce HR API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Workforce HR API",
        version = "1.0.0",
        description = "Employee records behind role-based policies"
    ),
    paths(
        crate::controllers::auth_controller::login,
        crate::controllers::auth_controller::profile,
        crate::controllers::employee_controller::list_employees,
        crate::controllers::employee_controller::get_employee,
        crate::controllers::employee_controller::create_employee,
        crate::controllers::employee_controller::update_employee,
        crate::controllers::employee_controller::delete_employee,
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
    ),
    components(
        schemas(
            Role,
            ErrorResponse,
            FieldError,
            LoginRequest,
            LoginResponse,
            ProfileResponse,
            ClaimDto,
            CreateEmployeeCommand,
            UpdateEmployeeRequest,
            EmployeeResponse,
            EmployeePageResponse,
            HealthResponse,
            ComponentHealth,
            ReadinessResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "employees", description = "Employee records"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

/// Security addon for JWT Bearer authentication.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}
