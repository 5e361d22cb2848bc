//! Employee controller.
//!
//! Every route checks its policy before dispatching, so a caller without
//! the policy never reaches a handler.

use crate::{
    extractors::{AuthenticatedUser, RequestCancellation, ValidatedJson},
    responses::{created, ok, ApiResponse, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::debug;
use workforce_core::{Policy, ValidateExt, WorkforceError, WorkforceResult};
use workforce_security::ClaimsExt;
use workforce_service::{
    CreateEmployeeCommand, DeleteEmployeeCommand, EmployeePageResponse, EmployeeResponse, GetEmployeeQuery,
    ListEmployeesParams, ListEmployeesQuery, UpdateEmployeeCommand, UpdateEmployeeRequest,
};

/// Creates the employee router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_employees).post(create_employee))
        .route(
            "/:employee_no",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
}

fn found(result: Option<EmployeeResponse>, employee_no: &str) -> WorkforceResult<EmployeeResponse> {
    result.ok_or_else(|| WorkforceError::not_found("Employee", employee_no))
}

/// List employees a page at a time.
#[utoipa::path(
    get,
    path = "/api/employees",
    tag = "employees",
    params(ListEmployeesParams),
    responses(
        (status = 200, description = "A page of employees", body = EmployeePageResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "ReadEmployees policy not satisfied")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_employees(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    RequestCancellation(cancel): RequestCancellation,
    Query(params): Query<ListEmployeesParams>,
) -> ApiResult<EmployeePageResponse> {
    user.require_policy(&state.policies, Policy::ReadEmployees)?;

    let page = state
        .queries
        .dispatch::<_, EmployeePageResponse>(ListEmployeesQuery::from(params), &cancel)
        .await?
        .ok_or_else(|| WorkforceError::internal("List query returned no page"))?;
    ok(page)
}

/// Get an employee by national ID number.
#[utoipa::path(
    get,
    path = "/api/employees/{employee_no}",
    tag = "employees",
    params(("employee_no" = String, Path, description = "National ID number")),
    responses(
        (status = 200, description = "The employee", body = EmployeeResponse),
        (status = 400, description = "Blank national ID number", body = workforce_core::ErrorResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "ReadEmployees policy not satisfied"),
        (status = 404, description = "No such employee", body = workforce_core::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_employee(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    RequestCancellation(cancel): RequestCancellation,
    Path(employee_no): Path<String>,
) -> ApiResult<EmployeeResponse> {
    user.require_policy(&state.policies, Policy::ReadEmployees)?;
    debug!(employee_no = %employee_no, "Get employee request");

    let query = GetEmployeeQuery::new(employee_no.clone());
    query.validate_request()?;

    let result = state
        .queries
        .dispatch::<_, EmployeeResponse>(query, &cancel)
        .await?;
    ok(found(result, &employee_no)?)
}

/// Create an employee.
#[utoipa::path(
    post,
    path = "/api/employees",
    tag = "employees",
    request_body = CreateEmployeeCommand,
    responses(
        (status = 201, description = "Employee created", body = EmployeeResponse),
        (status = 400, description = "Invalid employee", body = workforce_core::ErrorResponse),
        (status = 403, description = "CreateEmployees policy not satisfied"),
        (status = 409, description = "Employee already exists", body = workforce_core::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_employee(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    RequestCancellation(cancel): RequestCancellation,
    ValidatedJson(command): ValidatedJson<CreateEmployeeCommand>,
) -> Result<(StatusCode, Json<ApiResponse<EmployeeResponse>>), AppError> {
    user.require_policy(&state.policies, Policy::CreateEmployees)?;
    debug!(national_id_number = %command.national_id_number, "Create employee request");

    let employee_no = command.national_id_number.clone();
    let result = state
        .commands
        .dispatch::<_, EmployeeResponse>(command, &cancel)
        .await?;
    Ok(created(found(result, &employee_no)?))
}

/// Update an employee.
#[utoipa::path(
    put,
    path = "/api/employees/{employee_no}",
    tag = "employees",
    params(("employee_no" = String, Path, description = "National ID number")),
    request_body = UpdateEmployeeRequest,
    responses(
        (status = 200, description = "Employee updated", body = EmployeeResponse),
        (status = 400, description = "Invalid changes", body = workforce_core::ErrorResponse),
        (status = 403, description = "UpdateEmployees policy not satisfied"),
        (status = 404, description = "No such employee", body = workforce_core::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_employee(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    RequestCancellation(cancel): RequestCancellation,
    Path(employee_no): Path<String>,
    ValidatedJson(changes): ValidatedJson<UpdateEmployeeRequest>,
) -> ApiResult<EmployeeResponse> {
    user.require_policy(&state.policies, Policy::UpdateEmployees)?;
    debug!(employee_no = %employee_no, "Update employee request");

    let command = UpdateEmployeeCommand {
        national_id_number: employee_no.clone(),
        changes,
    };
    let result = state
        .commands
        .dispatch::<_, EmployeeResponse>(command, &cancel)
        .await?;
    ok(found(result, &employee_no)?)
}

/// Delete an employee.
#[utoipa::path(
    delete,
    path = "/api/employees/{employee_no}",
    tag = "employees",
    params(("employee_no" = String, Path, description = "National ID number")),
    responses(
        (status = 200, description = "The deleted employee", body = EmployeeResponse),
        (status = 403, description = "DeleteEmployees policy not satisfied"),
        (status = 404, description = "No such employee", body = workforce_core::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_employee(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    RequestCancellation(cancel): RequestCancellation,
    Path(employee_no): Path<String>,
) -> ApiResult<EmployeeResponse> {
    user.require_policy(&state.policies, Policy::DeleteEmployees)?;
    debug!(employee_no = %employee_no, "Delete employee request");

    let command = DeleteEmployeeCommand {
        national_id_number: employee_no.clone(),
    };
    let result = state
        .commands
        .dispatch::<_, EmployeeResponse>(command, &cancel)
        .await?;
    ok(found(result, &employee_no)?)
}
