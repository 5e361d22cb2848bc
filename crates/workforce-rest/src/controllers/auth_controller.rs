//! Authentication controller.

use crate::{
    extractors::AuthenticatedUser,
    responses::{ok, ApiResult},
    state::AppState,
};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::debug;
use workforce_service::{LoginRequest, LoginResponse, ProfileResponse};

/// Creates the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/profile", get(profile))
}

/// Login with username and password.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 400, description = "Username or password missing", body = workforce_core::ErrorResponse),
        (status = 401, description = "Invalid credentials", body = workforce_core::ErrorResponse)
    )
)]
pub async fn login(State(state): State<AppState>, Json(request): Json<LoginRequest>) -> ApiResult<LoginResponse> {
    debug!(username = %request.username, "Login request");

    let response = state.auth_service.login(request).await?;
    ok(response)
}

/// The authenticated caller and its claims.
#[utoipa::path(
    get,
    path = "/api/auth/profile",
    tag = "auth",
    responses(
        (status = 200, description = "Caller profile", body = ProfileResponse),
        (status = 401, description = "Missing or invalid token", body = workforce_core::ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn profile(State(state): State<AppState>, user: AuthenticatedUser) -> ApiResult<ProfileResponse> {
    ok(state.auth_service.profile(&user))
}
