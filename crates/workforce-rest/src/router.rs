//! Main application router.

use crate::{
    controllers::{auth_controller, employee_controller, health_controller},
    middleware::{auth_middleware, request_context_middleware, AuthMiddlewareState},
    openapi::ApiDoc,
    state::AppState,
};
use axum::{
    http::{HeaderName, HeaderValue},
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use workforce_config::{ObservabilityConfig, ServerConfig};

/// Creates the application router.
///
/// Layers, outermost first: request context, tracing, CORS, compression,
/// request timeout.
pub fn create_router(state: AppState, server: &ServerConfig, observability: &ObservabilityConfig) -> Router {
    let auth_state = AuthMiddlewareState::new(state.token_provider.clone());

    let api_router = Router::new()
        .nest("/auth", auth_controller::router())
        .nest("/employees", employee_controller::router())
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware));

    let mut router = Router::new()
        .merge(health_controller::router())
        .nest("/api", api_router)
        .route("/", get(root));

    if state.metrics.is_some() {
        router = router.route(&observability.metrics_path, get(health_controller::metrics));
    }

    let router = router
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(CompressionLayer::new())
        .layer(create_cors_layer(server))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_context_middleware));

    info!("Router created with REST endpoints and Swagger UI at /swagger-ui");
    router
}

/// Creates a CORS layer based on server configuration.
fn create_cors_layer(server: &ServerConfig) -> CorsLayer {
    if !server.cors_enabled {
        return CorsLayer::new();
    }

    let base = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([HeaderName::from_static("x-correlation-id")]);

    if server.cors_origins.iter().any(|o| o == "*") {
        return base.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = server
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(%origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    base.allow_origin(AllowOrigin::list(origins))
}

/// Root endpoint handler.
async fn root() -> &'static str {
    "Workforce HR API"
}
