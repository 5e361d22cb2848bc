//! Request cancellation extractor.

use crate::middleware::RequestContext;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;
use tokio_util::sync::CancellationToken;

/// The request's cancellation token, handed to the dispatchers.
///
/// Outside the request-context middleware a fresh token is returned.
#[derive(Debug, Clone)]
pub struct RequestCancellation(pub CancellationToken);

#[async_trait]
impl<S> FromRequestParts<S> for RequestCancellation
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .extensions
            .get::<RequestContext>()
            .map_or_else(CancellationToken::new, |ctx| ctx.cancel.clone());
        Ok(Self(token))
    }
}
