use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

use souq_auth::{AccessTokenVerifier, GuardChain};

use crate::app::errors::auth_error_to_response;
use crate::context::AuthContext;

/// Per-route-group guard configuration.
#[derive(Clone)]
pub struct GuardState {
    pub verifier: Arc<dyn AccessTokenVerifier>,
    pub chain: GuardChain,
}

impl GuardState {
    pub fn new(verifier: Arc<dyn AccessTokenVerifier>, chain: GuardChain) -> Self {
        Self { verifier, chain }
    }
}

pub async fn guard_middleware(
    State(state): State<GuardState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let header = authorization_header(req.headers());

    let claim = state
        .chain
        .evaluate(state.verifier.as_ref(), header)
        .map_err(|rejection| {
            tracing::debug!(
                guard = %rejection.guard,
                reason = rejection.error.code(),
                path = %req.uri().path(),
                "request rejected"
            );
            auth_error_to_response(&rejection.error)
        })?;

    req.extensions_mut().insert(AuthContext::new(claim));

    Ok(next.run(req).await)
}

/// The raw header value; a non-UTF-8 value is treated as malformed.
fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .map(|value| value.to_str().unwrap_or_default())
}
