//! HTTP API application wiring (Axum router + guard chains).
//!
//! - `routes/`: HTTP routes + handlers, one file per route group
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Router, routing::get};

use souq_auth::{AccessTokenVerifier, GuardChain};

use crate::middleware::{self, GuardState};

pub mod errors;
pub mod routes;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// Every route group declares its own guard chain; the verifier is shared.
pub fn build_app(verifier: Arc<dyn AccessTokenVerifier>) -> Router {
    let guarded = |router: Router, chain: GuardChain| {
        router.route_layer(axum::middleware::from_fn_with_state(
            GuardState::new(verifier.clone(), chain),
            middleware::guard_middleware,
        ))
    };

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(guarded(
            routes::account::router(),
            GuardChain::authenticated(),
        ))
        .nest(
            "/shop",
            guarded(
                routes::shop::router(),
                GuardChain::approved().require_non_admin(),
            ),
        )
        .nest("/admin", guarded(routes::admin::router(), GuardChain::admin()))
}
