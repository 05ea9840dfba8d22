//! Routes available to any authenticated user, approved or not.

use axum::{Json, Router, extract::Extension, response::IntoResponse, routing::get};

use crate::context::AuthContext;

pub fn router() -> Router {
    Router::new().route("/me", get(me))
}

/// Echo the caller's identity as carried by the access token.
async fn me(Extension(ctx): Extension<AuthContext>) -> impl IntoResponse {
    Json(super::identity(&ctx))
}
