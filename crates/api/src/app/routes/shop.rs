//! Storefront routes: approved wholesalers and retailers only.

use axum::{Json, Router, extract::Extension, response::IntoResponse, routing::get};

use crate::context::AuthContext;

pub fn router() -> Router {
    Router::new().route("/whoami", get(whoami))
}

async fn whoami(Extension(ctx): Extension<AuthContext>) -> impl IntoResponse {
    Json(super::identity(&ctx))
}
