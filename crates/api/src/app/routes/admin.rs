//! Back-office routes: approved super admins and admins only.

use axum::{Json, Router, extract::Extension, response::IntoResponse, routing::get};
use serde_json::json;

use crate::context::AuthContext;

pub fn router() -> Router {
    Router::new().route("/whoami", get(whoami))
}

async fn whoami(Extension(ctx): Extension<AuthContext>) -> impl IntoResponse {
    let mut body = super::identity(&ctx);
    body["permissions"] = json!(
        ctx.admin_access()
            .map(|access| access.permissions.as_slice())
            .unwrap_or_default()
    );
    Json(body)
}
