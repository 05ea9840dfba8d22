use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use souq_auth::AuthError;

pub fn auth_error_to_response(err: &AuthError) -> axum::response::Response {
    match err {
        AuthError::MissingOrMalformedCredential | AuthError::InvalidToken => {
            json_error(StatusCode::UNAUTHORIZED, err.code(), err.to_string())
        }
        AuthError::NotApproved | AuthError::Forbidden => {
            json_error(StatusCode::FORBIDDEN, err.code(), err.to_string())
        }
        // Server-side faults; details stay in the log.
        AuthError::ConfigurationInvalid(_) | AuthError::TokenCreationFailed(_) => {
            tracing::error!(error = %err, "internal auth failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "internal server error",
            )
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
