//! Error kinds surfaced by the token subsystem.

use thiserror::Error;

/// Result type used across `souq-auth`.
pub type AuthResult<T> = Result<T, AuthError>;

/// Externally visible failure of configuration, issuance, verification or a guard.
///
/// Verification failures are deliberately collapsed into [`AuthError::InvalidToken`];
/// the precise reason is only ever logged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Bad duration strings, bad/missing/short key. Fatal, startup only.
    #[error("invalid configuration: {0}")]
    ConfigurationInvalid(String),

    /// Issuance failed; no token was produced.
    #[error("token creation failed: {0}")]
    TokenCreationFailed(String),

    /// Malformed, tampered, expired, not-yet-valid or wrong claim type.
    #[error("invalid token")]
    InvalidToken,

    /// The authorization header was absent or not `Bearer <token>`.
    #[error("missing or malformed bearer credential")]
    MissingOrMalformedCredential,

    #[error("account is not approved")]
    NotApproved,

    #[error("forbidden")]
    Forbidden,
}

impl AuthError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::ConfigurationInvalid(msg.into())
    }

    pub fn creation(msg: impl Into<String>) -> Self {
        Self::TokenCreationFailed(msg.into())
    }

    /// Stable machine-readable code (client facing).
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::ConfigurationInvalid(_) => "configuration_invalid",
            AuthError::TokenCreationFailed(_) => "token_creation_failed",
            AuthError::InvalidToken => "invalid_token",
            AuthError::MissingOrMalformedCredential => "missing_credential",
            AuthError::NotApproved => "not_approved",
            AuthError::Forbidden => "forbidden",
        }
    }

    /// True for failures that mean "who are you?" rather than "you may not".
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidToken | AuthError::MissingOrMalformedCredential
        )
    }
}
