//! Token verification with strict claim-type discrimination.

use std::sync::Arc;

use crate::claims::{AccessClaim, Claim, ClaimType, RefreshClaim};
use crate::clock::{Clock, SystemClock};
use crate::codec::{DecodeFailure, Decoded, TokenCodec};
use crate::error::{AuthError, AuthResult};

/// Turns a bearer token into a verified access claim.
///
/// The guard chain depends on this trait rather than on [`TokenVerifier`]
/// so the HTTP layer can be exercised without real tokens.
pub trait AccessTokenVerifier: Send + Sync {
    fn verify_access_token(&self, token: &str) -> AuthResult<AccessClaim>;
}

/// Opens tokens minted by [`crate::TokenIssuer`] under the same key.
///
/// Every failure (malformed, tampered, expired, not yet valid, wrong type)
/// collapses into [`AuthError::InvalidToken`]; the reason is only logged.
#[derive(Clone)]
pub struct TokenVerifier {
    codec: TokenCodec,
    clock: Arc<dyn Clock>,
}

impl core::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenVerifier").finish_non_exhaustive()
    }
}

impl TokenVerifier {
    pub fn new(codec: TokenCodec) -> Self {
        Self {
            codec,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn verify_access_token(&self, token: &str) -> AuthResult<AccessClaim> {
        match self.open(token)? {
            Claim::Access(claim) => Ok(claim),
            other => Err(type_mismatch(ClaimType::Access, &other)),
        }
    }

    pub fn verify_refresh_token(&self, token: &str) -> AuthResult<RefreshClaim> {
        match self.open(token)? {
            Claim::Refresh(claim) => Ok(claim),
            other => Err(type_mismatch(ClaimType::Refresh, &other)),
        }
    }

    fn open(&self, token: &str) -> AuthResult<Claim> {
        let decoded: Result<Decoded<Claim>, DecodeFailure> =
            self.codec.decode(token, self.clock.now());

        decoded.map(|d| d.payload).map_err(|reason| {
            tracing::debug!(reason = reason.as_str(), "token rejected");
            AuthError::InvalidToken
        })
    }
}

impl AccessTokenVerifier for TokenVerifier {
    fn verify_access_token(&self, token: &str) -> AuthResult<AccessClaim> {
        TokenVerifier::verify_access_token(self, token)
    }
}

fn type_mismatch(expected: ClaimType, actual: &Claim) -> AuthError {
    tracing::debug!(
        reason = "claim_type_mismatch",
        %expected,
        actual = %actual.claim_type(),
        token_id = %actual.token_id(),
        "token rejected"
    );
    AuthError::InvalidToken
}
