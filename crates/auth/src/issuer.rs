//! Token issuance for the login, refresh and impersonation flows.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use souq_core::{User, UserId};

use crate::claims::{AccessClaim, Claim, RefreshClaim, TokenId};
use crate::clock::{Clock, SystemClock};
use crate::codec::{TimeWindow, TokenCodec};
use crate::error::{AuthError, AuthResult};
use crate::permissions::AdminAccess;
use crate::settings::TokenSettings;

/// A freshly minted token together with the claim it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken<C> {
    pub token: String,
    pub claim: C,
    pub expires_at: DateTime<Utc>,
}

impl<C> IssuedToken<C> {
    /// Whole seconds until expiry, floored at zero.
    pub fn expires_in(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds().max(0)
    }
}

/// Access + refresh token returned by a login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access: IssuedToken<AccessClaim>,
    pub refresh: IssuedToken<RefreshClaim>,
}

/// Mints access, refresh and impersonation tokens.
///
/// Holds only immutable state; share one instance across all request handlers.
#[derive(Clone)]
pub struct TokenIssuer {
    codec: TokenCodec,
    access_ttl: TimeDelta,
    refresh_ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl core::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(codec: TokenCodec, access_ttl: TimeDelta, refresh_ttl: TimeDelta) -> Self {
        Self {
            codec,
            access_ttl,
            refresh_ttl,
            clock: Arc::new(SystemClock),
        }
    }

    /// Build an issuer from validated settings, returning the codec so a
    /// verifier can share the same key.
    pub fn from_settings(settings: TokenSettings) -> (Self, TokenCodec) {
        let (access_ttl, refresh_ttl, key) = settings.into_parts();
        let codec = TokenCodec::new(Arc::new(key));
        (Self::new(codec.clone(), access_ttl, refresh_ttl), codec)
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn access_ttl(&self) -> TimeDelta {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> TimeDelta {
        self.refresh_ttl
    }

    /// Issue an access token for `user`.
    ///
    /// `admin_access` is only accepted for `SuperAdmin`/`Admin` subjects.
    pub fn issue_access_token(
        &self,
        user: &User,
        admin_access: Option<AdminAccess>,
    ) -> AuthResult<IssuedToken<AccessClaim>> {
        if admin_access.is_some() && !user.role.is_admin() {
            return Err(AuthError::creation(format!(
                "admin access snapshot supplied for non-admin role '{}'",
                user.role
            )));
        }

        let mut claim = AccessClaim::for_user(TokenId::generate()?, user);
        claim.admin_access = admin_access;

        self.seal(claim, self.access_ttl, Claim::Access)
    }

    /// Issue a refresh token for `user`.
    pub fn issue_refresh_token(&self, user: &User) -> AuthResult<IssuedToken<RefreshClaim>> {
        let claim = RefreshClaim {
            token_id: TokenId::generate()?,
            user_id: user.id,
            role: user.role,
        };

        self.seal(claim, self.refresh_ttl, Claim::Refresh)
    }

    /// Issue an access token that lets `acting_admin` act as `target`.
    ///
    /// The token never carries admin permissions and lives half as long as a
    /// regular access token.
    pub fn issue_impersonation_token(
        &self,
        target: &User,
        acting_admin: UserId,
    ) -> AuthResult<IssuedToken<AccessClaim>> {
        let mut claim = AccessClaim::for_user(TokenId::generate()?, target);
        claim.impersonator_id = Some(acting_admin);

        let issued = self.seal(claim, self.access_ttl / 2, Claim::Access)?;
        tracing::info!(
            token_id = %issued.claim.token_id,
            user_id = %target.id,
            impersonator_id = %acting_admin,
            "impersonation token issued"
        );
        Ok(issued)
    }

    /// Issue an access and a refresh token in one go.
    pub fn issue_token_pair(
        &self,
        user: &User,
        admin_access: Option<AdminAccess>,
    ) -> AuthResult<TokenPair> {
        Ok(TokenPair {
            access: self.issue_access_token(user, admin_access)?,
            refresh: self.issue_refresh_token(user)?,
        })
    }

    fn seal<C>(
        &self,
        claim: C,
        ttl: TimeDelta,
        wrap: impl FnOnce(C) -> Claim,
    ) -> AuthResult<IssuedToken<C>>
    where
        C: Clone + Serialize,
    {
        if ttl <= TimeDelta::zero() {
            return Err(AuthError::creation(format!(
                "token lifetime must be positive, got {ttl}"
            )));
        }

        let issued_at = self.clock.now();
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| AuthError::creation("token expiry overflows the calendar"))?;
        let window = TimeWindow {
            issued_at,
            not_before: issued_at,
            expires_at,
        };

        let payload = wrap(claim.clone());
        let token = self.codec.encode(&payload, &window)?;

        tracing::debug!(
            token_id = %payload.token_id(),
            claim_type = %payload.claim_type(),
            %expires_at,
            "token issued"
        );

        Ok(IssuedToken {
            token,
            claim,
            expires_at,
        })
    }
}
