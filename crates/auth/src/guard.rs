//! Per-request authorization guard chain.
//!
//! A chain always starts with `Authenticate`, which turns the bearer credential
//! into a verified [`AccessClaim`]. The remaining guards are pure policy checks
//! over that claim. Evaluation stops at the first rejection.

use crate::authorize::{Policy, authorize};
use crate::claims::AccessClaim;
use crate::error::AuthError;
use crate::verifier::AccessTokenVerifier;

/// One step of a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Guard {
    Authenticate,
    RequireApproved,
    RequireAdmin,
    RequireNonAdmin,
}

impl Guard {
    pub fn as_str(&self) -> &'static str {
        match self {
            Guard::Authenticate => "authenticate",
            Guard::RequireApproved => "require_approved",
            Guard::RequireAdmin => "require_admin",
            Guard::RequireNonAdmin => "require_non_admin",
        }
    }
}

impl From<Policy> for Guard {
    fn from(value: Policy) -> Self {
        match value {
            Policy::Approved => Guard::RequireApproved,
            Policy::Admin => Guard::RequireAdmin,
            Policy::NonAdmin => Guard::RequireNonAdmin,
        }
    }
}

impl core::fmt::Display for Guard {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The guard that stopped a request, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub guard: Guard,
    pub error: AuthError,
}

impl core::fmt::Display for Rejection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.guard, self.error)
    }
}

impl std::error::Error for Rejection {}

/// An ordered guard sequence declared by a route group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardChain {
    policies: Vec<Policy>,
}

impl GuardChain {
    /// `Authenticate` only.
    pub fn authenticated() -> Self {
        Self {
            policies: Vec::new(),
        }
    }

    /// `Authenticate` + `RequireApproved`.
    pub fn approved() -> Self {
        Self::authenticated().require_approved()
    }

    /// `Authenticate` + `RequireApproved` + `RequireAdmin`.
    pub fn admin() -> Self {
        Self::approved().require_admin()
    }

    pub fn require_approved(self) -> Self {
        self.require(Policy::Approved)
    }

    pub fn require_admin(self) -> Self {
        self.require(Policy::Admin)
    }

    pub fn require_non_admin(self) -> Self {
        self.require(Policy::NonAdmin)
    }

    fn require(mut self, policy: Policy) -> Self {
        if !self.policies.contains(&policy) {
            self.policies.push(policy);
        }
        self
    }

    /// The guards in evaluation order.
    pub fn guards(&self) -> Vec<Guard> {
        std::iter::once(Guard::Authenticate)
            .chain(self.policies.iter().copied().map(Guard::from))
            .collect()
    }

    /// Run the chain for one request.
    ///
    /// `authorization` is the raw `Authorization` header value, if any. On
    /// success the verified claim is returned for the handler to use.
    pub fn evaluate(
        &self,
        verifier: &dyn AccessTokenVerifier,
        authorization: Option<&str>,
    ) -> Result<AccessClaim, Rejection> {
        let claim = authenticate(verifier, authorization).map_err(|error| Rejection {
            guard: Guard::Authenticate,
            error,
        })?;

        for &policy in &self.policies {
            authorize(&claim, policy).map_err(|error| Rejection {
                guard: Guard::from(policy),
                error,
            })?;
        }

        Ok(claim)
    }
}

/// Extract the token from `Bearer <token>`.
///
/// The scheme is matched case-insensitively; any other shape (missing, other
/// scheme, zero or several space-separated fields, empty token) is rejected.
pub fn parse_bearer(header: &str) -> Result<&str, AuthError> {
    let mut fields = header.split(' ');
    match (fields.next(), fields.next(), fields.next()) {
        (Some(scheme), Some(token), None)
            if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() =>
        {
            Ok(token)
        }
        _ => Err(AuthError::MissingOrMalformedCredential),
    }
}

fn authenticate(
    verifier: &dyn AccessTokenVerifier,
    authorization: Option<&str>,
) -> Result<AccessClaim, AuthError> {
    let header = authorization.ok_or(AuthError::MissingOrMalformedCredential)?;
    let token = parse_bearer(header)?;
    verifier.verify_access_token(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::TokenId;
    use souq_core::{CityId, Role, UserId, UserState};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Accepts exactly one token string and counts how often it was consulted.
    struct StubVerifier {
        valid_token: &'static str,
        claim: AccessClaim,
        calls: AtomicUsize,
    }

    impl StubVerifier {
        fn new(role: Role, state: UserState) -> Self {
            Self {
                valid_token: "good-token",
                claim: AccessClaim {
                    token_id: TokenId::generate().unwrap(),
                    user_id: UserId::new(8),
                    role,
                    state,
                    city_id: CityId::new(1),
                    admin_access: None,
                    impersonator_id: None,
                },
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl AccessTokenVerifier for StubVerifier {
        fn verify_access_token(&self, token: &str) -> Result<AccessClaim, AuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if token == self.valid_token {
                Ok(self.claim.clone())
            } else {
                Err(AuthError::InvalidToken)
            }
        }
    }

    #[test]
    fn parse_bearer_accepts_any_scheme_case() {
        assert_eq!(parse_bearer("Bearer abc"), Ok("abc"));
        assert_eq!(parse_bearer("bearer abc"), Ok("abc"));
        assert_eq!(parse_bearer("BEARER abc"), Ok("abc"));
    }

    #[test]
    fn parse_bearer_rejects_other_shapes() {
        for header in [
            "",
            "Bearer",
            "Bearer ",
            "Basic xyz",
            "Bearer a b",
            "Bearer  abc",
            "abc",
            " Bearer abc",
        ] {
            assert_eq!(
                parse_bearer(header),
                Err(AuthError::MissingOrMalformedCredential),
                "header {header:?}"
            );
        }
    }

    #[test]
    fn malformed_header_never_reaches_verifier() {
        let verifier = StubVerifier::new(Role::Retailer, UserState::Approved);
        let chain = GuardChain::admin();

        for header in [None, Some("Bearer"), Some("Basic xyz")] {
            let rejection = chain.evaluate(&verifier, header).unwrap_err();
            assert_eq!(rejection.guard, Guard::Authenticate);
            assert_eq!(rejection.error, AuthError::MissingOrMalformedCredential);
        }
        assert_eq!(verifier.calls(), 0);
    }

    #[test]
    fn invalid_token_stops_at_authenticate() {
        // Would also fail RequireAdmin; the chain must stop before it.
        let verifier = StubVerifier::new(Role::Retailer, UserState::New);
        let rejection = GuardChain::admin()
            .evaluate(&verifier, Some("Bearer forged"))
            .unwrap_err();
        assert_eq!(
            rejection,
            Rejection {
                guard: Guard::Authenticate,
                error: AuthError::InvalidToken,
            }
        );
        assert_eq!(verifier.calls(), 1);
    }

    #[test]
    fn authenticated_chain_returns_claim() {
        let verifier = StubVerifier::new(Role::Retailer, UserState::New);
        let claim = GuardChain::authenticated()
            .evaluate(&verifier, Some("Bearer good-token"))
            .unwrap();
        assert_eq!(claim, verifier.claim);
    }

    #[test]
    fn unapproved_user_is_rejected_by_require_approved() {
        let verifier = StubVerifier::new(Role::Admin, UserState::InactiveShop);
        let rejection = GuardChain::admin()
            .evaluate(&verifier, Some("Bearer good-token"))
            .unwrap_err();
        assert_eq!(rejection.guard, Guard::RequireApproved);
        assert_eq!(rejection.error, AuthError::NotApproved);
    }

    #[test]
    fn role_gating() {
        let retailer = StubVerifier::new(Role::Retailer, UserState::Approved);
        let super_admin = StubVerifier::new(Role::SuperAdmin, UserState::Approved);
        let shop = GuardChain::approved().require_non_admin();
        let admin = GuardChain::admin();
        let header = Some("Bearer good-token");

        assert!(shop.evaluate(&retailer, header).is_ok());
        assert_eq!(
            admin.evaluate(&retailer, header).unwrap_err().guard,
            Guard::RequireAdmin
        );

        assert!(admin.evaluate(&super_admin, header).is_ok());
        let rejection = shop.evaluate(&super_admin, header).unwrap_err();
        assert_eq!(rejection.guard, Guard::RequireNonAdmin);
        assert_eq!(rejection.error, AuthError::Forbidden);
    }

    #[test]
    fn guards_are_ordered_and_deduplicated() {
        let chain = GuardChain::approved().require_approved().require_admin();
        assert_eq!(
            chain.guards(),
            vec![Guard::Authenticate, Guard::RequireApproved, Guard::RequireAdmin]
        );
    }

    #[test]
    fn policy_guards_commute() {
        let verifier = StubVerifier::new(Role::Wholesaler, UserState::Approved);
        let header = Some("Bearer good-token");
        let a = GuardChain::authenticated().require_approved().require_non_admin();
        let b = GuardChain::authenticated().require_non_admin().require_approved();
        assert_eq!(
            a.evaluate(&verifier, header).is_ok(),
            b.evaluate(&verifier, header).is_ok()
        );
    }
}
