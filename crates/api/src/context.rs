use souq_auth::{AccessClaim, AdminAccess, TokenId};
use souq_core::{CityId, Role, UserId, UserState};

/// Authenticated request context (the verified access claim).
///
/// Inserted by the guard middleware; handlers behind a guard chain can rely
/// on it being present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    claim: AccessClaim,
}

impl AuthContext {
    pub fn new(claim: AccessClaim) -> Self {
        Self { claim }
    }

    pub fn claim(&self) -> &AccessClaim {
        &self.claim
    }

    pub fn token_id(&self) -> TokenId {
        self.claim.token_id
    }

    pub fn user_id(&self) -> UserId {
        self.claim.user_id
    }

    pub fn role(&self) -> Role {
        self.claim.role
    }

    pub fn state(&self) -> UserState {
        self.claim.state
    }

    pub fn city_id(&self) -> CityId {
        self.claim.city_id
    }

    pub fn admin_access(&self) -> Option<&AdminAccess> {
        self.claim.admin_access.as_ref()
    }

    /// The administrator acting on behalf of this user, if impersonated.
    pub fn impersonator_id(&self) -> Option<UserId> {
        self.claim.impersonator_id
    }
}
