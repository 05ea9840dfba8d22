use core::str::FromStr;

use rand::{RngCore, rngs::OsRng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use souq_core::{CityId, Role, User, UserId, UserState};

use crate::error::{AuthError, AuthResult};
use crate::permissions::AdminAccess;

// ─────────────────────────────────────────────────────────────────────────────
// Token ID
// ─────────────────────────────────────────────────────────────────────────────

/// Random 128-bit identifier, unique per issued token.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(Uuid);

impl TokenId {
    /// Draw a fresh identifier from the OS CSPRNG.
    ///
    /// Fails (instead of panicking) when the entropy source is unavailable.
    pub fn generate() -> AuthResult<Self> {
        let mut bytes = [0u8; 16];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| AuthError::creation(format!("token id generation failed: {e}")))?;
        Ok(Self(uuid::Builder::from_random_bytes(bytes).into_uuid()))
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl core::fmt::Display for TokenId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for TokenId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Claims
// ─────────────────────────────────────────────────────────────────────────────

/// The claim-type tag carried in every token payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimType {
    Access,
    Refresh,
}

impl ClaimType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimType::Access => "access",
            ClaimType::Refresh => "refresh",
        }
    }
}

impl core::fmt::Display for ClaimType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity snapshot bound into an access (or impersonation) token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaim {
    pub token_id: TokenId,
    pub user_id: UserId,
    pub role: Role,
    pub state: UserState,
    pub city_id: CityId,

    /// Present only for admin subjects, never on impersonation tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_access: Option<AdminAccess>,

    /// Present only when minted through the impersonation path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impersonator_id: Option<UserId>,
}

impl AccessClaim {
    pub(crate) fn for_user(token_id: TokenId, user: &User) -> Self {
        Self {
            token_id,
            user_id: user.id,
            role: user.role,
            state: user.state,
            city_id: user.city_id,
            admin_access: None,
            impersonator_id: None,
        }
    }

    pub fn claim_type(&self) -> ClaimType {
        ClaimType::Access
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn is_approved(&self) -> bool {
        self.state == UserState::Approved
    }

    pub fn is_impersonated(&self) -> bool {
        self.impersonator_id.is_some()
    }
}

/// Minimal long-lived identity; authorizes token renewal only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaim {
    pub token_id: TokenId,
    pub user_id: UserId,
    pub role: Role,
}

impl RefreshClaim {
    pub fn claim_type(&self) -> ClaimType {
        ClaimType::Refresh
    }
}

/// Any claim a token can carry, discriminated by its `token_type` tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "token_type", rename_all = "snake_case")]
pub enum Claim {
    Access(AccessClaim),
    Refresh(RefreshClaim),
}

impl Claim {
    pub fn claim_type(&self) -> ClaimType {
        match self {
            Claim::Access(_) => ClaimType::Access,
            Claim::Refresh(_) => ClaimType::Refresh,
        }
    }

    pub fn token_id(&self) -> TokenId {
        match self {
            Claim::Access(c) => c.token_id,
            Claim::Refresh(c) => c.token_id,
        }
    }
}

impl From<AccessClaim> for Claim {
    fn from(value: AccessClaim) -> Self {
        Claim::Access(value)
    }
}

impl From<RefreshClaim> for Claim {
    fn from(value: RefreshClaim) -> Self {
        Claim::Refresh(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_access() -> AccessClaim {
        AccessClaim {
            token_id: TokenId::generate().unwrap(),
            user_id: UserId::new(11),
            role: Role::Retailer,
            state: UserState::Approved,
            city_id: CityId::new(3),
            admin_access: None,
            impersonator_id: None,
        }
    }

    #[test]
    fn generated_ids_are_v4_and_distinct() {
        let a = TokenId::generate().unwrap();
        let b = TokenId::generate().unwrap();
        assert_ne!(a, b);
        assert_eq!(a.as_uuid().get_version_num(), 4);
    }

    #[test]
    fn access_claim_is_tagged_access() {
        let value = serde_json::to_value(Claim::from(sample_access())).unwrap();
        assert_eq!(value["token_type"], "access");
        assert_eq!(value["role"], "retailer");
        assert_eq!(value["state"], "approved");
        assert!(value.get("admin_access").is_none());
        assert!(value.get("impersonator_id").is_none());
    }

    #[test]
    fn refresh_claim_carries_no_access_fields() {
        let claim = Claim::Refresh(RefreshClaim {
            token_id: TokenId::generate().unwrap(),
            user_id: UserId::new(11),
            role: Role::Wholesaler,
        });
        let value = serde_json::to_value(&claim).unwrap();
        assert_eq!(value["token_type"], "refresh");
        for field in ["state", "city_id", "admin_access", "impersonator_id"] {
            assert!(value.get(field).is_none(), "unexpected field {field}");
        }
    }

    #[test]
    fn tag_selects_variant() {
        let claim: Claim = serde_json::from_value(json!({
            "token_type": "refresh",
            "token_id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "user_id": 5,
            "role": "admin",
        }))
        .unwrap();
        assert_eq!(claim.claim_type(), ClaimType::Refresh);
    }

    #[test]
    fn unknown_tag_or_role_does_not_decode() {
        let unknown_tag = json!({
            "token_type": "session",
            "token_id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "user_id": 5,
            "role": "admin",
        });
        assert!(serde_json::from_value::<Claim>(unknown_tag).is_err());

        let unknown_role = json!({
            "token_type": "refresh",
            "token_id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "user_id": 5,
            "role": "root",
        });
        assert!(serde_json::from_value::<Claim>(unknown_role).is_err());
    }

    #[test]
    fn helper_predicates() {
        let mut claim = sample_access();
        assert!(claim.is_approved());
        assert!(!claim.is_admin());
        assert!(!claim.is_impersonated());

        claim.impersonator_id = Some(UserId::new(1));
        assert!(claim.is_impersonated());
    }
}
