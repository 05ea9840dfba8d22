//! User snapshot consumed by token issuance.
//!
//! The storage layer owns users; this module only models the subset of a user
//! record that is bound into tokens.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::{CityId, DomainError, UserId};

// ─────────────────────────────────────────────────────────────────────────────
// Role
// ─────────────────────────────────────────────────────────────────────────────

/// Marketplace role. The set is closed: a role outside these four values
/// cannot be constructed or deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    Wholesaler,
    Retailer,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::SuperAdmin, Role::Admin, Role::Wholesaler, Role::Retailer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Admin => "admin",
            Role::Wholesaler => "wholesaler",
            Role::Retailer => "retailer",
        }
    }

    /// `SuperAdmin` and `Admin` operate the marketplace; everyone else trades on it.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::SuperAdmin | Role::Admin)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown role '{s}'")))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// User State
// ─────────────────────────────────────────────────────────────────────────────

/// Approval state of a user account.
///
/// Only `Approved` users may reach state-gated route groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserState {
    #[default]
    New,
    Rejected,
    InactiveAccount,
    InactiveShop,
    Approved,
}

impl UserState {
    pub const ALL: [UserState; 5] = [
        UserState::New,
        UserState::Rejected,
        UserState::InactiveAccount,
        UserState::InactiveShop,
        UserState::Approved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserState::New => "new",
            UserState::Rejected => "rejected",
            UserState::InactiveAccount => "inactive_account",
            UserState::InactiveShop => "inactive_shop",
            UserState::Approved => "approved",
        }
    }
}

impl core::fmt::Display for UserState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserState::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown user state '{s}'")))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// User
// ─────────────────────────────────────────────────────────────────────────────

/// An already-authenticated user record, as handed to the token issuer by the
/// login/refresh/impersonation flows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub role: Role,
    pub state: UserState,
    pub city_id: CityId,
}

impl User {
    pub fn new(id: UserId, role: Role, state: UserState, city_id: CityId) -> Self {
        Self {
            id,
            role,
            state,
            city_id,
        }
    }
}
