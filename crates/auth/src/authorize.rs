//! Policy predicates over a verified access claim.
//!
//! - No IO
//! - No panics
//! - Each check reads only the immutable claim, so checks commute

use crate::claims::AccessClaim;
use crate::error::AuthError;

/// A single pass/fail policy check applied after authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Policy {
    /// The subject's account must be `Approved`.
    Approved,
    /// The subject must be `SuperAdmin` or `Admin`.
    Admin,
    /// The subject must be neither `SuperAdmin` nor `Admin`.
    NonAdmin,
}

/// Check one policy against a verified claim.
pub fn authorize(claim: &AccessClaim, policy: Policy) -> Result<(), AuthError> {
    match policy {
        Policy::Approved if !claim.is_approved() => Err(AuthError::NotApproved),
        Policy::Admin if !claim.is_admin() => Err(AuthError::Forbidden),
        Policy::NonAdmin if claim.is_admin() => Err(AuthError::Forbidden),
        _ => Ok(()),
    }
}
