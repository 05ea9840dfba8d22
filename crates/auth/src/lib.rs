//! `souq-auth` — token lifecycle and authorization guards.
//!
//! This crate is intentionally decoupled from HTTP and storage: it mints and
//! verifies encrypted tokens and evaluates guard chains over plain strings.

pub mod authorize;
pub mod claims;
pub mod clock;
pub mod codec;
pub mod error;
pub mod guard;
pub mod issuer;
pub mod key;
pub mod permissions;
pub mod settings;
pub mod verifier;

pub use authorize::{Policy, authorize};
pub use claims::{AccessClaim, Claim, ClaimType, RefreshClaim, TokenId};
pub use clock::{Clock, FixedClock, SystemClock};
pub use codec::{DecodeFailure, Decoded, TimeWindow, TokenCodec};
pub use error::{AuthError, AuthResult};
pub use guard::{Guard, GuardChain, Rejection, parse_bearer};
pub use issuer::{IssuedToken, TokenIssuer, TokenPair};
pub use key::KeyMaterial;
pub use permissions::{AdminAccess, Permission};
pub use settings::{TokenSettings, parse_duration};
pub use verifier::{AccessTokenVerifier, TokenVerifier};
