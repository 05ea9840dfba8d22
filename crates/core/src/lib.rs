//! `souq-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the token subsystem
//! and the HTTP layer (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod user;

pub use error::DomainError;
pub use id::{CityId, UserId};
pub use user::{Role, User, UserState};
