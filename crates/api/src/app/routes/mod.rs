use serde_json::{Value, json};

use crate::context::AuthContext;

pub mod account;
pub mod admin;
pub mod shop;
pub mod system;

/// Identity fields shared by the whoami-style handlers.
fn identity(ctx: &AuthContext) -> Value {
    json!({
        "token_id": ctx.token_id().to_string(),
        "user_id": ctx.user_id(),
        "role": ctx.role(),
        "state": ctx.state(),
        "city_id": ctx.city_id(),
        "impersonator_id": ctx.impersonator_id(),
    })
}
