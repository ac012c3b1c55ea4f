//! Caller identity
//!
//! Sessions are issued by an external identity provider. This module only
//! verifies them and turns them into a [`Principal`]; it never creates one.

pub mod middleware;
pub mod models;
pub mod resolver;

pub use middleware::principal_middleware;
pub use models::{MaybePrincipal, SessionClaims};
pub use resolver::{PrincipalResolver, SessionTokenResolver};

use vidvault_core::models::Principal;
use vidvault_core::AppError;

/// Turn an absent principal into an authentication error.
pub fn require_session(principal: Option<Principal>) -> Result<Principal, AppError> {
    principal.ok_or_else(|| AppError::Unauthenticated("Unauthorized".to_string()))
}
