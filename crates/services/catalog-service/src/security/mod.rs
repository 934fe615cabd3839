//! Security collaborators used by the login handler.
//!
//! The handlers only see these traits; token format and hashing scheme stay
//! behind them.

mod jwt;
mod password;

pub use jwt::{Claims, JwtIssuer};
pub use password::Argon2Verifier;

use common::AppResult;
use domain::User;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Issues bearer credentials for authenticated users.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait TokenIssuer: Send + Sync {
    /// Opaque bearer token for `user`.
    fn issue_token(&self, user: &User) -> AppResult<String>;

    /// Lifetime of issued tokens, in seconds.
    fn expires_in(&self) -> i64;
}

/// Checks a plaintext password against a stored hash.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait PasswordVerifier: Send + Sync {
    /// False for a wrong password and for a malformed hash alike.
    fn verify(&self, plain_text: &str, stored_hash: &str) -> bool;
}
