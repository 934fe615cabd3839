//! User domain entity and related types.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use uuid::Uuid;

use crate::constants::{ROLE_ADMIN, ROLE_CUSTOMER, ROLE_SELLER};
use crate::error::{require_text, DomainError, DomainResult};

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Customer,
    Seller,
    Admin,
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Customer => ROLE_CUSTOMER,
            UserRole::Seller => ROLE_SELLER,
            UserRole::Admin => ROLE_ADMIN,
        }
    }
}

impl FromStr for UserRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_CUSTOMER => Ok(UserRole::Customer),
            ROLE_SELLER => Ok(UserRole::Seller),
            ROLE_ADMIN => Ok(UserRole::Admin),
            other => Err(DomainError::validation(format!("Unknown role: {}", other))),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: Uuid,
    email: String,
    password_hash: String,
    role: UserRole,
    is_active: bool,
}

impl User {
    /// Create an active user, generating an id when none is given.
    pub fn create(
        id: Option<Uuid>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        role: UserRole,
    ) -> DomainResult<Self> {
        Self::restore(
            id.unwrap_or_else(Uuid::new_v4),
            email,
            password_hash,
            role,
            true,
        )
    }

    /// Rebuild a user from stored state, re-checking its invariants.
    pub fn restore(
        id: Uuid,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        role: UserRole,
        is_active: bool,
    ) -> DomainResult<Self> {
        let email = email.into();
        let password_hash = password_hash.into();
        require_text("email", &email)?;
        require_text("password hash", &password_hash)?;

        Ok(Self {
            id,
            email,
            password_hash,
            role,
            is_active,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn role(&self) -> UserRole {
        self.role
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Check if user has admin role
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Replace the stored password hash.
    pub fn change_password(&mut self, password_hash: impl Into<String>) -> DomainResult<()> {
        let password_hash = password_hash.into();
        require_text("password hash", &password_hash)?;
        self.password_hash = password_hash;
        Ok(())
    }
}

/// User view (safe to return to callers, no hash)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}
