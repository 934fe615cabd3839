//! Seller aggregate and its approval workflow.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use uuid::Uuid;

use crate::address::Address;
use crate::constants::{SELLER_STATUS_APPROVED, SELLER_STATUS_PENDING, SELLER_STATUS_REJECTED};
use crate::error::{require_text, DomainError, DomainResult};

/// Approval status of a seller profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SellerStatus {
    Pending,
    Approved,
    Rejected,
}

impl SellerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SellerStatus::Pending => SELLER_STATUS_PENDING,
            SellerStatus::Approved => SELLER_STATUS_APPROVED,
            SellerStatus::Rejected => SELLER_STATUS_REJECTED,
        }
    }
}

impl FromStr for SellerStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            SELLER_STATUS_PENDING => Ok(SellerStatus::Pending),
            SELLER_STATUS_APPROVED => Ok(SellerStatus::Approved),
            SELLER_STATUS_REJECTED => Ok(SellerStatus::Rejected),
            other => Err(DomainError::validation(format!(
                "Unknown seller status: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for SellerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Seller profile owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Seller {
    id: Uuid,
    user_id: Uuid,
    store_name: String,
    address: Address,
    description: String,
    status: SellerStatus,
    rejection_reason: Option<String>,
}

/// Stored state of a seller, used by storage backends to rebuild one.
#[derive(Debug, Clone)]
pub struct SellerParts {
    pub id: Uuid,
    pub user_id: Uuid,
    pub store_name: String,
    pub address: Address,
    pub description: String,
    pub status: SellerStatus,
    pub rejection_reason: Option<String>,
}

impl Seller {
    /// Register a new seller profile, awaiting approval.
    pub fn create(
        user_id: Uuid,
        store_name: impl Into<String>,
        address: Address,
        description: impl Into<String>,
    ) -> DomainResult<Self> {
        Self::restore(SellerParts {
            id: Uuid::new_v4(),
            user_id,
            store_name: store_name.into(),
            address,
            description: description.into(),
            status: SellerStatus::Pending,
            rejection_reason: None,
        })
    }

    /// Rebuild a seller from stored state.
    pub fn restore(parts: SellerParts) -> DomainResult<Self> {
        require_text("store name", &parts.store_name)?;
        Ok(Self {
            id: parts.id,
            user_id: parts.user_id,
            store_name: parts.store_name,
            address: parts.address,
            description: parts.description,
            status: parts.status,
            rejection_reason: parts.rejection_reason,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn store_name(&self) -> &str {
        &self.store_name
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> SellerStatus {
        self.status
    }

    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason.as_deref()
    }

    pub fn is_approved(&self) -> bool {
        self.status == SellerStatus::Approved
    }

    /// Approve the seller. Allowed from any status; clears any rejection reason.
    pub fn approve(&mut self) {
        self.status = SellerStatus::Approved;
        self.rejection_reason = None;
    }

    /// Reject the seller with a mandatory reason.
    pub fn reject(&mut self, reason: impl Into<String>) -> DomainResult<()> {
        let reason = reason.into();
        require_text("rejection reason", &reason)?;
        self.status = SellerStatus::Rejected;
        self.rejection_reason = Some(reason);
        Ok(())
    }
}
