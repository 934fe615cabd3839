//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Entities are only mutated through their own operations; storage backends
//! rebuild them with the `restore` constructors, which re-check invariants.

pub mod address;
pub mod city;
pub mod constants;
pub mod error;
pub mod money;
pub mod offer;
pub mod password;
pub mod product;
pub mod seller;
pub mod time;
pub mod user;

pub use address::Address;
pub use city::City;
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use money::Money;
pub use offer::{Offer, OfferParts, OfferStatus, StatusChange};
pub use password::Password;
pub use product::{Product, ProductParts};
pub use seller::{Seller, SellerParts, SellerStatus};
pub use user::{User, UserResponse, UserRole};
