//! Use-case handlers.
//!
//! Each handler loads entities through the repository contracts, applies
//! domain operations and persists the result. Domain errors are propagated
//! as raised; every call can be abandoned through a `CancellationToken`.

mod auth_service;
mod cancel;
mod city_service;
pub mod container;
mod offer_service;
mod product_service;
pub mod requests;
mod seller_service;

use uuid::Uuid;

use crate::repository::UserRepository;
use common::{AppError, AppResult};
use domain::User;

pub use auth_service::{AuthService, Authenticator};
pub use cancel::cancellable;
pub use city_service::{CityCatalog, CityService};
pub use container::{ServiceContainer, Services};
pub use offer_service::{OfferManager, OfferService};
pub use product_service::{ProductManager, ProductService};
pub use requests::*;
pub use seller_service::{SellerManager, SellerService};

#[cfg(any(test, feature = "test-utils"))]
pub use auth_service::MockAuthService;
#[cfg(any(test, feature = "test-utils"))]
pub use city_service::MockCityService;
#[cfg(any(test, feature = "test-utils"))]
pub use offer_service::MockOfferService;
#[cfg(any(test, feature = "test-utils"))]
pub use product_service::MockProductService;
#[cfg(any(test, feature = "test-utils"))]
pub use seller_service::MockSellerService;

/// Load the acting moderator and check they are an active administrator.
async fn require_admin(users: &dyn UserRepository, moderator_id: Uuid) -> AppResult<User> {
    match users.get_by_id(moderator_id).await? {
        Some(user) if user.is_admin() && user.is_active() => Ok(user),
        _ => Err(AppError::forbidden("moderation requires an administrator")),
    }
}
