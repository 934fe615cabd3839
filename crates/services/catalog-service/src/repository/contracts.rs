//! Repository contracts.
//!
//! Every storage backend implements these traits with the same observable
//! behaviour:
//!
//! - `get_by_id` returns `Ok(None)` when nothing is stored under the id.
//! - `add` fails with `AppError::Conflict` when the id (or another unique
//!   key: user email, seller owner) is already taken.
//! - `update` is an upsert: an absent id is inserted. There is no version
//!   check, concurrent writers of the same id race and the last one wins.
//! - Listings come back in a fixed order (see the `sort_*` helpers), so
//!   backends can be compared result for result.
//! - Cancellation is by drop: the handlers run every repository future under
//!   [`crate::service::cancellable`], which drops it when the token fires. A
//!   dropped write returns nothing and may or may not have been applied; a
//!   dropped relational transaction rolls back.

use async_trait::async_trait;
use uuid::Uuid;

use common::AppResult;
use domain::{City, Offer, Product, Seller, User};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Emails are unique; at most one user matches.
    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn add(&self, user: &User) -> AppResult<()>;

    async fn update(&self, user: &User) -> AppResult<()>;
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SellerRepository: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Seller>>;

    /// A user owns at most one seller profile.
    async fn get_by_user_id(&self, user_id: Uuid) -> AppResult<Option<Seller>>;

    async fn add(&self, seller: &Seller) -> AppResult<()>;

    async fn update(&self, seller: &Seller) -> AppResult<()>;

    /// All sellers, ordered by store name then id.
    async fn list(&self) -> AppResult<Vec<Seller>>;
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OfferRepository: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Offer>>;

    /// Offers of one seller, ordered by start date then id. Empty is not an error.
    async fn get_by_seller_id(&self, seller_id: Uuid) -> AppResult<Vec<Offer>>;

    /// Persists the offer together with its full status history.
    async fn add(&self, offer: &Offer) -> AppResult<()>;

    /// Upsert, last write wins. History is stored exactly as the offer holds it.
    async fn update(&self, offer: &Offer) -> AppResult<()>;

    /// Full scan for city/category aggregation, ordered by start date then id.
    async fn list(&self) -> AppResult<Vec<Offer>>;
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Product>>;

    /// Products of one seller, ordered by name then id.
    async fn get_by_seller_id(&self, seller_id: Uuid) -> AppResult<Vec<Product>>;

    async fn add(&self, product: &Product) -> AppResult<()>;

    async fn update(&self, product: &Product) -> AppResult<()>;
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CityRepository: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<City>>;

    async fn add(&self, city: &City) -> AppResult<()>;

    async fn update(&self, city: &City) -> AppResult<()>;

    /// All cities, ordered by English name then id.
    async fn list(&self) -> AppResult<Vec<City>>;
}

// =============================================================================
// Listing order shared by every backend
// =============================================================================

pub fn sort_offers(offers: &mut [Offer]) {
    offers.sort_by(|a, b| {
        a.start_date()
            .cmp(&b.start_date())
            .then_with(|| a.id().cmp(&b.id()))
    });
}

pub fn sort_products(products: &mut [Product]) {
    products.sort_by(|a, b| a.name().cmp(b.name()).then_with(|| a.id().cmp(&b.id())));
}

pub fn sort_sellers(sellers: &mut [Seller]) {
    sellers.sort_by(|a, b| {
        a.store_name()
            .cmp(b.store_name())
            .then_with(|| a.id().cmp(&b.id()))
    });
}

pub fn sort_cities(cities: &mut [City]) {
    cities.sort_by(|a, b| a.name_en().cmp(b.name_en()).then_with(|| a.id().cmp(&b.id())));
}
