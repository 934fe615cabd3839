//! Repository layer for data access.
//!
//! One set of contracts, three interchangeable backends: in-memory, relational
//! (PostgreSQL through SeaORM) and document (MongoDB).

mod contracts;
pub mod document;
pub mod entities;
mod memory;
pub mod relational;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

pub use contracts::{
    sort_cities, sort_offers, sort_products, sort_sellers, CityRepository, OfferRepository,
    ProductRepository, SellerRepository, UserRepository,
};
pub use memory::MemoryStore;

#[cfg(any(test, feature = "test-utils"))]
pub use contracts::{
    MockCityRepository, MockOfferRepository, MockProductRepository, MockSellerRepository,
    MockUserRepository,
};

/// Every repository the handlers need, backed by one storage backend.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub sellers: Arc<dyn SellerRepository>,
    pub offers: Arc<dyn OfferRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub cities: Arc<dyn CityRepository>,
}

impl Repositories {
    /// Fresh, empty in-memory storage.
    pub fn in_memory() -> Self {
        Self::from_memory(Arc::new(MemoryStore::new()))
    }

    /// Share an existing in-memory store, e.g. to inspect it from a test.
    pub fn from_memory(store: Arc<MemoryStore>) -> Self {
        Self {
            users: store.clone(),
            sellers: store.clone(),
            offers: store.clone(),
            products: store.clone(),
            cities: store,
        }
    }

    /// PostgreSQL-backed repositories over one connection pool.
    pub fn relational(db: DatabaseConnection) -> Self {
        use relational::{CityStore, OfferStore, ProductStore, SellerStore, UserStore};

        Self {
            users: Arc::new(UserStore::new(db.clone())),
            sellers: Arc::new(SellerStore::new(db.clone())),
            offers: Arc::new(OfferStore::new(db.clone())),
            products: Arc::new(ProductStore::new(db.clone())),
            cities: Arc::new(CityStore::new(db)),
        }
    }

    /// MongoDB-backed repositories over one database handle.
    pub fn document(db: mongodb::Database) -> Self {
        use document::{
            CityCollection, OfferCollection, ProductCollection, SellerCollection, UserCollection,
        };

        Self {
            users: Arc::new(UserCollection::new(&db)),
            sellers: Arc::new(SellerCollection::new(&db)),
            offers: Arc::new(OfferCollection::new(&db)),
            products: Arc::new(ProductCollection::new(&db)),
            cities: Arc::new(CityCollection::new(&db)),
        }
    }
}
