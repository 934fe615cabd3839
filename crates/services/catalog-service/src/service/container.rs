//! Service Container - Centralized handler access with parallel execution support.
//!
//! Handlers are built once from a [`Repositories`] bundle and the security
//! collaborators, then shared behind `Arc` by every caller.

use std::future::Future;
use std::sync::Arc;

use super::{
    AuthService, Authenticator, CityCatalog, CityService, OfferManager, OfferService,
    ProductManager, ProductService, SellerManager, SellerService,
};
use crate::repository::Repositories;
use crate::security::{PasswordVerifier, TokenIssuer};
use common::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn cities(&self) -> Arc<dyn CityService>;

    fn sellers(&self) -> Arc<dyn SellerService>;

    fn offers(&self) -> Arc<dyn OfferService>;

    fn products(&self) -> Arc<dyn ProductService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    city_service: Arc<dyn CityService>,
    seller_service: Arc<dyn SellerService>,
    offer_service: Arc<dyn OfferService>,
    product_service: Arc<dyn ProductService>,
}

impl Services {
    /// Wire every handler over one storage backend.
    pub fn new(
        repos: &Repositories,
        tokens: Arc<dyn TokenIssuer>,
        passwords: Arc<dyn PasswordVerifier>,
    ) -> Self {
        Self {
            auth_service: Arc::new(Authenticator::new(repos.users.clone(), tokens, passwords)),
            city_service: Arc::new(CityCatalog::new(
                repos.cities.clone(),
                repos.sellers.clone(),
                repos.offers.clone(),
            )),
            seller_service: Arc::new(SellerManager::new(
                repos.users.clone(),
                repos.sellers.clone(),
            )),
            offer_service: Arc::new(OfferManager::new(
                repos.users.clone(),
                repos.sellers.clone(),
                repos.offers.clone(),
                repos.cities.clone(),
            )),
            product_service: Arc::new(ProductManager::new(
                repos.sellers.clone(),
                repos.products.clone(),
            )),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn cities(&self) -> Arc<dyn CityService> {
        self.city_service.clone()
    }

    fn sellers(&self) -> Arc<dyn SellerService> {
        self.seller_service.clone()
    }

    fn offers(&self) -> Arc<dyn OfferService> {
        self.offer_service.clone()
    }

    fn products(&self) -> Arc<dyn ProductService> {
        self.product_service.clone()
    }
}

/// Parallel execution utilities for running independent operations concurrently.
pub mod parallel {
    use super::*;
    use tokio::try_join;

    /// Execute two independent async operations in parallel.
    ///
    /// If either operation fails, the error is returned immediately.
    pub async fn join2<F1, F2, T1, T2>(f1: F1, f2: F2) -> AppResult<(T1, T2)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
    {
        try_join!(f1, f2)
    }

    /// Execute operations in parallel with a concurrency limit.
    ///
    /// Results come back in completion order, not input order.
    pub async fn join_all_limited<F, T, I>(futures: I, limit: usize) -> AppResult<Vec<T>>
    where
        F: Future<Output = AppResult<T>>,
        I: IntoIterator<Item = F>,
    {
        use futures::stream::{self, StreamExt, TryStreamExt};

        stream::iter(futures)
            .map(Ok)
            .try_buffer_unordered(limit.max(1))
            .try_collect()
            .await
    }
}
