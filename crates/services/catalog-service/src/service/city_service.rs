//! City catalog - which cities currently have something to offer.
//!
//! Offers reach a city through their seller's address, so every query here
//! goes offer -> seller -> address city -> city entity.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::cancel::cancellable;
use super::container::parallel;
use super::requests::{validate_request, CityQuery};
use crate::repository::{CityRepository, OfferRepository, SellerRepository};
use common::AppResult;
use domain::{time, City, Offer, Seller};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Concurrent seller lookups issued by one query.
const SELLER_LOOKUP_CONCURRENCY: usize = 16;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CityService: Send + Sync {
    /// Cities, optionally narrowed to those with active offers and/or sellers
    /// located in a given country.
    async fn list_cities(&self, query: CityQuery, cancel: &CancellationToken)
        -> AppResult<Vec<City>>;
}

pub struct CityCatalog {
    cities: Arc<dyn CityRepository>,
    sellers: Arc<dyn SellerRepository>,
    offers: Arc<dyn OfferRepository>,
}

impl CityCatalog {
    pub fn new(
        cities: Arc<dyn CityRepository>,
        sellers: Arc<dyn SellerRepository>,
        offers: Arc<dyn OfferRepository>,
    ) -> Self {
        Self {
            cities,
            sellers,
            offers,
        }
    }

    async fn candidate_sellers(&self, with_active_offers: bool) -> AppResult<Vec<Seller>> {
        if !with_active_offers {
            return self.sellers.list().await;
        }
        let offers = active_offers(self.offers.list().await?);
        load_sellers(self.sellers.as_ref(), &offers).await
    }

    async fn list(&self, query: CityQuery) -> AppResult<Vec<City>> {
        let country = query
            .country
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());

        if !query.with_active_offers && country.is_none() {
            return self.cities.list().await;
        }

        let (cities, sellers) = parallel::join2(
            self.cities.list(),
            self.candidate_sellers(query.with_active_offers),
        )
        .await?;

        let located: Vec<&Seller> = sellers
            .iter()
            .filter(|s| country.map_or(true, |c| same_text(s.address().country(), c)))
            .collect();

        Ok(cities
            .into_iter()
            .filter(|city| located.iter().any(|s| city.matches_name(s.address().city())))
            .collect())
    }
}

#[async_trait]
impl CityService for CityCatalog {
    async fn list_cities(
        &self,
        query: CityQuery,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<City>> {
        validate_request(&query)?;
        tracing::debug!(
            with_active_offers = query.with_active_offers,
            country = ?query.country,
            "Listing cities"
        );
        cancellable(cancel, self.list(query)).await
    }
}

/// Offers active right now.
pub(super) fn active_offers(offers: Vec<Offer>) -> Vec<Offer> {
    let now = time::now();
    offers.into_iter().filter(|o| o.is_active_at(now)).collect()
}

/// Distinct sellers of `offers`. Offers whose seller no longer exists are
/// ignored.
pub(super) async fn load_sellers(
    sellers: &dyn SellerRepository,
    offers: &[Offer],
) -> AppResult<Vec<Seller>> {
    let ids: BTreeSet<Uuid> = offers.iter().map(Offer::seller_id).collect();
    let found = parallel::join_all_limited(
        ids.into_iter().map(|id| sellers.get_by_id(id)),
        SELLER_LOOKUP_CONCURRENCY,
    )
    .boxed()
    .await?;
    Ok(found.into_iter().flatten().collect())
}

pub(super) fn same_text(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}
