//! Offer service - Draft editing, moderation and browsing.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::cancel::cancellable;
use super::city_service::{active_offers, load_sellers, same_text};
use super::container::parallel;
use super::require_admin;
use super::requests::{
    validate_request, ChangeOfferPriceRequest, CreateOfferRequest, OfferSearch,
    UpdateOfferDetailsRequest,
};
use crate::repository::{CityRepository, OfferRepository, SellerRepository, UserRepository};
use common::{AppError, AppResult, OptionExt};
use domain::{City, Money, Offer, Seller};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OfferService: Send + Sync {
    /// Create a DRAFT offer. The seller must exist and be approved.
    async fn create_offer(
        &self,
        request: CreateOfferRequest,
        cancel: &CancellationToken,
    ) -> AppResult<Offer>;

    async fn update_offer_details(
        &self,
        offer_id: Uuid,
        request: UpdateOfferDetailsRequest,
        cancel: &CancellationToken,
    ) -> AppResult<Offer>;

    async fn change_offer_price(
        &self,
        offer_id: Uuid,
        request: ChangeOfferPriceRequest,
        cancel: &CancellationToken,
    ) -> AppResult<Offer>;

    /// DRAFT -> PENDING_VALIDATION
    async fn submit_offer(&self, offer_id: Uuid, cancel: &CancellationToken) -> AppResult<Offer>;

    /// PENDING_VALIDATION -> PUBLISHED. Requires an administrator.
    async fn validate_offer(
        &self,
        moderator_id: Uuid,
        offer_id: Uuid,
        cancel: &CancellationToken,
    ) -> AppResult<Offer>;

    /// PENDING_VALIDATION -> REJECTED. Requires an administrator.
    async fn reject_offer(
        &self,
        moderator_id: Uuid,
        offer_id: Uuid,
        reason: String,
        cancel: &CancellationToken,
    ) -> AppResult<Offer>;

    async fn get_offer(&self, offer_id: Uuid, cancel: &CancellationToken) -> AppResult<Offer>;

    /// Every offer of a seller whatever its status. Unknown sellers yield
    /// an empty list.
    async fn get_seller_offers(
        &self,
        seller_id: Uuid,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<Offer>>;

    /// Active offers, optionally narrowed by city name and category.
    async fn search_offers(
        &self,
        search: OfferSearch,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<Offer>>;
}

pub struct OfferManager {
    users: Arc<dyn UserRepository>,
    sellers: Arc<dyn SellerRepository>,
    offers: Arc<dyn OfferRepository>,
    cities: Arc<dyn CityRepository>,
}

impl OfferManager {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sellers: Arc<dyn SellerRepository>,
        offers: Arc<dyn OfferRepository>,
        cities: Arc<dyn CityRepository>,
    ) -> Self {
        Self {
            users,
            sellers,
            offers,
            cities,
        }
    }

    async fn load(&self, offer_id: Uuid) -> AppResult<Offer> {
        self.offers
            .get_by_id(offer_id)
            .await?
            .ok_or_not_found("Offer")
    }

    /// Load, apply `change`, persist.
    async fn modify<F>(&self, offer_id: Uuid, change: F) -> AppResult<Offer>
    where
        F: FnOnce(&mut Offer) -> AppResult<()> + Send,
    {
        let mut offer = self.load(offer_id).await?;
        change(&mut offer)?;
        self.offers.update(&offer).await?;
        Ok(offer)
    }

    async fn create(&self, request: CreateOfferRequest) -> AppResult<Offer> {
        let seller = self
            .sellers
            .get_by_id(request.seller_id)
            .await?
            .ok_or_not_found("Seller")?;
        if !seller.is_approved() {
            return Err(AppError::forbidden("seller is not approved"));
        }

        let price = Money::new(request.price, request.currency.as_str())?;
        let original_price = Money::new(request.original_price, request.currency.as_str())?;
        let mut offer = Offer::create(
            seller.id(),
            request.title,
            request.description,
            price,
            original_price,
            request.expiration_date,
        )?;

        if request.start_date.is_some() || request.end_date.is_some() {
            let start = request.start_date.unwrap_or_else(|| offer.start_date());
            offer.schedule(start, request.end_date)?;
        }
        offer.set_category(request.category)?;
        offer.set_picture_url(request.picture_url)?;

        self.offers.add(&offer).await?;
        tracing::info!(offer_id = %offer.id(), seller_id = %seller.id(), "Offer created");
        Ok(offer)
    }

    async fn search(&self, search: OfferSearch) -> AppResult<Vec<Offer>> {
        let category = search.category.as_deref().map(str::trim).filter(|c| !c.is_empty());
        let city = search.city.as_deref().map(str::trim).filter(|c| !c.is_empty());

        let offers: Vec<Offer> = active_offers(self.offers.list().await?)
            .into_iter()
            .filter(|o| {
                category.map_or(true, |wanted| o.category().is_some_and(|c| same_text(c, wanted)))
            })
            .collect();

        let Some(city) = city else {
            return Ok(offers);
        };

        let (cities, sellers) = parallel::join2(
            self.cities.list(),
            load_sellers(self.sellers.as_ref(), &offers),
        )
        .await?;
        let named: Vec<&City> = cities.iter().filter(|c| c.matches_name(city)).collect();
        let located = |seller: &Seller| {
            let seller_city = seller.address().city();
            same_text(seller_city, city) || named.iter().any(|c| c.matches_name(seller_city))
        };
        let in_city: Vec<Uuid> = sellers
            .iter()
            .filter(|s| located(*s))
            .map(Seller::id)
            .collect();

        Ok(offers
            .into_iter()
            .filter(|o| in_city.contains(&o.seller_id()))
            .collect())
    }
}

#[async_trait]
impl OfferService for OfferManager {
    async fn create_offer(
        &self,
        request: CreateOfferRequest,
        cancel: &CancellationToken,
    ) -> AppResult<Offer> {
        validate_request(&request)?;
        cancellable(cancel, self.create(request)).await
    }

    async fn update_offer_details(
        &self,
        offer_id: Uuid,
        request: UpdateOfferDetailsRequest,
        cancel: &CancellationToken,
    ) -> AppResult<Offer> {
        validate_request(&request)?;
        let UpdateOfferDetailsRequest { title, description } = request;
        cancellable(
            cancel,
            self.modify(offer_id, move |offer| {
                Ok(offer.update_details(title, description)?)
            }),
        )
        .await
    }

    async fn change_offer_price(
        &self,
        offer_id: Uuid,
        request: ChangeOfferPriceRequest,
        cancel: &CancellationToken,
    ) -> AppResult<Offer> {
        validate_request(&request)?;
        let price = Money::new(request.price, request.currency.as_str())?;
        let original_price = Money::new(request.original_price, request.currency.as_str())?;
        cancellable(
            cancel,
            self.modify(offer_id, move |offer| {
                Ok(offer.change_price(price, original_price)?)
            }),
        )
        .await
    }

    async fn submit_offer(&self, offer_id: Uuid, cancel: &CancellationToken) -> AppResult<Offer> {
        let offer = cancellable(
            cancel,
            self.modify(offer_id, |offer| Ok(offer.submit_for_validation()?)),
        )
        .await?;
        tracing::info!(%offer_id, "Offer submitted for validation");
        Ok(offer)
    }

    async fn validate_offer(
        &self,
        moderator_id: Uuid,
        offer_id: Uuid,
        cancel: &CancellationToken,
    ) -> AppResult<Offer> {
        let offer = cancellable(cancel, async move {
            require_admin(self.users.as_ref(), moderator_id).await?;
            self.modify(offer_id, |offer| Ok(offer.validate(moderator_id)?))
                .await
        })
        .await?;
        tracing::info!(%offer_id, %moderator_id, "Offer published");
        Ok(offer)
    }

    async fn reject_offer(
        &self,
        moderator_id: Uuid,
        offer_id: Uuid,
        reason: String,
        cancel: &CancellationToken,
    ) -> AppResult<Offer> {
        let offer = cancellable(cancel, async move {
            require_admin(self.users.as_ref(), moderator_id).await?;
            self.modify(offer_id, |offer| {
                Ok(offer.reject_offer(moderator_id, reason)?)
            })
            .await
        })
        .await?;
        tracing::info!(%offer_id, %moderator_id, "Offer rejected");
        Ok(offer)
    }

    async fn get_offer(&self, offer_id: Uuid, cancel: &CancellationToken) -> AppResult<Offer> {
        cancellable(cancel, self.load(offer_id)).await
    }

    async fn get_seller_offers(
        &self,
        seller_id: Uuid,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<Offer>> {
        cancellable(cancel, self.offers.get_by_seller_id(seller_id)).await
    }

    async fn search_offers(
        &self,
        search: OfferSearch,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<Offer>> {
        validate_request(&search)?;
        tracing::debug!(city = ?search.city, category = ?search.category, "Searching offers");
        cancellable(cancel, self.search(search)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{
        MockCityRepository, MockOfferRepository, MockSellerRepository, MockUserRepository,
    };
    use chrono::Duration;
    use domain::{time, Address, DomainError, OfferStatus, User, UserRole};
    use rust_decimal::Decimal;

    fn seller_in(city: &str, approved: bool) -> Seller {
        let address = Address::new("2 place Bellecour", city).unwrap();
        let mut seller = Seller::create(Uuid::new_v4(), "Chez Paul", address, "").unwrap();
        if approved {
            seller.approve();
        }
        seller
    }

    fn eur(value: i64) -> Money {
        Money::new(Decimal::new(value, 0), "EUR").unwrap()
    }

    fn draft_of(seller: &Seller) -> Offer {
        Offer::create(
            seller.id(),
            "Panier surprise",
            "",
            eur(4),
            eur(12),
            time::now() + Duration::days(2),
        )
        .unwrap()
    }

    fn published_of(seller: &Seller, category: Option<&str>) -> Offer {
        let mut offer = draft_of(seller);
        offer.set_category(category.map(str::to_string)).unwrap();
        offer.submit_for_validation().unwrap();
        offer.validate(Uuid::new_v4()).unwrap();
        offer
    }

    fn create_request(seller_id: Uuid) -> CreateOfferRequest {
        CreateOfferRequest {
            seller_id,
            title: "Panier surprise".to_string(),
            description: "Viennoiseries du jour".to_string(),
            price: Decimal::new(499, 2),
            original_price: Decimal::new(1500, 2),
            currency: "EUR".to_string(),
            expiration_date: time::now() + Duration::days(1),
            start_date: None,
            end_date: None,
            category: Some("bakery".to_string()),
            picture_url: None,
        }
    }

    fn admin_users() -> MockUserRepository {
        let admin = User::create(None, "admin@example.com", "$hash", UserRole::Admin).unwrap();
        let mut users = MockUserRepository::new();
        users
            .expect_get_by_id()
            .returning(move |_| Ok(Some(admin.clone())));
        users
    }

    fn manager(
        users: MockUserRepository,
        sellers: MockSellerRepository,
        offers: MockOfferRepository,
        cities: MockCityRepository,
    ) -> OfferManager {
        OfferManager::new(
            Arc::new(users),
            Arc::new(sellers),
            Arc::new(offers),
            Arc::new(cities),
        )
    }

    fn offers_holding(offer: Offer) -> MockOfferRepository {
        let mut offers = MockOfferRepository::new();
        offers
            .expect_get_by_id()
            .returning(move |_| Ok(Some(offer.clone())));
        offers
    }

    #[tokio::test]
    async fn test_create_offer_for_approved_seller() {
        let seller = seller_in("Lyon", true);
        let seller_id = seller.id();

        let mut sellers = MockSellerRepository::new();
        sellers
            .expect_get_by_id()
            .returning(move |_| Ok(Some(seller.clone())));
        let mut offers = MockOfferRepository::new();
        offers
            .expect_add()
            .withf(|o| o.status() == OfferStatus::Draft && o.category() == Some("bakery"))
            .times(1)
            .returning(|_| Ok(()));

        let service = manager(
            MockUserRepository::new(),
            sellers,
            offers,
            MockCityRepository::new(),
        );
        let offer = service
            .create_offer(create_request(seller_id), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(offer.seller_id(), seller_id);
        assert_eq!(offer.price().amount(), Decimal::new(499, 2));
    }

    #[tokio::test]
    async fn test_pending_seller_cannot_create_offer() {
        let seller = seller_in("Lyon", false);
        let seller_id = seller.id();

        let mut sellers = MockSellerRepository::new();
        sellers
            .expect_get_by_id()
            .returning(move |_| Ok(Some(seller.clone())));
        let mut offers = MockOfferRepository::new();
        offers.expect_add().never();

        let service = manager(
            MockUserRepository::new(),
            sellers,
            offers,
            MockCityRepository::new(),
        );
        let err = service
            .create_offer(create_request(seller_id), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_price_not_below_original_is_rejected() {
        let seller = seller_in("Lyon", true);
        let seller_id = seller.id();

        let mut sellers = MockSellerRepository::new();
        sellers
            .expect_get_by_id()
            .returning(move |_| Ok(Some(seller.clone())));
        let mut offers = MockOfferRepository::new();
        offers.expect_add().never();

        let service = manager(
            MockUserRepository::new(),
            sellers,
            offers,
            MockCityRepository::new(),
        );
        let mut request = create_request(seller_id);
        request.price = request.original_price;
        let err = service
            .create_offer(request, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Domain(DomainError::InvalidPrice(_))));
    }

    #[tokio::test]
    async fn test_submit_then_validate() {
        let seller = seller_in("Lyon", true);
        let mut pending = draft_of(&seller);
        pending.submit_for_validation().unwrap();
        let offer_id = pending.id();
        let moderator = Uuid::new_v4();

        let mut offers = offers_holding(pending);
        offers
            .expect_update()
            .withf(move |o| {
                o.status() == OfferStatus::Published
                    && o.status_history().last().and_then(|c| c.changed_by) == Some(moderator)
            })
            .times(1)
            .returning(|_| Ok(()));

        let service = manager(
            admin_users(),
            MockSellerRepository::new(),
            offers,
            MockCityRepository::new(),
        );
        let offer = service
            .validate_offer(moderator, offer_id, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(offer.status_history().len(), 2);
    }

    #[tokio::test]
    async fn test_editing_a_submitted_offer_fails() {
        let seller = seller_in("Lyon", true);
        let mut pending = draft_of(&seller);
        pending.submit_for_validation().unwrap();
        let offer_id = pending.id();

        let mut offers = offers_holding(pending);
        offers.expect_update().never();

        let service = manager(
            MockUserRepository::new(),
            MockSellerRepository::new(),
            offers,
            MockCityRepository::new(),
        );
        let request = UpdateOfferDetailsRequest {
            title: "Nouveau titre".to_string(),
            description: String::new(),
        };
        let err = service
            .update_offer_details(offer_id, request, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::Domain(DomainError::InvalidStateTransition(_))
        ));
    }

    #[tokio::test]
    async fn test_reject_requires_admin() {
        let customer = User::create(None, "c@example.com", "$hash", UserRole::Customer).unwrap();
        let mut users = MockUserRepository::new();
        users
            .expect_get_by_id()
            .returning(move |_| Ok(Some(customer.clone())));
        let mut offers = MockOfferRepository::new();
        offers.expect_get_by_id().never();

        let service = manager(users, MockSellerRepository::new(), offers, MockCityRepository::new());
        let err = service
            .reject_offer(
                Uuid::new_v4(),
                Uuid::new_v4(),
                "Photo floue".to_string(),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_unknown_offer_is_not_found() {
        let mut offers = MockOfferRepository::new();
        offers.expect_get_by_id().returning(|_| Ok(None));

        let service = manager(
            MockUserRepository::new(),
            MockSellerRepository::new(),
            offers,
            MockCityRepository::new(),
        );
        let err = service
            .submit_offer(Uuid::new_v4(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_search_by_localized_city_and_category() {
        let lyon = seller_in("Lyon", true);
        let paris = seller_in("Paris", true);
        let bakery_lyon = published_of(&lyon, Some("Bakery"));
        let grocery_lyon = published_of(&lyon, Some("grocery"));
        let bakery_paris = published_of(&paris, Some("bakery"));
        let expected = bakery_lyon.id();
        let all = vec![bakery_lyon, grocery_lyon, bakery_paris, draft_of(&lyon)];

        let mut offers = MockOfferRepository::new();
        offers.expect_list().returning(move || Ok(all.clone()));
        let mut sellers = MockSellerRepository::new();
        let known = vec![lyon, paris];
        sellers
            .expect_get_by_id()
            .returning(move |id| Ok(known.iter().find(|s| s.id() == id).cloned()));
        let mut cities = MockCityRepository::new();
        cities.expect_list().returning(|| {
            Ok(vec![
                City::create("Lyon", "ليون", "Lyon").unwrap(),
                City::create("Paris", "باريس", "Paris").unwrap(),
            ])
        });

        let service = manager(MockUserRepository::new(), sellers, offers, cities);
        let search = OfferSearch {
            city: Some("ليون".to_string()),
            category: Some("BAKERY".to_string()),
        };
        let found = service
            .search_offers(search, &CancellationToken::new())
            .await
            .unwrap();

        let ids: Vec<Uuid> = found.iter().map(Offer::id).collect();
        assert_eq!(ids, vec![expected]);
    }

    #[tokio::test]
    async fn test_search_without_filters_returns_active_offers() {
        let seller = seller_in("Lille", true);
        let all = vec![published_of(&seller, None), draft_of(&seller)];

        let mut offers = MockOfferRepository::new();
        offers.expect_list().returning(move || Ok(all.clone()));
        let mut cities = MockCityRepository::new();
        cities.expect_list().never();

        let service = manager(
            MockUserRepository::new(),
            MockSellerRepository::new(),
            offers,
            cities,
        );
        let found = service
            .search_offers(OfferSearch::default(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].status(), OfferStatus::Published);
    }
}
