//! In-memory storage backend.
//!
//! Each collection sits behind its own `RwLock`; a write holds the lock for
//! the whole check-then-insert, so uniqueness checks cannot race.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::contracts::{
    sort_cities, sort_offers, sort_products, sort_sellers, CityRepository, OfferRepository,
    ProductRepository, SellerRepository, UserRepository,
};
use common::{AppError, AppResult};
use domain::{City, Offer, Product, Seller, User};

/// Process-local store implementing every repository contract.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    sellers: RwLock<HashMap<Uuid, Seller>>,
    offers: RwLock<HashMap<Uuid, Offer>>,
    products: RwLock<HashMap<Uuid, Product>>,
    cities: RwLock<HashMap<Uuid, City>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_taken(users: &HashMap<Uuid, User>, user: &User) -> bool {
    users
        .values()
        .any(|other| other.id() != user.id() && other.email() == user.email())
}

fn owner_taken(sellers: &HashMap<Uuid, Seller>, seller: &Seller) -> bool {
    sellers
        .values()
        .any(|other| other.id() != seller.id() && other.user_id() == seller.user_id())
}

fn city_name_taken(cities: &HashMap<Uuid, City>, city: &City) -> bool {
    cities
        .values()
        .any(|other| other.id() != city.id() && other.name_en() == city.name_en())
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email() == email).cloned())
    }

    async fn add(&self, user: &User) -> AppResult<()> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id()) || email_taken(&users, user) {
            return Err(AppError::conflict("User"));
        }
        users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> AppResult<()> {
        let mut users = self.users.write().await;
        if email_taken(&users, user) {
            return Err(AppError::conflict("User"));
        }
        users.insert(user.id(), user.clone());
        Ok(())
    }
}

#[async_trait]
impl SellerRepository for MemoryStore {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Seller>> {
        Ok(self.sellers.read().await.get(&id).cloned())
    }

    async fn get_by_user_id(&self, user_id: Uuid) -> AppResult<Option<Seller>> {
        let sellers = self.sellers.read().await;
        Ok(sellers.values().find(|s| s.user_id() == user_id).cloned())
    }

    async fn add(&self, seller: &Seller) -> AppResult<()> {
        let mut sellers = self.sellers.write().await;
        if sellers.contains_key(&seller.id()) || owner_taken(&sellers, seller) {
            return Err(AppError::conflict("Seller"));
        }
        sellers.insert(seller.id(), seller.clone());
        Ok(())
    }

    async fn update(&self, seller: &Seller) -> AppResult<()> {
        let mut sellers = self.sellers.write().await;
        if owner_taken(&sellers, seller) {
            return Err(AppError::conflict("Seller"));
        }
        sellers.insert(seller.id(), seller.clone());
        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<Seller>> {
        let mut sellers: Vec<Seller> = self.sellers.read().await.values().cloned().collect();
        sort_sellers(&mut sellers);
        Ok(sellers)
    }
}

#[async_trait]
impl OfferRepository for MemoryStore {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Offer>> {
        Ok(self.offers.read().await.get(&id).cloned())
    }

    async fn get_by_seller_id(&self, seller_id: Uuid) -> AppResult<Vec<Offer>> {
        let mut offers: Vec<Offer> = self
            .offers
            .read()
            .await
            .values()
            .filter(|o| o.seller_id() == seller_id)
            .cloned()
            .collect();
        sort_offers(&mut offers);
        Ok(offers)
    }

    async fn add(&self, offer: &Offer) -> AppResult<()> {
        let mut offers = self.offers.write().await;
        if offers.contains_key(&offer.id()) {
            return Err(AppError::conflict("Offer"));
        }
        offers.insert(offer.id(), offer.clone());
        Ok(())
    }

    async fn update(&self, offer: &Offer) -> AppResult<()> {
        self.offers.write().await.insert(offer.id(), offer.clone());
        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<Offer>> {
        let mut offers: Vec<Offer> = self.offers.read().await.values().cloned().collect();
        sort_offers(&mut offers);
        Ok(offers)
    }
}

#[async_trait]
impl ProductRepository for MemoryStore {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn get_by_seller_id(&self, seller_id: Uuid) -> AppResult<Vec<Product>> {
        let mut products: Vec<Product> = self
            .products
            .read()
            .await
            .values()
            .filter(|p| p.seller_id() == seller_id)
            .cloned()
            .collect();
        sort_products(&mut products);
        Ok(products)
    }

    async fn add(&self, product: &Product) -> AppResult<()> {
        let mut products = self.products.write().await;
        if products.contains_key(&product.id()) {
            return Err(AppError::conflict("Product"));
        }
        products.insert(product.id(), product.clone());
        Ok(())
    }

    async fn update(&self, product: &Product) -> AppResult<()> {
        self.products
            .write()
            .await
            .insert(product.id(), product.clone());
        Ok(())
    }
}

#[async_trait]
impl CityRepository for MemoryStore {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<City>> {
        Ok(self.cities.read().await.get(&id).cloned())
    }

    async fn add(&self, city: &City) -> AppResult<()> {
        let mut cities = self.cities.write().await;
        if cities.contains_key(&city.id()) || city_name_taken(&cities, city) {
            return Err(AppError::conflict("City"));
        }
        cities.insert(city.id(), city.clone());
        Ok(())
    }

    async fn update(&self, city: &City) -> AppResult<()> {
        let mut cities = self.cities.write().await;
        if city_name_taken(&cities, city) {
            return Err(AppError::conflict("City"));
        }
        cities.insert(city.id(), city.clone());
        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<City>> {
        let mut cities: Vec<City> = self.cities.read().await.values().cloned().collect();
        sort_cities(&mut cities);
        Ok(cities)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use domain::{Address, UserRole};

    const WRITERS: usize = 16;

    fn user(email: &str) -> User {
        User::create(None, email, "$argon2id$hash", UserRole::Customer).unwrap()
    }

    #[tokio::test]
    async fn test_add_then_get_returns_equal_entity() {
        let store = MemoryStore::new();
        let user = user("a@example.com");

        UserRepository::add(&store, &user).await.unwrap();

        let found = UserRepository::get_by_id(&store, user.id()).await.unwrap();
        assert_eq!(found, Some(user.clone()));
        let by_email = store.get_by_email("a@example.com").await.unwrap();
        assert_eq!(by_email, Some(user));
    }

    #[tokio::test]
    async fn test_add_duplicate_id_conflicts() {
        let store = MemoryStore::new();
        let user = user("a@example.com");
        UserRepository::add(&store, &user).await.unwrap();

        let err = UserRepository::add(&store, &user).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_add_duplicate_email_conflicts() {
        let store = MemoryStore::new();
        UserRepository::add(&store, &user("a@example.com")).await.unwrap();

        let err = UserRepository::add(&store, &user("a@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_second_seller_for_same_user_conflicts() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let address = Address::new("1 rue", "Paris").unwrap();
        let first = Seller::create(owner, "One", address.clone(), "").unwrap();
        let second = Seller::create(owner, "Two", address, "").unwrap();

        SellerRepository::add(&store, &first).await.unwrap();
        let err = SellerRepository::add(&store, &second).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_inserts_missing_entity() {
        let store = MemoryStore::new();
        let city = City::create("Lyon", "ليون", "Lyon").unwrap();

        CityRepository::update(&store, &city).await.unwrap();

        assert_eq!(CityRepository::list(&store).await.unwrap(), vec![city]);
    }

    #[tokio::test]
    async fn test_missing_entity_is_none() {
        let store = MemoryStore::new();
        let found = OfferRepository::get_by_id(&store, Uuid::new_v4()).await.unwrap();
        assert!(found.is_none());
        let offers = OfferRepository::get_by_seller_id(&store, Uuid::new_v4())
            .await
            .unwrap();
        assert!(offers.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_with_same_email_admit_one() {
        let store = Arc::new(MemoryStore::new());
        let tasks: Vec<_> = (0..WRITERS)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    UserRepository::add(store.as_ref(), &user("same@example.com")).await
                })
            })
            .collect();

        let (mut added, mut conflicts) = (0, 0);
        for task in tasks {
            match task.await.unwrap() {
                Ok(()) => added += 1,
                Err(AppError::Conflict(_)) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }
        assert_eq!(added, 1);
        assert_eq!(conflicts, WRITERS - 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_keep_one_written_value() {
        let store = Arc::new(MemoryStore::new());
        let original = user("writer@example.com");
        UserRepository::add(store.as_ref(), &original).await.unwrap();

        let hashes: Vec<String> = (0..WRITERS).map(|i| format!("$hash-{i}")).collect();
        let writers: Vec<_> = hashes
            .iter()
            .map(|hash| {
                let store = Arc::clone(&store);
                let mut changed = original.clone();
                changed.change_password(hash.as_str()).unwrap();
                tokio::spawn(async move { UserRepository::update(store.as_ref(), &changed).await })
            })
            .collect();
        let readers: Vec<_> = (0..WRITERS)
            .map(|_| {
                let store = Arc::clone(&store);
                let id = original.id();
                tokio::spawn(async move { UserRepository::get_by_id(store.as_ref(), id).await })
            })
            .collect();

        for writer in writers {
            writer.await.unwrap().unwrap();
        }
        for reader in readers {
            let seen = reader.await.unwrap().unwrap().unwrap();
            assert_eq!(seen.id(), original.id());
        }

        let stored = UserRepository::get_by_id(store.as_ref(), original.id())
            .await
            .unwrap()
            .unwrap();
        assert!(hashes.iter().any(|h| h == stored.password_hash()));
        assert_eq!(stored.email(), "writer@example.com");
    }

    #[tokio::test]
    async fn test_city_names_are_unique() {
        let store = MemoryStore::new();
        CityRepository::add(&store, &City::create("Lyon", "ليون", "Lyon").unwrap())
            .await
            .unwrap();

        let twin = City::create("Lyon", "ليون", "Lyon").unwrap();
        let err = CityRepository::add(&store, &twin).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert!(CityRepository::update(&store, &twin).await.is_err());
    }

    #[tokio::test]
    async fn test_write_abandoned_while_waiting_leaves_nothing_behind() {
        use tokio_util::sync::CancellationToken;

        use crate::service::cancellable;

        let store = MemoryStore::new();
        let user = user("late@example.com");
        let cancel = CancellationToken::new();

        // A reader holds the lock, so the write is still queued when cancelled
        let reader = store.users.read().await;
        let trigger = cancel.clone();
        tokio::spawn(async move { trigger.cancel() });
        let result = cancellable(&cancel, UserRepository::add(&store, &user)).await;
        drop(reader);

        assert!(matches!(result, Err(AppError::Cancelled)));
        assert!(UserRepository::get_by_id(&store, user.id()).await.unwrap().is_none());
        UserRepository::add(&store, &user).await.unwrap();
    }
}
