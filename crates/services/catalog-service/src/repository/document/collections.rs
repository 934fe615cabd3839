use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::Collection;
use uuid::Uuid;

use super::models::{CityDocument, OfferDocument, ProductDocument, SellerDocument, UserDocument};
use super::{CITIES, OFFERS, PRODUCTS, SELLERS, USERS};
use crate::repository::contracts::{
    sort_cities, sort_offers, sort_products, sort_sellers, CityRepository, OfferRepository,
    ProductRepository, SellerRepository, UserRepository,
};
use common::{AppError, AppResult};
use domain::{City, DomainError, Offer, Product, Seller, User};

/// Convert a write error, naming the entity when a unique index was violated.
fn write_error(entity: &'static str) -> impl Fn(mongodb::error::Error) -> AppError {
    move |err| match AppError::from(err) {
        AppError::Conflict(_) => AppError::conflict(entity),
        other => other,
    }
}

fn by_id(id: Uuid) -> Document {
    doc! { "_id": id.to_string() }
}

async fn find_all<D, E>(collection: &Collection<D>, filter: Document) -> AppResult<Vec<E>>
where
    D: serde::de::DeserializeOwned + Unpin + Send + Sync,
    E: TryFrom<D, Error = DomainError>,
{
    let docs: Vec<D> = collection.find(filter).await?.try_collect().await?;
    Ok(docs
        .into_iter()
        .map(E::try_from)
        .collect::<Result<Vec<_>, _>>()?)
}

/// `users` collection access.
pub struct UserCollection {
    collection: Collection<UserDocument>,
}

impl UserCollection {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection(USERS),
        }
    }
}

#[async_trait]
impl UserRepository for UserCollection {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let found = self.collection.find_one(by_id(id)).await?;
        Ok(found.map(User::try_from).transpose()?)
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let found = self.collection.find_one(doc! { "email": email }).await?;
        Ok(found.map(User::try_from).transpose()?)
    }

    async fn add(&self, user: &User) -> AppResult<()> {
        self.collection
            .insert_one(UserDocument::from(user))
            .await
            .map_err(write_error("User"))?;
        Ok(())
    }

    async fn update(&self, user: &User) -> AppResult<()> {
        self.collection
            .replace_one(by_id(user.id()), UserDocument::from(user))
            .upsert(true)
            .await
            .map_err(write_error("User"))?;
        Ok(())
    }
}

/// `sellers` collection access.
pub struct SellerCollection {
    collection: Collection<SellerDocument>,
}

impl SellerCollection {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection(SELLERS),
        }
    }
}

#[async_trait]
impl SellerRepository for SellerCollection {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Seller>> {
        let found = self.collection.find_one(by_id(id)).await?;
        Ok(found.map(Seller::try_from).transpose()?)
    }

    async fn get_by_user_id(&self, user_id: Uuid) -> AppResult<Option<Seller>> {
        let found = self
            .collection
            .find_one(doc! { "user_id": user_id.to_string() })
            .await?;
        Ok(found.map(Seller::try_from).transpose()?)
    }

    async fn add(&self, seller: &Seller) -> AppResult<()> {
        self.collection
            .insert_one(SellerDocument::from(seller))
            .await
            .map_err(write_error("Seller"))?;
        Ok(())
    }

    async fn update(&self, seller: &Seller) -> AppResult<()> {
        self.collection
            .replace_one(by_id(seller.id()), SellerDocument::from(seller))
            .upsert(true)
            .await
            .map_err(write_error("Seller"))?;
        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<Seller>> {
        let mut sellers: Vec<Seller> = find_all(&self.collection, doc! {}).await?;
        sort_sellers(&mut sellers);
        Ok(sellers)
    }
}

/// `offers` collection access. The status history is embedded, so an offer
/// and its history are written in one single-document operation.
pub struct OfferCollection {
    collection: Collection<OfferDocument>,
}

impl OfferCollection {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection(OFFERS),
        }
    }
}

#[async_trait]
impl OfferRepository for OfferCollection {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Offer>> {
        let found = self.collection.find_one(by_id(id)).await?;
        Ok(found.map(Offer::try_from).transpose()?)
    }

    async fn get_by_seller_id(&self, seller_id: Uuid) -> AppResult<Vec<Offer>> {
        let filter = doc! { "seller_id": seller_id.to_string() };
        let mut offers: Vec<Offer> = find_all(&self.collection, filter).await?;
        sort_offers(&mut offers);
        Ok(offers)
    }

    async fn add(&self, offer: &Offer) -> AppResult<()> {
        self.collection
            .insert_one(OfferDocument::from(offer))
            .await
            .map_err(write_error("Offer"))?;
        Ok(())
    }

    async fn update(&self, offer: &Offer) -> AppResult<()> {
        self.collection
            .replace_one(by_id(offer.id()), OfferDocument::from(offer))
            .upsert(true)
            .await
            .map_err(write_error("Offer"))?;
        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<Offer>> {
        let mut offers: Vec<Offer> = find_all(&self.collection, doc! {}).await?;
        sort_offers(&mut offers);
        Ok(offers)
    }
}

/// `products` collection access.
pub struct ProductCollection {
    collection: Collection<ProductDocument>,
}

impl ProductCollection {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection(PRODUCTS),
        }
    }
}

#[async_trait]
impl ProductRepository for ProductCollection {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        let found = self.collection.find_one(by_id(id)).await?;
        Ok(found.map(Product::try_from).transpose()?)
    }

    async fn get_by_seller_id(&self, seller_id: Uuid) -> AppResult<Vec<Product>> {
        let filter = doc! { "seller_id": seller_id.to_string() };
        let mut products: Vec<Product> = find_all(&self.collection, filter).await?;
        sort_products(&mut products);
        Ok(products)
    }

    async fn add(&self, product: &Product) -> AppResult<()> {
        self.collection
            .insert_one(ProductDocument::from(product))
            .await
            .map_err(write_error("Product"))?;
        Ok(())
    }

    async fn update(&self, product: &Product) -> AppResult<()> {
        self.collection
            .replace_one(by_id(product.id()), ProductDocument::from(product))
            .upsert(true)
            .await
            .map_err(write_error("Product"))?;
        Ok(())
    }
}

/// `cities` collection access.
pub struct CityCollection {
    collection: Collection<CityDocument>,
}

impl CityCollection {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection(CITIES),
        }
    }
}

#[async_trait]
impl CityRepository for CityCollection {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<City>> {
        let found = self.collection.find_one(by_id(id)).await?;
        Ok(found.map(City::try_from).transpose()?)
    }

    async fn add(&self, city: &City) -> AppResult<()> {
        self.collection
            .insert_one(CityDocument::from(city))
            .await
            .map_err(write_error("City"))?;
        Ok(())
    }

    async fn update(&self, city: &City) -> AppResult<()> {
        self.collection
            .replace_one(by_id(city.id()), CityDocument::from(city))
            .upsert(true)
            .await
            .map_err(write_error("City"))?;
        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<City>> {
        let mut cities: Vec<City> = find_all(&self.collection, doc! {}).await?;
        sort_cities(&mut cities);
        Ok(cities)
    }
}
