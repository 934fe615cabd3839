//! Document shapes and their conversions to domain entities.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain::{
    Address, City, DomainError, DomainResult, Money, Offer, OfferParts, Product, ProductParts,
    Seller, SellerParts, StatusChange, User,
};

fn parse_id(raw: &str) -> DomainResult<Uuid> {
    Uuid::parse_str(raw).map_err(|e| DomainError::internal(format!("Stored id {raw:?}: {e}")))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoneyDocument {
    pub amount: Decimal,
    pub currency: String,
}

impl From<&Money> for MoneyDocument {
    fn from(money: &Money) -> Self {
        Self {
            amount: money.amount(),
            currency: money.currency().to_string(),
        }
    }
}

impl TryFrom<MoneyDocument> for Money {
    type Error = DomainError;

    fn try_from(doc: MoneyDocument) -> DomainResult<Self> {
        Money::new(doc.amount, doc.currency)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
}

impl From<&User> for UserDocument {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            email: user.email().to_string(),
            password_hash: user.password_hash().to_string(),
            role: user.role().as_str().to_string(),
            is_active: user.is_active(),
        }
    }
}

impl TryFrom<UserDocument> for User {
    type Error = DomainError;

    fn try_from(doc: UserDocument) -> DomainResult<Self> {
        User::restore(
            parse_id(&doc.id)?,
            doc.email,
            doc.password_hash,
            doc.role.parse()?,
            doc.is_active,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressDocument {
    pub street: String,
    pub city: String,
    pub zip_code: Option<String>,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellerDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub store_name: String,
    pub address: AddressDocument,
    pub description: String,
    pub status: String,
    pub rejection_reason: Option<String>,
}

impl From<&Seller> for SellerDocument {
    fn from(seller: &Seller) -> Self {
        let address = seller.address();
        Self {
            id: seller.id().to_string(),
            user_id: seller.user_id().to_string(),
            store_name: seller.store_name().to_string(),
            address: AddressDocument {
                street: address.street().to_string(),
                city: address.city().to_string(),
                zip_code: address.zip_code().map(str::to_string),
                country: address.country().to_string(),
                latitude: address.latitude(),
                longitude: address.longitude(),
            },
            description: seller.description().to_string(),
            status: seller.status().as_str().to_string(),
            rejection_reason: seller.rejection_reason().map(str::to_string),
        }
    }
}

impl TryFrom<SellerDocument> for Seller {
    type Error = DomainError;

    fn try_from(doc: SellerDocument) -> DomainResult<Self> {
        let address = Address::with_details(
            doc.address.street,
            doc.address.city,
            doc.address.zip_code,
            Some(doc.address.country),
            doc.address.latitude,
            doc.address.longitude,
        )?;

        Seller::restore(SellerParts {
            id: parse_id(&doc.id)?,
            user_id: parse_id(&doc.user_id)?,
            store_name: doc.store_name,
            address,
            description: doc.description,
            status: doc.status.parse()?,
            rejection_reason: doc.rejection_reason,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChangeDocument {
    pub status: String,
    pub changed_by: Option<String>,
    pub changed_at: DateTime<Utc>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub seller_id: String,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub price: MoneyDocument,
    pub original_price: MoneyDocument,
    pub picture_url: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub expiration_date: DateTime<Utc>,
    pub status: String,
    #[serde(default)]
    pub status_history: Vec<StatusChangeDocument>,
}

impl From<&Offer> for OfferDocument {
    fn from(offer: &Offer) -> Self {
        Self {
            id: offer.id().to_string(),
            seller_id: offer.seller_id().to_string(),
            title: offer.title().to_string(),
            description: offer.description().to_string(),
            category: offer.category().map(str::to_string),
            price: offer.price().into(),
            original_price: offer.original_price().into(),
            picture_url: offer.picture_url().map(str::to_string),
            start_date: offer.start_date(),
            end_date: offer.end_date(),
            expiration_date: offer.expiration_date(),
            status: offer.status().as_str().to_string(),
            status_history: offer
                .status_history()
                .iter()
                .map(|change| StatusChangeDocument {
                    status: change.status.as_str().to_string(),
                    changed_by: change.changed_by.map(|id| id.to_string()),
                    changed_at: change.changed_at,
                    reason: change.reason.clone(),
                })
                .collect(),
        }
    }
}

impl TryFrom<OfferDocument> for Offer {
    type Error = DomainError;

    fn try_from(doc: OfferDocument) -> DomainResult<Self> {
        let status_history = doc
            .status_history
            .into_iter()
            .map(|change| -> DomainResult<StatusChange> {
                Ok(StatusChange {
                    status: change.status.parse()?,
                    changed_by: change.changed_by.as_deref().map(parse_id).transpose()?,
                    changed_at: change.changed_at,
                    reason: change.reason,
                })
            })
            .collect::<DomainResult<Vec<_>>>()?;

        Offer::restore(OfferParts {
            id: parse_id(&doc.id)?,
            seller_id: parse_id(&doc.seller_id)?,
            title: doc.title,
            description: doc.description,
            category: doc.category,
            price: doc.price.try_into()?,
            original_price: doc.original_price.try_into()?,
            picture_url: doc.picture_url,
            start_date: doc.start_date,
            end_date: doc.end_date,
            expiration_date: doc.expiration_date,
            status: doc.status.parse()?,
            status_history,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub seller_id: String,
    pub name: String,
    pub description: String,
    pub price: MoneyDocument,
    pub category: Option<String>,
    pub is_available: bool,
}

impl From<&Product> for ProductDocument {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id().to_string(),
            seller_id: product.seller_id().to_string(),
            name: product.name().to_string(),
            description: product.description().to_string(),
            price: product.price().into(),
            category: product.category().map(str::to_string),
            is_available: product.is_available(),
        }
    }
}

impl TryFrom<ProductDocument> for Product {
    type Error = DomainError;

    fn try_from(doc: ProductDocument) -> DomainResult<Self> {
        Product::restore(ProductParts {
            id: parse_id(&doc.id)?,
            seller_id: parse_id(&doc.seller_id)?,
            name: doc.name,
            description: doc.description,
            price: doc.price.try_into()?,
            category: doc.category,
            is_available: doc.is_available,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub name_fr: String,
    pub name_ar: String,
    pub name_en: String,
}

impl From<&City> for CityDocument {
    fn from(city: &City) -> Self {
        Self {
            id: city.id().to_string(),
            name_fr: city.name_fr().to_string(),
            name_ar: city.name_ar().to_string(),
            name_en: city.name_en().to_string(),
        }
    }
}

impl TryFrom<CityDocument> for City {
    type Error = DomainError;

    fn try_from(doc: CityDocument) -> DomainResult<Self> {
        City::restore(parse_id(&doc.id)?, doc.name_fr, doc.name_ar, doc.name_en)
    }
}
