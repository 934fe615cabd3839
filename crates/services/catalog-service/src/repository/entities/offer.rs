//! Offer database entity.
//!
//! Money is stored as an amount column plus a currency column. The status
//! history lives in its own table, see [`super::offer_status_change`].

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::offer_status_change;
use domain::{DomainError, Money, Offer, OfferParts};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "offers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub seller_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub price_amount: Decimal,
    pub price_currency: String,
    pub original_price_amount: Decimal,
    pub original_price_currency: String,
    pub picture_url: Option<String>,
    pub start_date: DateTimeUtc,
    pub end_date: Option<DateTimeUtc>,
    pub expiration_date: DateTimeUtc,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::offer_status_change::Entity")]
    StatusChanges,
}

impl Related<offer_status_change::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StatusChanges.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Rebuild the domain offer from its row and its history rows.
    ///
    /// History rows may arrive in any order; they are sorted by position.
    pub fn into_offer(
        self,
        mut history: Vec<offer_status_change::Model>,
    ) -> Result<Offer, DomainError> {
        history.sort_by_key(|change| change.position);
        let status_history = history
            .into_iter()
            .map(offer_status_change::Model::into_status_change)
            .collect::<Result<Vec<_>, _>>()?;

        Offer::restore(OfferParts {
            id: self.id,
            seller_id: self.seller_id,
            title: self.title,
            description: self.description,
            category: self.category,
            price: Money::new(self.price_amount, self.price_currency)?,
            original_price: Money::new(self.original_price_amount, self.original_price_currency)?,
            picture_url: self.picture_url,
            start_date: self.start_date,
            end_date: self.end_date,
            expiration_date: self.expiration_date,
            status: self.status.parse()?,
            status_history,
        })
    }
}

impl From<&Offer> for ActiveModel {
    fn from(offer: &Offer) -> Self {
        ActiveModel {
            id: Set(offer.id()),
            seller_id: Set(offer.seller_id()),
            title: Set(offer.title().to_string()),
            description: Set(offer.description().to_string()),
            category: Set(offer.category().map(str::to_string)),
            price_amount: Set(offer.price().amount()),
            price_currency: Set(offer.price().currency().to_string()),
            original_price_amount: Set(offer.original_price().amount()),
            original_price_currency: Set(offer.original_price().currency().to_string()),
            picture_url: Set(offer.picture_url().map(str::to_string)),
            start_date: Set(offer.start_date()),
            end_date: Set(offer.end_date()),
            expiration_date: Set(offer.expiration_date()),
            status: Set(offer.status().as_str().to_string()),
        }
    }
}
