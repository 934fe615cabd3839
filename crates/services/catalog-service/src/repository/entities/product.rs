//! Product database entity.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::{DomainError, Money, Product, ProductParts};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub seller_id: Uuid,
    pub name: String,
    pub description: String,
    pub price_amount: Decimal,
    pub price_currency: String,
    pub category: Option<String>,
    pub is_available: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Product {
    type Error = DomainError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Product::restore(ProductParts {
            id: model.id,
            seller_id: model.seller_id,
            name: model.name,
            description: model.description,
            price: Money::new(model.price_amount, model.price_currency)?,
            category: model.category,
            is_available: model.is_available,
        })
    }
}

impl From<&Product> for ActiveModel {
    fn from(product: &Product) -> Self {
        ActiveModel {
            id: Set(product.id()),
            seller_id: Set(product.seller_id()),
            name: Set(product.name().to_string()),
            description: Set(product.description().to_string()),
            price_amount: Set(product.price().amount()),
            price_currency: Set(product.price().currency().to_string()),
            category: Set(product.category().map(str::to_string)),
            is_available: Set(product.is_available()),
        }
    }
}
