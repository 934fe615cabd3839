//! Seller database entity. The address is flattened into columns.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::{Address, DomainError, Seller, SellerParts};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sellers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub store_name: String,
    pub street: String,
    pub city: String,
    pub zip_code: Option<String>,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub description: String,
    pub status: String,
    pub rejection_reason: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Seller {
    type Error = DomainError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let address = Address::with_details(
            model.street,
            model.city,
            model.zip_code,
            Some(model.country),
            model.latitude,
            model.longitude,
        )?;

        Seller::restore(SellerParts {
            id: model.id,
            user_id: model.user_id,
            store_name: model.store_name,
            address,
            description: model.description,
            status: model.status.parse()?,
            rejection_reason: model.rejection_reason,
        })
    }
}

impl From<&Seller> for ActiveModel {
    fn from(seller: &Seller) -> Self {
        let address = seller.address();
        ActiveModel {
            id: Set(seller.id()),
            user_id: Set(seller.user_id()),
            store_name: Set(seller.store_name().to_string()),
            street: Set(address.street().to_string()),
            city: Set(address.city().to_string()),
            zip_code: Set(address.zip_code().map(str::to_string)),
            country: Set(address.country().to_string()),
            latitude: Set(address.latitude()),
            longitude: Set(address.longitude()),
            description: Set(seller.description().to_string()),
            status: Set(seller.status().as_str().to_string()),
            rejection_reason: Set(seller.rejection_reason().map(str::to_string)),
        }
    }
}
