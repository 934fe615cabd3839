//! City database entity.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::{City, DomainError};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "cities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name_fr: String,
    pub name_ar: String,
    pub name_en: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for City {
    type Error = DomainError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        City::restore(model.id, model.name_fr, model.name_ar, model.name_en)
    }
}

impl From<&City> for ActiveModel {
    fn from(city: &City) -> Self {
        ActiveModel {
            id: Set(city.id()),
            name_fr: Set(city.name_fr().to_string()),
            name_ar: Set(city.name_ar().to_string()),
            name_en: Set(city.name_en().to_string()),
        }
    }
}
