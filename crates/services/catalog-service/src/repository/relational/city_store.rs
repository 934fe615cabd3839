use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait};
use uuid::Uuid;

use super::write_error;
use crate::repository::contracts::{sort_cities, CityRepository};
use crate::repository::entities::city::{self, ActiveModel, Entity as CityEntity};
use common::AppResult;
use domain::City;

/// `cities` table access.
pub struct CityStore {
    db: DatabaseConnection,
}

impl CityStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CityRepository for CityStore {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<City>> {
        let model = CityEntity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(City::try_from).transpose()?)
    }

    async fn add(&self, city: &City) -> AppResult<()> {
        ActiveModel::from(city)
            .insert(&self.db)
            .await
            .map_err(write_error("City"))?;
        Ok(())
    }

    async fn update(&self, city: &City) -> AppResult<()> {
        CityEntity::insert(ActiveModel::from(city))
            .on_conflict(
                OnConflict::column(city::Column::Id)
                    .update_columns([
                        city::Column::NameFr,
                        city::Column::NameAr,
                        city::Column::NameEn,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(write_error("City"))?;
        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<City>> {
        let mut cities = CityEntity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(City::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        sort_cities(&mut cities);
        Ok(cities)
    }
}
