use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use super::write_error;
use crate::repository::contracts::{sort_sellers, SellerRepository};
use crate::repository::entities::seller::{self, ActiveModel, Entity as SellerEntity};
use common::AppResult;
use domain::Seller;

/// `sellers` table access.
pub struct SellerStore {
    db: DatabaseConnection,
}

impl SellerStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SellerRepository for SellerStore {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Seller>> {
        let model = SellerEntity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Seller::try_from).transpose()?)
    }

    async fn get_by_user_id(&self, user_id: Uuid) -> AppResult<Option<Seller>> {
        let model = SellerEntity::find()
            .filter(seller::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;
        Ok(model.map(Seller::try_from).transpose()?)
    }

    async fn add(&self, seller: &Seller) -> AppResult<()> {
        ActiveModel::from(seller)
            .insert(&self.db)
            .await
            .map_err(write_error("Seller"))?;
        Ok(())
    }

    async fn update(&self, seller: &Seller) -> AppResult<()> {
        SellerEntity::insert(ActiveModel::from(seller))
            .on_conflict(
                OnConflict::column(seller::Column::Id)
                    .update_columns([
                        seller::Column::UserId,
                        seller::Column::StoreName,
                        seller::Column::Street,
                        seller::Column::City,
                        seller::Column::ZipCode,
                        seller::Column::Country,
                        seller::Column::Latitude,
                        seller::Column::Longitude,
                        seller::Column::Description,
                        seller::Column::Status,
                        seller::Column::RejectionReason,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(write_error("Seller"))?;
        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<Seller>> {
        let mut sellers = SellerEntity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(Seller::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        sort_sellers(&mut sellers);
        Ok(sellers)
    }
}
