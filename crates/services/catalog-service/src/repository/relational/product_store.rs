use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use super::write_error;
use crate::repository::contracts::{sort_products, ProductRepository};
use crate::repository::entities::product::{self, ActiveModel, Entity as ProductEntity};
use common::AppResult;
use domain::Product;

/// `products` table access.
pub struct ProductStore {
    db: DatabaseConnection,
}

impl ProductStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for ProductStore {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        let model = ProductEntity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Product::try_from).transpose()?)
    }

    async fn get_by_seller_id(&self, seller_id: Uuid) -> AppResult<Vec<Product>> {
        let mut products = ProductEntity::find()
            .filter(product::Column::SellerId.eq(seller_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(Product::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        sort_products(&mut products);
        Ok(products)
    }

    async fn add(&self, product: &Product) -> AppResult<()> {
        ActiveModel::from(product)
            .insert(&self.db)
            .await
            .map_err(write_error("Product"))?;
        Ok(())
    }

    async fn update(&self, product: &Product) -> AppResult<()> {
        ProductEntity::insert(ActiveModel::from(product))
            .on_conflict(
                OnConflict::column(product::Column::Id)
                    .update_columns([
                        product::Column::SellerId,
                        product::Column::Name,
                        product::Column::Description,
                        product::Column::PriceAmount,
                        product::Column::PriceCurrency,
                        product::Column::Category,
                        product::Column::IsAvailable,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(write_error("Product"))?;
        Ok(())
    }
}
