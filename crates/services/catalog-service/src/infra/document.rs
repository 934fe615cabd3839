//! MongoDB connection and index setup.

use mongodb::bson::doc;
use mongodb::options::IndexOptions;
use mongodb::{Client, IndexModel};

use crate::repository::document::{CITIES, OFFERS, PRODUCTS, SELLERS, USERS};
use common::{AppResult, DocumentStoreConfig};

/// Handle on the catalog database of a MongoDB deployment.
#[derive(Clone)]
pub struct DocumentStore {
    database: mongodb::Database,
}

impl DocumentStore {
    /// Connect and make sure the unique and lookup indexes exist.
    pub async fn connect(config: &DocumentStoreConfig) -> AppResult<Self> {
        let client = Client::with_uri_str(&config.url).await?;
        let store = Self {
            database: client.database(&config.database),
        };
        store.ensure_indexes().await?;
        tracing::info!(database = %config.database, "Document store connected");
        Ok(store)
    }

    pub fn database(&self) -> mongodb::Database {
        self.database.clone()
    }

    /// Create indexes. Re-running is harmless: existing indexes are kept.
    pub async fn ensure_indexes(&self) -> AppResult<()> {
        let unique = || IndexOptions::builder().unique(true).build();

        self.database
            .collection::<mongodb::bson::Document>(USERS)
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "email": 1 })
                    .options(unique())
                    .build(),
            )
            .await?;

        self.database
            .collection::<mongodb::bson::Document>(SELLERS)
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "user_id": 1 })
                    .options(unique())
                    .build(),
            )
            .await?;

        self.database
            .collection::<mongodb::bson::Document>(CITIES)
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "name_en": 1 })
                    .options(unique())
                    .build(),
            )
            .await?;

        for collection in [OFFERS, PRODUCTS] {
            self.database
                .collection::<mongodb::bson::Document>(collection)
                .create_index(IndexModel::builder().keys(doc! { "seller_id": 1 }).build())
                .await?;
        }

        Ok(())
    }

    /// Drop the whole catalog database.
    pub async fn drop_all(&self) -> AppResult<()> {
        self.database.drop().await?;
        Ok(())
    }
}
