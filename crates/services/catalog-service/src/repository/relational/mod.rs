//! PostgreSQL storage backend on SeaORM.

mod city_store;
mod offer_store;
mod product_store;
mod seller_store;
mod user_store;

use std::future::Future;
use std::pin::Pin;

use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, DbErr, IsolationLevel, TransactionTrait,
};

use common::{AppError, AppResult};

pub use city_store::CityStore;
pub use offer_store::OfferStore;
pub use product_store::ProductStore;
pub use seller_store::SellerStore;
pub use user_store::UserStore;

/// Convert a write error, naming the entity when a unique key was violated.
fn write_error(entity: &'static str) -> impl Fn(DbErr) -> AppError {
    move |err| match AppError::from(err) {
        AppError::Conflict(_) => AppError::conflict(entity),
        other => other,
    }
}

/// Run `f` inside a read-committed transaction.
///
/// The transaction is committed when `f` succeeds and rolled back otherwise.
async fn in_transaction<F, T>(db: &DatabaseConnection, f: F) -> AppResult<T>
where
    F: for<'a> FnOnce(
            &'a DatabaseTransaction,
        ) -> Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>
        + Send,
    T: Send,
{
    let txn = db
        .begin_with_config(
            Some(IsolationLevel::ReadCommitted),
            Some(AccessMode::ReadWrite),
        )
        .await?;

    match f(&txn).await {
        Ok(result) => {
            txn.commit().await?;
            Ok(result)
        }
        Err(e) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::error!("Transaction rollback failed: {}", rollback_err);
            }
            Err(e)
        }
    }
}
