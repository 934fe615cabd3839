use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use super::{in_transaction, write_error};
use crate::repository::contracts::{sort_offers, OfferRepository};
use crate::repository::entities::offer::{self, ActiveModel, Entity as OfferEntity};
use crate::repository::entities::offer_status_change::{
    self, active_model as history_row, Entity as StatusChangeEntity,
};
use common::AppResult;
use domain::Offer;

/// `offers` plus `offer_status_changes` access.
///
/// An offer and its history are always written in the same transaction.
pub struct OfferStore {
    db: DatabaseConnection,
}

impl OfferStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn rebuild(rows: Vec<(offer::Model, Vec<offer_status_change::Model>)>) -> AppResult<Vec<Offer>> {
    let mut offers = rows
        .into_iter()
        .map(|(model, history)| model.into_offer(history))
        .collect::<Result<Vec<_>, _>>()?;
    sort_offers(&mut offers);
    Ok(offers)
}

fn upsert_offer_row(offer: &Offer) -> sea_orm::Insert<ActiveModel> {
    OfferEntity::insert(ActiveModel::from(offer)).on_conflict(
        OnConflict::column(offer::Column::Id)
            .update_columns([
                offer::Column::SellerId,
                offer::Column::Title,
                offer::Column::Description,
                offer::Column::Category,
                offer::Column::PriceAmount,
                offer::Column::PriceCurrency,
                offer::Column::OriginalPriceAmount,
                offer::Column::OriginalPriceCurrency,
                offer::Column::PictureUrl,
                offer::Column::StartDate,
                offer::Column::EndDate,
                offer::Column::ExpirationDate,
                offer::Column::Status,
            ])
            .to_owned(),
    )
}

/// Bring the stored history of `offer` in line with the one it holds.
///
/// In the usual case the stored history is a prefix of the new one and only
/// the missing tail is inserted.
async fn sync_history<C: ConnectionTrait>(db: &C, offer: &Offer) -> AppResult<()> {
    let stored = StatusChangeEntity::find()
        .filter(offer_status_change::Column::OfferId.eq(offer.id()))
        .order_by_asc(offer_status_change::Column::Position)
        .all(db)
        .await?;

    let changed: Vec<offer_status_change::ActiveModel> = offer
        .status_history()
        .iter()
        .enumerate()
        .filter(|(position, held)| match stored.get(*position) {
            Some(row) => {
                row.status != held.status.as_str()
                    || row.changed_by != held.changed_by
                    || row.changed_at != held.changed_at
                    || row.reason != held.reason
            }
            None => true,
        })
        .map(|(position, change)| history_row(offer.id(), position as i32, change))
        .collect();

    if !changed.is_empty() {
        StatusChangeEntity::insert_many(changed)
            .on_conflict(
                OnConflict::columns([
                    offer_status_change::Column::OfferId,
                    offer_status_change::Column::Position,
                ])
                .update_columns([
                    offer_status_change::Column::Status,
                    offer_status_change::Column::ChangedBy,
                    offer_status_change::Column::ChangedAt,
                    offer_status_change::Column::Reason,
                ])
                .to_owned(),
            )
            .exec_without_returning(db)
            .await?;
    }

    let held = offer.status_history().len();
    if stored.len() > held {
        StatusChangeEntity::delete_many()
            .filter(offer_status_change::Column::OfferId.eq(offer.id()))
            .filter(offer_status_change::Column::Position.gte(held as i32))
            .exec(db)
            .await?;
    }

    Ok(())
}

#[async_trait]
impl OfferRepository for OfferStore {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Offer>> {
        let rows = OfferEntity::find_by_id(id)
            .find_with_related(StatusChangeEntity)
            .all(&self.db)
            .await?;
        Ok(rebuild(rows)?.into_iter().next())
    }

    async fn get_by_seller_id(&self, seller_id: Uuid) -> AppResult<Vec<Offer>> {
        let rows = OfferEntity::find()
            .filter(offer::Column::SellerId.eq(seller_id))
            .find_with_related(StatusChangeEntity)
            .all(&self.db)
            .await?;
        rebuild(rows)
    }

    async fn add(&self, offer: &Offer) -> AppResult<()> {
        let offer = offer.clone();
        in_transaction(&self.db, move |txn| {
            Box::pin(async move {
                OfferEntity::insert(ActiveModel::from(&offer))
                    .exec_without_returning(txn)
                    .await
                    .map_err(write_error("Offer"))?;
                sync_history(txn, &offer).await
            })
        })
        .await
    }

    async fn update(&self, offer: &Offer) -> AppResult<()> {
        let offer = offer.clone();
        in_transaction(&self.db, move |txn| {
            Box::pin(async move {
                upsert_offer_row(&offer)
                    .exec_without_returning(txn)
                    .await
                    .map_err(write_error("Offer"))?;
                sync_history(txn, &offer).await
            })
        })
        .await
    }

    async fn list(&self) -> AppResult<Vec<Offer>> {
        let rows = OfferEntity::find()
            .find_with_related(StatusChangeEntity)
            .all(&self.db)
            .await?;
        rebuild(rows)
    }
}
