//! One row per offer status history entry, keyed by (offer, position).

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::{DomainError, StatusChange};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "offer_status_changes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub offer_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub position: i32,
    pub status: String,
    pub changed_by: Option<Uuid>,
    pub changed_at: DateTimeUtc,
    pub reason: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::offer::Entity",
        from = "Column::OfferId",
        to = "super::offer::Column::Id",
        on_delete = "Cascade"
    )]
    Offer,
}

impl Related<super::offer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Offer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_status_change(self) -> Result<StatusChange, DomainError> {
        Ok(StatusChange {
            status: self.status.parse()?,
            changed_by: self.changed_by,
            changed_at: self.changed_at,
            reason: self.reason,
        })
    }
}

/// Row for the history entry at `position` of `offer_id`.
pub fn active_model(offer_id: Uuid, position: i32, change: &StatusChange) -> ActiveModel {
    ActiveModel {
        offer_id: Set(offer_id),
        position: Set(position),
        status: Set(change.status.as_str().to_string()),
        changed_by: Set(change.changed_by),
        changed_at: Set(change.changed_at),
        reason: Set(change.reason.clone()),
    }
}
