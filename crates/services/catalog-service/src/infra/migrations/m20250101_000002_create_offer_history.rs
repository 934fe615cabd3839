//! Migration: offer status history, one row per entry.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_catalog_tables::Offers;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OfferStatusChanges::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(OfferStatusChanges::OfferId).uuid().not_null())
                    .col(ColumnDef::new(OfferStatusChanges::Position).integer().not_null())
                    .col(ColumnDef::new(OfferStatusChanges::Status).string().not_null())
                    .col(ColumnDef::new(OfferStatusChanges::ChangedBy).uuid().null())
                    .col(
                        ColumnDef::new(OfferStatusChanges::ChangedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(OfferStatusChanges::Reason).text().null())
                    .primary_key(
                        Index::create()
                            .col(OfferStatusChanges::OfferId)
                            .col(OfferStatusChanges::Position),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_offer_status_changes_offer")
                            .from(OfferStatusChanges::Table, OfferStatusChanges::OfferId)
                            .to(Offers::Table, Offers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OfferStatusChanges::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum OfferStatusChanges {
    Table,
    OfferId,
    Position,
    Status,
    ChangedBy,
    ChangedAt,
    Reason,
}
