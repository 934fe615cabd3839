//! Migration: one reference city per English name.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_cities_name_en")
                    .table(Cities::Table)
                    .col(Cities::NameEn)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_cities_name_en")
                    .table(Cities::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum Cities {
    Table,
    NameEn,
}
