//! Migration: users, sellers, offers, products and cities.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::IsActive).boolean().not_null().default(true))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Sellers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sellers::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Sellers::UserId).uuid().not_null().unique_key())
                    .col(ColumnDef::new(Sellers::StoreName).string().not_null())
                    .col(ColumnDef::new(Sellers::Street).string().not_null())
                    .col(ColumnDef::new(Sellers::City).string().not_null())
                    .col(ColumnDef::new(Sellers::ZipCode).string().null())
                    .col(ColumnDef::new(Sellers::Country).string().not_null())
                    .col(ColumnDef::new(Sellers::Latitude).double().null())
                    .col(ColumnDef::new(Sellers::Longitude).double().null())
                    .col(ColumnDef::new(Sellers::Description).text().not_null())
                    .col(ColumnDef::new(Sellers::Status).string().not_null())
                    .col(ColumnDef::new(Sellers::RejectionReason).text().null())
                    .to_owned(),
            )
            .await?;

        // No foreign key to sellers: every backend accepts the same writes.
        manager
            .create_table(
                Table::create()
                    .table(Offers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Offers::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Offers::SellerId).uuid().not_null())
                    .col(ColumnDef::new(Offers::Title).string().not_null())
                    .col(ColumnDef::new(Offers::Description).text().not_null())
                    .col(ColumnDef::new(Offers::Category).string().null())
                    .col(ColumnDef::new(Offers::PriceAmount).decimal().not_null())
                    .col(ColumnDef::new(Offers::PriceCurrency).string().not_null())
                    .col(ColumnDef::new(Offers::OriginalPriceAmount).decimal().not_null())
                    .col(ColumnDef::new(Offers::OriginalPriceCurrency).string().not_null())
                    .col(ColumnDef::new(Offers::PictureUrl).string().null())
                    .col(
                        ColumnDef::new(Offers::StartDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Offers::EndDate).timestamp_with_time_zone().null())
                    .col(
                        ColumnDef::new(Offers::ExpirationDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Offers::Status).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_offers_seller_id")
                    .table(Offers::Table)
                    .col(Offers::SellerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Products::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Products::SellerId).uuid().not_null())
                    .col(ColumnDef::new(Products::Name).string().not_null())
                    .col(ColumnDef::new(Products::Description).text().not_null())
                    .col(ColumnDef::new(Products::PriceAmount).decimal().not_null())
                    .col(ColumnDef::new(Products::PriceCurrency).string().not_null())
                    .col(ColumnDef::new(Products::Category).string().null())
                    .col(
                        ColumnDef::new(Products::IsAvailable)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_seller_id")
                    .table(Products::Table)
                    .col(Products::SellerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Cities::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Cities::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Cities::NameFr).string().not_null())
                    .col(ColumnDef::new(Cities::NameAr).string().not_null())
                    .col(ColumnDef::new(Cities::NameEn).string().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Cities::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Offers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sellers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Email,
    PasswordHash,
    Role,
    IsActive,
}

#[derive(Iden)]
enum Sellers {
    Table,
    Id,
    UserId,
    StoreName,
    Street,
    City,
    ZipCode,
    Country,
    Latitude,
    Longitude,
    Description,
    Status,
    RejectionReason,
}

#[derive(Iden)]
pub(super) enum Offers {
    Table,
    Id,
    SellerId,
    Title,
    Description,
    Category,
    PriceAmount,
    PriceCurrency,
    OriginalPriceAmount,
    OriginalPriceCurrency,
    PictureUrl,
    StartDate,
    EndDate,
    ExpirationDate,
    Status,
}

#[derive(Iden)]
enum Products {
    Table,
    Id,
    SellerId,
    Name,
    Description,
    PriceAmount,
    PriceCurrency,
    Category,
    IsAvailable,
}

#[derive(Iden)]
enum Cities {
    Table,
    Id,
    NameFr,
    NameAr,
    NameEn,
}
