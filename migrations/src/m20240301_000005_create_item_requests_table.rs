use sea_orm_migration::prelude::*;

use crate::m20240301_000001_create_stores_table::Stores;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ItemRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ItemRequests::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    // Free text: the requested item does not exist yet
                    .col(ColumnDef::new(ItemRequests::ItemName).string().not_null())
                    .col(ColumnDef::new(ItemRequests::StoreId).uuid().not_null())
                    .col(
                        ColumnDef::new(ItemRequests::PickUpTime)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ItemRequests::CustomerName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ItemRequests::CustomerPhone)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ItemRequests::CustomerEmail).string().null())
                    .col(
                        ColumnDef::new(ItemRequests::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ItemRequests::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_item_requests_store_id")
                            .from(ItemRequests::Table, ItemRequests::StoreId)
                            .to(Stores::Table, Stores::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ItemRequests::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ItemRequests {
    Table,
    Id,
    ItemName,
    StoreId,
    PickUpTime,
    CustomerName,
    CustomerPhone,
    CustomerEmail,
    CreatedAt,
    UpdatedAt,
}
