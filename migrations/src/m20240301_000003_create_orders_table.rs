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
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Orders::Id).uuid().primary_key().not_null())
                    // Three letters + three digits; no unique constraint, the
                    // UUID primary key is the real identity
                    .col(ColumnDef::new(Orders::OrderNo).string().not_null())
                    .col(ColumnDef::new(Orders::StoreId).uuid().not_null())
                    .col(ColumnDef::new(Orders::PickUpTime).timestamp().not_null())
                    .col(ColumnDef::new(Orders::CustomerName).string().not_null())
                    .col(ColumnDef::new(Orders::CustomerPhone).string().not_null())
                    .col(ColumnDef::new(Orders::CustomerEmail).string().null())
                    .col(ColumnDef::new(Orders::Status).string().null())
                    .col(ColumnDef::new(Orders::TotalAmount).decimal().not_null())
                    .col(ColumnDef::new(Orders::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Orders::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_store_id")
                            .from(Orders::Table, Orders::StoreId)
                            .to(Stores::Table, Stores::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_orders_store_id")
                    .table(Orders::Table)
                    .col(Orders::StoreId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Orders {
    Table,
    Id,
    OrderNo,
    StoreId,
    PickUpTime,
    CustomerName,
    CustomerPhone,
    CustomerEmail,
    Status,
    TotalAmount,
    CreatedAt,
    UpdatedAt,
}
