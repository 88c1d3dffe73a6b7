use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Admins::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Admins::Id).uuid().primary_key().not_null())
                    .col(
                        ColumnDef::new(Admins::Role)
                            .string()
                            .not_null()
                            .default("admin"),
                    )
                    // Unique by convention in the original data model; enforced here
                    .col(
                        ColumnDef::new(Admins::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Admins::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Admins::Phone).string().null())
                    .col(ColumnDef::new(Admins::FirstName).string().null())
                    .col(ColumnDef::new(Admins::LastName).string().null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Admins::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Admins {
    Table,
    Id,
    Role,
    Email,
    PasswordHash,
    Phone,
    FirstName,
    LastName,
}
