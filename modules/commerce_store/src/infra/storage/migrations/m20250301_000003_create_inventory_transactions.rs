use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InventoryTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InventoryTransactions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(InventoryTransactions::TenantId).uuid().not_null())
                    .col(ColumnDef::new(InventoryTransactions::ProductId).uuid().not_null())
                    .col(
                        ColumnDef::new(InventoryTransactions::QuantityDelta)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(InventoryTransactions::Reason).string().not_null())
                    .col(ColumnDef::new(InventoryTransactions::OrderId).uuid())
                    .col(
                        ColumnDef::new(InventoryTransactions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventory_transactions_product")
                            .from(InventoryTransactions::Table, InventoryTransactions::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventory_transactions_order")
                            .from(InventoryTransactions::Table, InventoryTransactions::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_inventory_transactions_product_id")
                    .table(InventoryTransactions::Table)
                    .col(InventoryTransactions::ProductId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InventoryTransactions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum InventoryTransactions {
    Table,
    Id,
    TenantId,
    ProductId,
    QuantityDelta,
    Reason,
    OrderId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Orders {
    Table,
    Id,
}
