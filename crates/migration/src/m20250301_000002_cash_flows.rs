//! Ledger table.
//!
//! `cash_flows` references a status, a cash flow type and a subcategory. The
//! category is not stored: it is always read through the subcategory.
//! Amounts are integer cents.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum CashFlows {
    Table,
    Id,
    StatusId,
    CashFlowTypeId,
    SubcategoryId,
    AmountMinor,
    CreatedAt,
    Comment,
}

#[derive(Iden)]
enum Statuses {
    Table,
    Id,
}

#[derive(Iden)]
enum CashFlowTypes {
    Table,
    Id,
}

#[derive(Iden)]
enum Subcategories {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CashFlows::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CashFlows::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CashFlows::StatusId).integer().not_null())
                    .col(
                        ColumnDef::new(CashFlows::CashFlowTypeId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CashFlows::SubcategoryId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CashFlows::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CashFlows::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CashFlows::Comment)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .check(Expr::col(CashFlows::AmountMinor).gt(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-cash_flows-status_id")
                            .from(CashFlows::Table, CashFlows::StatusId)
                            .to(Statuses::Table, Statuses::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-cash_flows-cash_flow_type_id")
                            .from(CashFlows::Table, CashFlows::CashFlowTypeId)
                            .to(CashFlowTypes::Table, CashFlowTypes::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-cash_flows-subcategory_id")
                            .from(CashFlows::Table, CashFlows::SubcategoryId)
                            .to(Subcategories::Table, Subcategories::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-cash_flows-created_at")
                    .table(CashFlows::Table)
                    .col(CashFlows::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-cash_flows-status_id")
                    .table(CashFlows::Table)
                    .col(CashFlows::StatusId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-cash_flows-subcategory_id")
                    .table(CashFlows::Table)
                    .col(CashFlows::SubcategoryId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CashFlows::Table).to_owned())
            .await
    }
}
