//! Taxonomy tables.
//!
//! - `statuses`: workflow state of a ledger entry
//! - `cash_flow_types`: top-level classification (income, expense, ...)
//! - `categories`: belong to a cash flow type
//! - `subcategories`: belong to a category
//!
//! Every foreign key is `ON DELETE RESTRICT`.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const NAME_MAX_LEN: u32 = 100;

#[derive(Iden)]
enum Statuses {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum CashFlowTypes {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
    Name,
    CashFlowTypeId,
}

#[derive(Iden)]
enum Subcategories {
    Table,
    Id,
    Name,
    CategoryId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Statuses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Statuses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Statuses::Name)
                            .string_len(NAME_MAX_LEN)
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CashFlowTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CashFlowTypes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CashFlowTypes::Name)
                            .string_len(NAME_MAX_LEN)
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Categories::Name)
                            .string_len(NAME_MAX_LEN)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Categories::CashFlowTypeId)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-categories-cash_flow_type_id")
                            .from(Categories::Table, Categories::CashFlowTypeId)
                            .to(CashFlowTypes::Table, CashFlowTypes::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-categories-cash_flow_type_id")
                    .table(Categories::Table)
                    .col(Categories::CashFlowTypeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Subcategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subcategories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Subcategories::Name)
                            .string_len(NAME_MAX_LEN)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Subcategories::CategoryId)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-subcategories-category_id")
                            .from(Subcategories::Table, Subcategories::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-subcategories-category_id")
                    .table(Subcategories::Table)
                    .col(Subcategories::CategoryId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Subcategories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CashFlowTypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Statuses::Table).to_owned())
            .await
    }
}
