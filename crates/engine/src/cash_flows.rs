//! The module contains the representation of a ledger entry.

use chrono::{DateTime, Utc};
use sea_orm::{FromQueryResult, entity::prelude::*};

use crate::Amount;

/// A cash flow: one ledger entry.
///
/// The entry references a [`Status`], a [`CashFlowType`] and a
/// [`Subcategory`]. The category is not stored on the entry, it is always the
/// category of the subcategory. Names of every referenced row are carried
/// along so callers do not need extra lookups.
///
/// `created_at` is assigned once by the engine when the entry is created.
///
///  [`Status`]: crate::Status
///  [`CashFlowType`]: crate::CashFlowType
///  [`Subcategory`]: crate::Subcategory
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CashFlow {
    pub id: i32,
    pub status_id: i32,
    pub status_name: String,
    pub cash_flow_type_id: i32,
    pub cash_flow_type_name: String,
    pub category_id: i32,
    pub category_name: String,
    pub subcategory_id: i32,
    pub subcategory_name: String,
    pub amount: Amount,
    pub created_at: DateTime<Utc>,
    pub comment: String,
}

/// A cash flow joined with the names of its taxonomy.
#[derive(Debug, FromQueryResult)]
pub(crate) struct CashFlowRow {
    pub id: i32,
    pub status_id: i32,
    pub status_name: String,
    pub cash_flow_type_id: i32,
    pub cash_flow_type_name: String,
    pub category_id: i32,
    pub category_name: String,
    pub subcategory_id: i32,
    pub subcategory_name: String,
    pub amount_minor: i64,
    pub created_at: DateTimeUtc,
    pub comment: String,
}

impl From<CashFlowRow> for CashFlow {
    fn from(value: CashFlowRow) -> Self {
        Self {
            id: value.id,
            status_id: value.status_id,
            status_name: value.status_name,
            cash_flow_type_id: value.cash_flow_type_id,
            cash_flow_type_name: value.cash_flow_type_name,
            category_id: value.category_id,
            category_name: value.category_name,
            subcategory_id: value.subcategory_id,
            subcategory_name: value.subcategory_name,
            amount: Amount::new(value.amount_minor),
            created_at: value.created_at,
            comment: value.comment,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cash_flows")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub status_id: i32,
    pub cash_flow_type_id: i32,
    pub subcategory_id: i32,
    pub amount_minor: i64,
    pub created_at: DateTimeUtc,
    pub comment: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::statuses::Entity",
        from = "Column::StatusId",
        to = "super::statuses::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Status,
    #[sea_orm(
        belongs_to = "super::cash_flow_types::Entity",
        from = "Column::CashFlowTypeId",
        to = "super::cash_flow_types::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    CashFlowType,
    #[sea_orm(
        belongs_to = "super::subcategories::Entity",
        from = "Column::SubcategoryId",
        to = "super::subcategories::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Subcategory,
}

impl Related<super::statuses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Status.def()
    }
}

impl Related<super::cash_flow_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashFlowType.def()
    }
}

impl Related<super::subcategories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subcategory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
