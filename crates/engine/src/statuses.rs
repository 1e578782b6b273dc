//! The module contains the `Status` of a ledger entry.

use sea_orm::entity::prelude::*;

/// Workflow state of a ledger entry (e.g. "Planned", "Paid").
///
/// Statuses are independent of the cash flow taxonomy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Status {
    pub id: i32,
    pub name: String,
}

impl From<Model> for Status {
    fn from(value: Model) -> Self {
        Self {
            id: value.id,
            name: value.name,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "statuses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::cash_flows::Entity")]
    CashFlows,
}

impl Related<super::cash_flows::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashFlows.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
