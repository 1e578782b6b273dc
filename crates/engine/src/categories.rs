//! The module contains `Category`, the second level of the taxonomy.

use sea_orm::entity::prelude::*;

/// A category, always nested under one cash flow type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub cash_flow_type_id: i32,
    /// Name of the parent cash flow type, read-only.
    pub cash_flow_type_name: String,
}

impl Category {
    pub(crate) fn from_models(model: Model, cash_flow_type: super::cash_flow_types::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            cash_flow_type_id: model.cash_flow_type_id,
            cash_flow_type_name: cash_flow_type.name,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub cash_flow_type_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cash_flow_types::Entity",
        from = "Column::CashFlowTypeId",
        to = "super::cash_flow_types::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    CashFlowType,
    #[sea_orm(has_many = "super::subcategories::Entity")]
    Subcategories,
}

impl Related<super::cash_flow_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashFlowType.def()
    }
}

impl Related<super::subcategories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subcategories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
