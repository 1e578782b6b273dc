//! The module contains `Subcategory`, the leaf of the taxonomy.

use sea_orm::entity::prelude::*;

/// A subcategory, always nested under one category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subcategory {
    pub id: i32,
    pub name: String,
    pub category_id: i32,
    /// Name of the parent category, read-only.
    pub category_name: String,
}

impl Subcategory {
    pub(crate) fn from_models(model: Model, category: super::categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            category_id: model.category_id,
            category_name: category.name,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "subcategories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub category_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Category,
    #[sea_orm(has_many = "super::cash_flows::Entity")]
    CashFlows,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::cash_flows::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashFlows.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
