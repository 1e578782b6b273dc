//! Restrict-on-delete checks.
//!
//! Every taxonomy row is deletable only while nothing references it. The
//! schema enforces the same rule with `ON DELETE RESTRICT`; these checks run
//! first so callers get an [`EngineError::IntegrityConflict`] naming the
//! referencing rows instead of a raw database error.

use sea_orm::{ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter};

use crate::{EngineError, ResultEngine, cash_flows, categories, subcategories};

async fn ensure_unreferenced<E>(
    db_tx: &DatabaseTransaction,
    column: E::Column,
    id: i32,
    target: &str,
    referrers: &str,
) -> ResultEngine<()>
where
    E: EntityTrait,
{
    let referenced = E::find()
        .filter(column.eq(id))
        .one(db_tx)
        .await?
        .is_some();
    if referenced {
        return Err(EngineError::IntegrityConflict(format!(
            "cannot delete {target} {id}: it is referenced by existing {referrers}"
        )));
    }
    Ok(())
}

/// A status is referenced by cash flows.
pub(super) async fn ensure_status_deletable(
    db_tx: &DatabaseTransaction,
    id: i32,
) -> ResultEngine<()> {
    ensure_unreferenced::<cash_flows::Entity>(
        db_tx,
        cash_flows::Column::StatusId,
        id,
        "status",
        "cash flows",
    )
    .await
}

/// A cash flow type is referenced by categories and by cash flows.
pub(super) async fn ensure_cash_flow_type_deletable(
    db_tx: &DatabaseTransaction,
    id: i32,
) -> ResultEngine<()> {
    ensure_unreferenced::<categories::Entity>(
        db_tx,
        categories::Column::CashFlowTypeId,
        id,
        "cash flow type",
        "categories",
    )
    .await?;
    ensure_unreferenced::<cash_flows::Entity>(
        db_tx,
        cash_flows::Column::CashFlowTypeId,
        id,
        "cash flow type",
        "cash flows",
    )
    .await
}

/// A category is referenced by subcategories.
pub(super) async fn ensure_category_deletable(
    db_tx: &DatabaseTransaction,
    id: i32,
) -> ResultEngine<()> {
    ensure_unreferenced::<subcategories::Entity>(
        db_tx,
        subcategories::Column::CategoryId,
        id,
        "category",
        "subcategories",
    )
    .await
}

/// A subcategory is referenced by cash flows.
pub(super) async fn ensure_subcategory_deletable(
    db_tx: &DatabaseTransaction,
    id: i32,
) -> ResultEngine<()> {
    ensure_unreferenced::<cash_flows::Entity>(
        db_tx,
        cash_flows::Column::SubcategoryId,
        id,
        "subcategory",
        "cash flows",
    )
    .await
}
