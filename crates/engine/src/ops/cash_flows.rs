use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, JoinType, QuerySelect, Select, TransactionTrait, prelude::*,
};

use crate::{
    Amount, CashFlow, EngineError, FieldErrors, Page, PageRequest, ResultEngine, cash_flow_types,
    cash_flows::{self, CashFlowRow},
    categories, statuses, subcategories,
    util::{REQUIRED, normalize_comment},
    validation::{CategoryRef, Classification, check_classification, parse_amount},
};

use super::{
    CashFlowFilter, CashFlowInput, CashFlowOrdering, Engine, WriteMode, fetch_page, lookup,
    resolve_field,
    list::{ApplyCashFlowFilters, ApplyCashFlowOrdering},
    with_tx,
};

const ENTITY: &str = "cash flow";

/// A cash flow write that passed validation.
struct ValidCashFlow {
    status_id: i32,
    cash_flow_type_id: i32,
    subcategory_id: i32,
    amount: Amount,
    comment: String,
}

impl From<&categories::Model> for CategoryRef {
    fn from(value: &categories::Model) -> Self {
        Self {
            id: value.id,
            cash_flow_type_id: value.cash_flow_type_id,
        }
    }
}

/// Cash flows joined with the names of their taxonomy, one row per entry.
fn joined_query() -> Select<cash_flows::Entity> {
    cash_flows::Entity::find()
        .select_only()
        .column(cash_flows::Column::Id)
        .column(cash_flows::Column::StatusId)
        .column_as(statuses::Column::Name, "status_name")
        .column(cash_flows::Column::CashFlowTypeId)
        .column_as(cash_flow_types::Column::Name, "cash_flow_type_name")
        .column_as(categories::Column::Id, "category_id")
        .column_as(categories::Column::Name, "category_name")
        .column(cash_flows::Column::SubcategoryId)
        .column_as(subcategories::Column::Name, "subcategory_name")
        .column(cash_flows::Column::AmountMinor)
        .column(cash_flows::Column::CreatedAt)
        .column(cash_flows::Column::Comment)
        .join(JoinType::InnerJoin, cash_flows::Relation::Status.def())
        .join(JoinType::InnerJoin, cash_flows::Relation::CashFlowType.def())
        .join(JoinType::InnerJoin, cash_flows::Relation::Subcategory.def())
        .join(JoinType::InnerJoin, subcategories::Relation::Category.def())
}

impl Engine {
    /// Lists cash flows matching `filter`, sorted by `orderings`.
    ///
    /// Ties are always broken by id, newest first, so pagination is stable.
    pub async fn list_cash_flows(
        &self,
        filter: &CashFlowFilter,
        orderings: &[CashFlowOrdering],
        request: PageRequest,
    ) -> ResultEngine<Page<CashFlow>> {
        with_tx!(self, |db_tx| {
            let query = joined_query()
                .apply_cash_flow_filters(filter)
                .apply_cash_flow_ordering(orderings)
                .into_model::<CashFlowRow>();
            let page = fetch_page(query, &db_tx, request).await?;
            Ok(page.map(CashFlow::from))
        })
    }

    pub async fn cash_flow(&self, id: i32) -> ResultEngine<CashFlow> {
        with_tx!(self, |db_tx| { Self::load_cash_flow(&db_tx, id).await })
    }

    /// Records a new cash flow. `created_at` is set to the current time.
    ///
    /// `category` is optional: when given, the subcategory must belong to it;
    /// either way the category must belong to the cash flow type.
    pub async fn create_cash_flow(&self, input: CashFlowInput) -> ResultEngine<CashFlow> {
        with_tx!(self, |db_tx| {
            let valid = Self::validate_cash_flow(&db_tx, input, None, WriteMode::Full).await?;
            let model = cash_flows::ActiveModel {
                status_id: ActiveValue::Set(valid.status_id),
                cash_flow_type_id: ActiveValue::Set(valid.cash_flow_type_id),
                subcategory_id: ActiveValue::Set(valid.subcategory_id),
                amount_minor: ActiveValue::Set(valid.amount.cents()),
                created_at: ActiveValue::Set(Utc::now()),
                comment: ActiveValue::Set(valid.comment),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;
            tracing::debug!(id = model.id, amount = %valid.amount, "cash flow created");
            Self::load_cash_flow(&db_tx, model.id).await
        })
    }

    /// Updates a cash flow. `created_at` never changes; an omitted comment
    /// keeps its stored value.
    pub async fn update_cash_flow(
        &self,
        id: i32,
        input: CashFlowInput,
        mode: WriteMode,
    ) -> ResultEngine<CashFlow> {
        with_tx!(self, |db_tx| {
            let existing = cash_flows::Entity::find_by_id(id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("{ENTITY} {id}")))?;
            let valid = Self::validate_cash_flow(&db_tx, input, Some(&existing), mode).await?;

            let mut active: cash_flows::ActiveModel = existing.into();
            active.status_id = ActiveValue::Set(valid.status_id);
            active.cash_flow_type_id = ActiveValue::Set(valid.cash_flow_type_id);
            active.subcategory_id = ActiveValue::Set(valid.subcategory_id);
            active.amount_minor = ActiveValue::Set(valid.amount.cents());
            active.comment = ActiveValue::Set(valid.comment);
            active.update(&db_tx).await?;
            Self::load_cash_flow(&db_tx, id).await
        })
    }

    pub async fn delete_cash_flow(&self, id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let result = cash_flows::Entity::delete_by_id(id).exec(&db_tx).await?;
            if result.rows_affected == 0 {
                return Err(EngineError::KeyNotFound(format!("{ENTITY} {id}")));
            }
            tracing::debug!(id, "cash flow deleted");
            Ok(())
        })
    }

    async fn load_cash_flow(db_tx: &DatabaseTransaction, id: i32) -> ResultEngine<CashFlow> {
        joined_query()
            .filter(cash_flows::Column::Id.eq(id))
            .into_model::<CashFlowRow>()
            .one(db_tx)
            .await?
            .map(CashFlow::from)
            .ok_or_else(|| EngineError::KeyNotFound(format!("{ENTITY} {id}")))
    }

    /// Field checks first, every problem collected. The classification check
    /// only runs once each field is valid on its own.
    async fn validate_cash_flow(
        db_tx: &DatabaseTransaction,
        input: CashFlowInput,
        existing: Option<&cash_flows::Model>,
        mode: WriteMode,
    ) -> ResultEngine<ValidCashFlow> {
        let mut errors = FieldErrors::new();

        let status_id = resolve_field(
            input.status,
            existing.map(|model| model.status_id),
            mode,
            "status",
            &mut errors,
        );
        if let Some(id) = status_id {
            lookup::<statuses::Entity>(db_tx, "status", id, &mut errors).await?;
        }

        let cash_flow_type_id = resolve_field(
            input.cash_flow_type,
            existing.map(|model| model.cash_flow_type_id),
            mode,
            "cash_flow_type",
            &mut errors,
        );
        if let Some(id) = cash_flow_type_id {
            lookup::<cash_flow_types::Entity>(db_tx, "cash_flow_type", id, &mut errors).await?;
        }

        let category = match input.category {
            Some(id) => lookup::<categories::Entity>(db_tx, "category", id, &mut errors).await?,
            None => None,
        };

        let subcategory_id = resolve_field(
            input.subcategory,
            existing.map(|model| model.subcategory_id),
            mode,
            "subcategory",
            &mut errors,
        );
        let subcategory = match subcategory_id {
            Some(id) => {
                lookup::<subcategories::Entity>(db_tx, "subcategory", id, &mut errors).await?
            }
            None => None,
        };

        let amount = resolve_field(
            input.amount,
            existing.map(|model| Amount::new(model.amount_minor).to_string()),
            mode,
            "amount",
            &mut errors,
        )
        .and_then(|raw| match parse_amount(&raw) {
            Ok(amount) => Some(amount),
            Err(message) => {
                errors.add("amount", message);
                None
            }
        });

        let comment = match input.comment {
            Some(comment) => normalize_comment(Some(&comment)),
            None => existing
                .map(|model| model.comment.clone())
                .unwrap_or_default(),
        };

        errors.into_result()?;
        // No error recorded means every required field resolved.
        let (Some(status_id), Some(cash_flow_type_id), Some(subcategory), Some(amount)) =
            (status_id, cash_flow_type_id, subcategory, amount)
        else {
            return Err(FieldErrors::single("status", REQUIRED).into());
        };

        let subcategory_category = categories::Entity::find_by_id(subcategory.category_id)
            .one(db_tx)
            .await?
            .ok_or_else(|| {
                EngineError::KeyNotFound(format!("category {}", subcategory.category_id))
            })?;
        check_classification(&Classification {
            cash_flow_type_id,
            category: category.as_ref().map(CategoryRef::from),
            subcategory_category: CategoryRef::from(&subcategory_category),
        })?;

        Ok(ValidCashFlow {
            status_id,
            cash_flow_type_id,
            subcategory_id: subcategory.id,
            amount,
            comment,
        })
    }
}
