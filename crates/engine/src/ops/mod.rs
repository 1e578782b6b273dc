use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    PaginatorTrait, PrimaryKeyTrait, QueryFilter, SelectorTrait,
};

use crate::{
    FieldErrors, Page, PageRequest, Pagination, ResultEngine,
    util::{REQUIRED, does_not_exist},
};

mod cash_flows;
mod guards;
mod list;
mod taxonomy;

pub use list::{
    CashFlowFilter, CashFlowFilterParams, CashFlowOrderField, CashFlowOrdering, CreatedAtBound,
};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Whether a write replaces every writable field or only the provided ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteMode {
    /// Create or full update: required fields must be present.
    Full,
    /// Partial update: missing fields keep their stored value.
    Partial,
}

/// Writable fields of a status or a cash flow type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameInput {
    pub name: Option<String>,
}

/// Writable fields of a category.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryInput {
    pub name: Option<String>,
    pub cash_flow_type: Option<i32>,
}

/// Writable fields of a subcategory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubcategoryInput {
    pub name: Option<String>,
    pub category: Option<i32>,
}

/// Writable fields of a cash flow.
///
/// `category` is never stored. When present it must match the subcategory's
/// category, see [`Engine::create_cash_flow`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CashFlowInput {
    pub status: Option<i32>,
    pub cash_flow_type: Option<i32>,
    pub category: Option<i32>,
    pub subcategory: Option<i32>,
    /// Decimal string, parsed and checked by the engine.
    pub amount: Option<String>,
    pub comment: Option<String>,
}

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    pagination: Pagination,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Page size policy used by every listing.
    pub fn pagination(&self) -> Pagination {
        self.pagination
    }
}

/// Run `query` through sea-orm's paginator and wrap the requested page.
async fn fetch_page<'db, C, P>(
    query: P,
    db: &'db C,
    request: PageRequest,
) -> ResultEngine<Page<<P::Selector as SelectorTrait>::Item>>
where
    C: ConnectionTrait,
    P: PaginatorTrait<'db, C>,
{
    let paginator = query.paginate(db, request.page_size);
    let totals = paginator.num_items_and_pages().await?;
    request.ensure_within(totals.number_of_pages)?;
    let items = paginator.fetch_page(request.index()).await?;

    Ok(Page {
        items,
        count: totals.number_of_items,
        page: request.page,
        num_pages: totals.number_of_pages,
    })
}

/// Load a referenced row, recording a field error when it does not exist.
async fn lookup<E>(
    db_tx: &DatabaseTransaction,
    field: &str,
    id: i32,
    errors: &mut FieldErrors,
) -> ResultEngine<Option<E::Model>>
where
    E: EntityTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
{
    let model = E::find_by_id(id).one(db_tx).await?;
    if model.is_none() {
        errors.add(field, does_not_exist(id));
    }
    Ok(model)
}

/// Pick the value a write ends up with: the provided one, else the stored
/// one on partial updates. Records `required` when neither exists in full
/// writes.
fn resolve_field<T>(
    provided: Option<T>,
    stored: Option<T>,
    mode: WriteMode,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<T> {
    match (provided, mode) {
        (Some(value), _) => Some(value),
        (None, WriteMode::Partial) if stored.is_some() => stored,
        (None, _) => {
            errors.add(field, REQUIRED);
            None
        }
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    pagination: Pagination,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Override the default page size policy.
    pub fn pagination(mut self, pagination: Pagination) -> EngineBuilder {
        self.pagination = pagination;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            pagination: self.pagination,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_field_prefers_provided_value() {
        let mut errors = FieldErrors::new();
        let value = resolve_field(Some(2), Some(1), WriteMode::Partial, "status", &mut errors);
        assert_eq!(value, Some(2));
        assert!(errors.is_empty());
    }

    #[test]
    fn resolve_field_keeps_stored_value_on_partial_update() {
        let mut errors = FieldErrors::new();
        let value = resolve_field(None, Some(1), WriteMode::Partial, "status", &mut errors);
        assert_eq!(value, Some(1));
        assert!(errors.is_empty());
    }

    #[test]
    fn resolve_field_requires_value_on_full_write() {
        let mut errors = FieldErrors::new();
        let value = resolve_field::<i32>(None, Some(1), WriteMode::Full, "status", &mut errors);
        assert_eq!(value, None);
        assert_eq!(
            errors.get("status"),
            Some(&["This field is required.".to_string()][..])
        );
    }
}
