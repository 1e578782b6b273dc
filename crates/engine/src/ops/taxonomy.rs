//! Operations on the four taxonomy tables.
//!
//! Statuses and cash flow types only carry a name. Categories and
//! subcategories also belong to a parent row, whose name is returned with
//! them. Both shapes are generated by the macros below.

use sea_orm::{
    ActiveValue, DatabaseTransaction, DbErr, QueryOrder, SqlErr, TransactionTrait, prelude::*,
};

use crate::{
    CashFlowType, Category, EngineError, FieldErrors, Page, PageRequest, ResultEngine, Status,
    Subcategory, cash_flow_types, categories, statuses, subcategories,
    util::{REQUIRED, already_exists, validate_name},
};

use super::{
    CategoryInput, Engine, NameInput, SubcategoryInput, WriteMode, fetch_page, guards, lookup,
    resolve_field, with_tx,
};

async fn find_row<E>(
    db_tx: &DatabaseTransaction,
    id: i32,
    entity: &str,
) -> ResultEngine<E::Model>
where
    E: EntityTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
{
    E::find_by_id(id)
        .one(db_tx)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound(format!("{entity} {id}")))
}

/// Resolve the `name` of a write: required on full writes, normalized and
/// unique among the other rows of the table.
///
/// `stored` is the id and name of the row being updated.
async fn checked_name<E>(
    db_tx: &DatabaseTransaction,
    name_column: E::Column,
    id_column: E::Column,
    provided: Option<String>,
    stored: Option<(i32, &str)>,
    mode: WriteMode,
    entity: &str,
    errors: &mut FieldErrors,
) -> ResultEngine<Option<String>>
where
    E: EntityTrait,
{
    let name = resolve_field(
        provided,
        stored.map(|(_, name)| name.to_string()),
        mode,
        "name",
        errors,
    )
    .and_then(|raw| validate_name(&raw, errors));
    let Some(name) = name else {
        return Ok(None);
    };

    let mut query = E::find().filter(name_column.eq(name.as_str()));
    if let Some((id, _)) = stored {
        query = query.filter(id_column.ne(id));
    }
    if query.one(db_tx).await?.is_some() {
        errors.add("name", already_exists(entity));
    }
    Ok(Some(name))
}

/// Map a unique index violation to the same `name` error [`checked_name`]
/// reports. Concurrent writes of one name can both pass the check, the
/// index then rejects the later one.
fn name_taken(err: DbErr, entity: &str) -> EngineError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            FieldErrors::single("name", already_exists(entity)).into()
        }
        _ => EngineError::Database(err),
    }
}

/// Generates the operations of a taxonomy table made of an id and a name.
macro_rules! impl_named_ops {
    (
        $ops:ident,
        table = $module:ident,
        domain = $domain:ident,
        entity = $entity:literal,
        methods = [$list:ident, $get:ident, $create:ident, $update:ident, $delete:ident],
        guard = $guard:path $(,)?
    ) => {
        mod $ops {
            use super::*;

            async fn validate(
                db_tx: &DatabaseTransaction,
                input: NameInput,
                existing: Option<&$module::Model>,
                mode: WriteMode,
            ) -> ResultEngine<String> {
                let mut errors = FieldErrors::new();
                let name = checked_name::<$module::Entity>(
                    db_tx,
                    $module::Column::Name,
                    $module::Column::Id,
                    input.name,
                    existing.map(|model| (model.id, model.name.as_str())),
                    mode,
                    $entity,
                    &mut errors,
                )
                .await?;

                errors.into_result()?;
                name.ok_or_else(|| FieldErrors::single("name", REQUIRED).into())
            }

            impl Engine {
                #[doc = concat!("Lists every ", $entity, " ordered by id.")]
                pub async fn $list(&self, request: PageRequest) -> ResultEngine<Page<$domain>> {
                    with_tx!(self, |db_tx| {
                        let query = $module::Entity::find().order_by_asc($module::Column::Id);
                        let page = fetch_page(query, &db_tx, request).await?;
                        Ok(page.map($domain::from))
                    })
                }

                pub async fn $get(&self, id: i32) -> ResultEngine<$domain> {
                    with_tx!(self, |db_tx| {
                        let model = find_row::<$module::Entity>(&db_tx, id, $entity).await?;
                        Ok($domain::from(model))
                    })
                }

                pub async fn $create(&self, input: NameInput) -> ResultEngine<$domain> {
                    with_tx!(self, |db_tx| {
                        let name = validate(&db_tx, input, None, WriteMode::Full).await?;
                        let model = $module::ActiveModel {
                            name: ActiveValue::Set(name),
                            ..Default::default()
                        }
                        .insert(&db_tx)
                        .await
                        .map_err(|err| name_taken(err, $entity))?;
                        tracing::debug!(id = model.id, "{} created", $entity);
                        Ok($domain::from(model))
                    })
                }

                pub async fn $update(
                    &self,
                    id: i32,
                    input: NameInput,
                    mode: WriteMode,
                ) -> ResultEngine<$domain> {
                    with_tx!(self, |db_tx| {
                        let existing = find_row::<$module::Entity>(&db_tx, id, $entity).await?;
                        let name = validate(&db_tx, input, Some(&existing), mode).await?;
                        let mut active: $module::ActiveModel = existing.into();
                        active.name = ActiveValue::Set(name);
                        let model = active
                            .update(&db_tx)
                            .await
                            .map_err(|err| name_taken(err, $entity))?;
                        Ok($domain::from(model))
                    })
                }

                #[doc = concat!(
                    "Deletes a ", $entity, ". Fails with `IntegrityConflict` while other rows ",
                    "reference it."
                )]
                pub async fn $delete(&self, id: i32) -> ResultEngine<()> {
                    with_tx!(self, |db_tx| {
                        find_row::<$module::Entity>(&db_tx, id, $entity).await?;
                        $guard(&db_tx, id).await?;
                        $module::Entity::delete_by_id(id).exec(&db_tx).await?;
                        tracing::debug!(id, "{} deleted", $entity);
                        Ok(())
                    })
                }
            }
        }
    };
}

/// Generates the operations of a taxonomy table whose rows belong to a
/// parent row. Reads return the parent's name along with the row.
macro_rules! impl_nested_ops {
    (
        $ops:ident,
        table = $module:ident,
        domain = $domain:ident,
        entity = $entity:literal,
        input = $input:ident,
        parent = $parent:ident,
        parent_entity = $parent_entity:literal,
        parent_field = $parent_field:ident,
        parent_id = $parent_id:ident,
        methods = [$list:ident, $get:ident, $create:ident, $update:ident, $delete:ident],
        guard = $guard:path $(,)?
    ) => {
        mod $ops {
            use super::*;

            struct Valid {
                name: String,
                parent_id: i32,
            }

            fn with_parent(
                (model, parent): ($module::Model, Option<$parent::Model>),
            ) -> ResultEngine<$domain> {
                match parent {
                    Some(parent) => Ok($domain::from_models(model, parent)),
                    None => Err(EngineError::KeyNotFound(format!(
                        "{} {}",
                        $parent_entity, model.$parent_id
                    ))),
                }
            }

            async fn load(db_tx: &DatabaseTransaction, id: i32) -> ResultEngine<$domain> {
                let pair = $module::Entity::find_by_id(id)
                    .find_also_related($parent::Entity)
                    .one(db_tx)
                    .await?
                    .ok_or_else(|| EngineError::KeyNotFound(format!("{} {id}", $entity)))?;
                with_parent(pair)
            }

            async fn validate(
                db_tx: &DatabaseTransaction,
                input: $input,
                existing: Option<&$module::Model>,
                mode: WriteMode,
            ) -> ResultEngine<Valid> {
                let mut errors = FieldErrors::new();
                let name = checked_name::<$module::Entity>(
                    db_tx,
                    $module::Column::Name,
                    $module::Column::Id,
                    input.name,
                    existing.map(|model| (model.id, model.name.as_str())),
                    mode,
                    $entity,
                    &mut errors,
                )
                .await?;

                let field = stringify!($parent_field);
                let parent_id = resolve_field(
                    input.$parent_field,
                    existing.map(|model| model.$parent_id),
                    mode,
                    field,
                    &mut errors,
                );
                if let Some(id) = parent_id {
                    lookup::<$parent::Entity>(db_tx, field, id, &mut errors).await?;
                }

                errors.into_result()?;
                // No error recorded means both fields resolved.
                match (name, parent_id) {
                    (Some(name), Some(parent_id)) => Ok(Valid { name, parent_id }),
                    _ => Err(FieldErrors::single("name", REQUIRED).into()),
                }
            }

            impl Engine {
                #[doc = concat!(
                    "Lists every ", $entity, " ordered by id, with the name of its ",
                    $parent_entity, "."
                )]
                pub async fn $list(&self, request: PageRequest) -> ResultEngine<Page<$domain>> {
                    with_tx!(self, |db_tx| {
                        let query = $module::Entity::find()
                            .find_also_related($parent::Entity)
                            .order_by_asc($module::Column::Id);
                        let page = fetch_page(query, &db_tx, request).await?;
                        page.try_map(with_parent)
                    })
                }

                pub async fn $get(&self, id: i32) -> ResultEngine<$domain> {
                    with_tx!(self, |db_tx| { load(&db_tx, id).await })
                }

                pub async fn $create(&self, input: $input) -> ResultEngine<$domain> {
                    with_tx!(self, |db_tx| {
                        let valid = validate(&db_tx, input, None, WriteMode::Full).await?;
                        let model = $module::ActiveModel {
                            name: ActiveValue::Set(valid.name),
                            $parent_id: ActiveValue::Set(valid.parent_id),
                            ..Default::default()
                        }
                        .insert(&db_tx)
                        .await
                        .map_err(|err| name_taken(err, $entity))?;
                        tracing::debug!(id = model.id, "{} created", $entity);
                        load(&db_tx, model.id).await
                    })
                }

                pub async fn $update(
                    &self,
                    id: i32,
                    input: $input,
                    mode: WriteMode,
                ) -> ResultEngine<$domain> {
                    with_tx!(self, |db_tx| {
                        let existing = find_row::<$module::Entity>(&db_tx, id, $entity).await?;
                        let valid = validate(&db_tx, input, Some(&existing), mode).await?;

                        let mut active: $module::ActiveModel = existing.into();
                        active.name = ActiveValue::Set(valid.name);
                        active.$parent_id = ActiveValue::Set(valid.parent_id);
                        active
                            .update(&db_tx)
                            .await
                            .map_err(|err| name_taken(err, $entity))?;
                        load(&db_tx, id).await
                    })
                }

                #[doc = concat!(
                    "Deletes a ", $entity, ". Fails with `IntegrityConflict` while other rows ",
                    "reference it."
                )]
                pub async fn $delete(&self, id: i32) -> ResultEngine<()> {
                    with_tx!(self, |db_tx| {
                        find_row::<$module::Entity>(&db_tx, id, $entity).await?;
                        $guard(&db_tx, id).await?;
                        $module::Entity::delete_by_id(id).exec(&db_tx).await?;
                        tracing::debug!(id, "{} deleted", $entity);
                        Ok(())
                    })
                }
            }
        }
    };
}

impl_named_ops!(
    status_ops,
    table = statuses,
    domain = Status,
    entity = "status",
    methods = [list_statuses, status, create_status, update_status, delete_status],
    guard = guards::ensure_status_deletable,
);

impl_named_ops!(
    cash_flow_type_ops,
    table = cash_flow_types,
    domain = CashFlowType,
    entity = "cash flow type",
    methods = [
        list_cash_flow_types,
        cash_flow_type,
        create_cash_flow_type,
        update_cash_flow_type,
        delete_cash_flow_type
    ],
    guard = guards::ensure_cash_flow_type_deletable,
);

impl_nested_ops!(
    category_ops,
    table = categories,
    domain = Category,
    entity = "category",
    input = CategoryInput,
    parent = cash_flow_types,
    parent_entity = "cash flow type",
    parent_field = cash_flow_type,
    parent_id = cash_flow_type_id,
    methods = [
        list_categories,
        category,
        create_category,
        update_category,
        delete_category
    ],
    guard = guards::ensure_category_deletable,
);

impl_nested_ops!(
    subcategory_ops,
    table = subcategories,
    domain = Subcategory,
    entity = "subcategory",
    input = SubcategoryInput,
    parent = categories,
    parent_entity = "category",
    parent_field = category,
    parent_id = category_id,
    methods = [
        list_subcategories,
        subcategory,
        create_subcategory,
        update_subcategory,
        delete_subcategory
    ],
    guard = guards::ensure_subcategory_deletable,
);

#[cfg(test)]
mod tests {
    use super::*;
    use migration::MigratorTrait;
    use sea_orm::Database;

    #[tokio::test]
    async fn unique_index_violation_is_reported_on_name() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();

        let paid = || statuses::ActiveModel {
            name: ActiveValue::Set("Paid".to_string()),
            ..Default::default()
        };
        paid().insert(&db).await.unwrap();
        let err = paid().insert(&db).await.unwrap_err();

        assert_eq!(
            name_taken(err, "status"),
            EngineError::Validation(FieldErrors::single(
                "name",
                "status with this name already exists."
            ))
        );
    }

    #[test]
    fn other_database_errors_pass_through() {
        let err = name_taken(DbErr::Custom("boom".to_string()), "status");
        assert!(matches!(err, EngineError::Database(_)));
    }
}
