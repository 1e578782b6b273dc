use engine::{
    CashFlowInput, CategoryInput, Engine, EngineError, FieldErrors, NameInput, PageRequest,
    SubcategoryInput, WriteMode,
};
use migration::MigratorTrait;
use sea_orm::Database;

async fn engine() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

fn name(value: &str) -> NameInput {
    NameInput {
        name: Some(value.to_string()),
    }
}

fn first_page() -> PageRequest {
    PageRequest {
        page: 1,
        page_size: 25,
    }
}

#[tokio::test]
async fn status_crud() {
    let engine = engine().await;

    let created = engine.create_status(name("  Planned  ")).await.unwrap();
    assert_eq!(created.name, "Planned");

    let fetched = engine.status(created.id).await.unwrap();
    assert_eq!(fetched, created);

    let renamed = engine
        .update_status(created.id, name("Paid"), WriteMode::Full)
        .await
        .unwrap();
    assert_eq!(renamed.id, created.id);
    assert_eq!(renamed.name, "Paid");

    let page = engine.list_statuses(first_page()).await.unwrap();
    assert_eq!(page.count, 1);
    assert_eq!(page.items, vec![renamed]);

    engine.delete_status(created.id).await.unwrap();
    assert_eq!(
        engine.status(created.id).await,
        Err(EngineError::KeyNotFound(format!("status {}", created.id)))
    );
}

#[tokio::test]
async fn duplicate_names_are_rejected() {
    let engine = engine().await;
    engine.create_status(name("Paid")).await.unwrap();

    let err = engine.create_status(name("Paid")).await.unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation(FieldErrors::single(
            "name",
            "status with this name already exists."
        ))
    );

    let page = engine.list_statuses(first_page()).await.unwrap();
    assert_eq!(page.count, 1);
}

#[tokio::test]
async fn renaming_to_the_same_name_is_allowed() {
    let engine = engine().await;
    let income = engine.create_cash_flow_type(name("Income")).await.unwrap();

    let updated = engine
        .update_cash_flow_type(income.id, name("Income"), WriteMode::Full)
        .await
        .unwrap();
    assert_eq!(updated, income);
}

#[tokio::test]
async fn missing_and_blank_names_are_rejected() {
    let engine = engine().await;

    let err = engine
        .create_cash_flow_type(NameInput::default())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation(FieldErrors::single("name", "This field is required."))
    );

    let err = engine.create_cash_flow_type(name("   ")).await.unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation(FieldErrors::single(
            "name",
            "This field may not be blank."
        ))
    );
}

#[tokio::test]
async fn category_requires_an_existing_cash_flow_type() {
    let engine = engine().await;

    let err = engine
        .create_category(CategoryInput {
            name: Some("Salary".to_string()),
            cash_flow_type: Some(42),
        })
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation(FieldErrors::single(
            "cash_flow_type",
            "Invalid pk \"42\" - object does not exist."
        ))
    );
}

#[tokio::test]
async fn nested_taxonomy_carries_parent_names() {
    let engine = engine().await;
    let income = engine.create_cash_flow_type(name("Income")).await.unwrap();
    let salary = engine
        .create_category(CategoryInput {
            name: Some("Salary".to_string()),
            cash_flow_type: Some(income.id),
        })
        .await
        .unwrap();
    assert_eq!(salary.cash_flow_type_id, income.id);
    assert_eq!(salary.cash_flow_type_name, "Income");

    let bonus = engine
        .create_subcategory(SubcategoryInput {
            name: Some("Bonus".to_string()),
            category: Some(salary.id),
        })
        .await
        .unwrap();
    assert_eq!(bonus.category_id, salary.id);
    assert_eq!(bonus.category_name, "Salary");

    let page = engine.list_subcategories(first_page()).await.unwrap();
    assert_eq!(page.items, vec![bonus.clone()]);

    let renamed = engine
        .update_subcategory(
            bonus.id,
            SubcategoryInput {
                name: Some("Yearly bonus".to_string()),
                category: None,
            },
            WriteMode::Partial,
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Yearly bonus");
    assert_eq!(renamed.category_id, salary.id);
}

#[tokio::test]
async fn full_update_requires_every_field() {
    let engine = engine().await;
    let income = engine.create_cash_flow_type(name("Income")).await.unwrap();
    let salary = engine
        .create_category(CategoryInput {
            name: Some("Salary".to_string()),
            cash_flow_type: Some(income.id),
        })
        .await
        .unwrap();

    let err = engine
        .update_category(
            salary.id,
            CategoryInput {
                name: Some("Wages".to_string()),
                cash_flow_type: None,
            },
            WriteMode::Full,
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation(FieldErrors::single(
            "cash_flow_type",
            "This field is required."
        ))
    );
    assert_eq!(engine.category(salary.id).await.unwrap().name, "Salary");
}

#[tokio::test]
async fn referenced_rows_cannot_be_deleted() {
    let engine = engine().await;
    let paid = engine.create_status(name("Paid")).await.unwrap();
    let income = engine.create_cash_flow_type(name("Income")).await.unwrap();
    let salary = engine
        .create_category(CategoryInput {
            name: Some("Salary".to_string()),
            cash_flow_type: Some(income.id),
        })
        .await
        .unwrap();
    let bonus = engine
        .create_subcategory(SubcategoryInput {
            name: Some("Bonus".to_string()),
            category: Some(salary.id),
        })
        .await
        .unwrap();

    assert!(matches!(
        engine.delete_category(salary.id).await,
        Err(EngineError::IntegrityConflict(_))
    ));
    assert!(matches!(
        engine.delete_cash_flow_type(income.id).await,
        Err(EngineError::IntegrityConflict(_))
    ));

    let flow = engine
        .create_cash_flow(CashFlowInput {
            status: Some(paid.id),
            cash_flow_type: Some(income.id),
            category: Some(salary.id),
            subcategory: Some(bonus.id),
            amount: Some("100.00".to_string()),
            comment: None,
        })
        .await
        .unwrap();

    assert!(matches!(
        engine.delete_status(paid.id).await,
        Err(EngineError::IntegrityConflict(_))
    ));
    assert!(matches!(
        engine.delete_subcategory(bonus.id).await,
        Err(EngineError::IntegrityConflict(_))
    ));
    assert_eq!(engine.status(paid.id).await.unwrap(), paid);

    engine.delete_cash_flow(flow.id).await.unwrap();
    engine.delete_subcategory(bonus.id).await.unwrap();
    engine.delete_category(salary.id).await.unwrap();
    engine.delete_cash_flow_type(income.id).await.unwrap();
    engine.delete_status(paid.id).await.unwrap();
}

#[tokio::test]
async fn deleting_unknown_rows_is_not_found() {
    let engine = engine().await;
    assert!(matches!(
        engine.delete_status(7).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        engine.delete_subcategory(7).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        engine.delete_cash_flow(7).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn taxonomy_lists_are_paginated_by_id() {
    let engine = engine().await;
    for index in 0..12 {
        engine
            .create_status(name(&format!("Status {index:02}")))
            .await
            .unwrap();
    }

    let page = engine
        .list_statuses(PageRequest {
            page: 2,
            page_size: 5,
        })
        .await
        .unwrap();
    assert_eq!(page.count, 12);
    assert_eq!(page.num_pages, 3);
    let names: Vec<_> = page.items.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        ["Status 05", "Status 06", "Status 07", "Status 08", "Status 09"]
    );
    assert!(page.has_next());
    assert!(page.has_previous());

    let err = engine
        .list_statuses(PageRequest {
            page: 4,
            page_size: 5,
        })
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::InvalidPage("Invalid page.".to_string()));
}
