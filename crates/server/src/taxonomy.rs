//! Statuses, cash flow types, categories and subcategories endpoints
//!
//! The four collections share their handlers: each one implements
//! [`Resource`] and the handlers are generic over it.

use std::future::Future;

use api_types::{
    PageQuery, Paginated,
    cash_flow_type::{CashFlowTypeView, CashFlowTypeWrite},
    category::{CategoryView, CategoryWrite},
    status::{StatusView, StatusWrite},
    subcategory::{SubcategoryView, SubcategoryWrite},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{MethodRouter, get},
};
use axum_extra::extract::WithRejection;
use engine::{
    CashFlowType, Category, CategoryInput, Engine, NameInput, Page, PageRequest, ResultEngine,
    Status, Subcategory, SubcategoryInput, WriteMode,
};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    ServerError,
    input::Fields,
    pagination::{ListUrl, paginated},
    server::ServerState,
};

/// A taxonomy collection: its wire types and the engine operations behind it.
pub(crate) trait Resource: Send + Sync + 'static {
    type Domain: Send;
    type View: Serialize + Send + 'static;
    type Write: DeserializeOwned + Send + 'static;
    type Input: Send;

    fn view(domain: Self::Domain) -> Self::View;

    fn input(body: Self::Write) -> Result<Self::Input, ServerError>;

    fn list(
        engine: &Engine,
        request: PageRequest,
    ) -> impl Future<Output = ResultEngine<Page<Self::Domain>>> + Send;

    fn get(engine: &Engine, id: i32) -> impl Future<Output = ResultEngine<Self::Domain>> + Send;

    fn create(
        engine: &Engine,
        input: Self::Input,
    ) -> impl Future<Output = ResultEngine<Self::Domain>> + Send;

    fn update(
        engine: &Engine,
        id: i32,
        input: Self::Input,
        mode: WriteMode,
    ) -> impl Future<Output = ResultEngine<Self::Domain>> + Send;

    fn delete(engine: &Engine, id: i32) -> impl Future<Output = ResultEngine<()>> + Send;
}

/// Routes of the collection itself: list and create.
pub(crate) fn collection<R: Resource>() -> MethodRouter<ServerState> {
    get(list::<R>).post(create::<R>)
}

/// Routes of one row: retrieve, update, partial update and destroy.
pub(crate) fn member<R: Resource>() -> MethodRouter<ServerState> {
    get(retrieve::<R>)
        .put(update::<R>)
        .patch(partial_update::<R>)
        .delete(destroy::<R>)
}

/// Handle requests for listing a collection, ordered by id
async fn list<R: Resource>(
    State(state): State<ServerState>,
    url: ListUrl,
    WithRejection(Query(pairs), _): WithRejection<Query<Vec<(String, String)>>, ServerError>,
) -> Result<Json<Paginated<R::View>>, ServerError> {
    let query: PageQuery = pairs.into_iter().collect();
    let request = state
        .engine
        .pagination()
        .request(query.page.as_deref(), query.page_size.as_deref())?;
    let page = R::list(&state.engine, request).await?;
    Ok(Json(paginated(page, &url, R::view)))
}

async fn create<R: Resource>(
    State(state): State<ServerState>,
    WithRejection(Json(body), _): WithRejection<Json<R::Write>, ServerError>,
) -> Result<(StatusCode, Json<R::View>), ServerError> {
    let domain = R::create(&state.engine, R::input(body)?).await?;
    Ok((StatusCode::CREATED, Json(R::view(domain))))
}

async fn retrieve<R: Resource>(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ServerError>,
) -> Result<Json<R::View>, ServerError> {
    let domain = R::get(&state.engine, id).await?;
    Ok(Json(R::view(domain)))
}

/// PUT: every writable field is required
async fn update<R: Resource>(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ServerError>,
    WithRejection(Json(body), _): WithRejection<Json<R::Write>, ServerError>,
) -> Result<Json<R::View>, ServerError> {
    let domain = R::update(&state.engine, id, R::input(body)?, WriteMode::Full).await?;
    Ok(Json(R::view(domain)))
}

async fn partial_update<R: Resource>(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ServerError>,
    WithRejection(Json(body), _): WithRejection<Json<R::Write>, ServerError>,
) -> Result<Json<R::View>, ServerError> {
    let domain = R::update(&state.engine, id, R::input(body)?, WriteMode::Partial).await?;
    Ok(Json(R::view(domain)))
}

/// 409 while other rows still reference the one being deleted.
async fn destroy<R: Resource>(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ServerError>,
) -> Result<StatusCode, ServerError> {
    R::delete(&state.engine, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) struct Statuses;

impl Resource for Statuses {
    type Domain = Status;
    type View = StatusView;
    type Write = StatusWrite;
    type Input = NameInput;

    fn view(status: Status) -> StatusView {
        StatusView {
            id: status.id,
            name: status.name,
        }
    }

    fn input(body: StatusWrite) -> Result<NameInput, ServerError> {
        let mut fields = Fields::default();
        let name = fields.text("name", body.name);
        fields.finish(NameInput { name })
    }

    fn list(
        engine: &Engine,
        request: PageRequest,
    ) -> impl Future<Output = ResultEngine<Page<Status>>> + Send {
        engine.list_statuses(request)
    }

    fn get(engine: &Engine, id: i32) -> impl Future<Output = ResultEngine<Status>> + Send {
        engine.status(id)
    }

    fn create(
        engine: &Engine,
        input: NameInput,
    ) -> impl Future<Output = ResultEngine<Status>> + Send {
        engine.create_status(input)
    }

    fn update(
        engine: &Engine,
        id: i32,
        input: NameInput,
        mode: WriteMode,
    ) -> impl Future<Output = ResultEngine<Status>> + Send {
        engine.update_status(id, input, mode)
    }

    fn delete(engine: &Engine, id: i32) -> impl Future<Output = ResultEngine<()>> + Send {
        engine.delete_status(id)
    }
}

pub(crate) struct CashFlowTypes;

impl Resource for CashFlowTypes {
    type Domain = CashFlowType;
    type View = CashFlowTypeView;
    type Write = CashFlowTypeWrite;
    type Input = NameInput;

    fn view(cash_flow_type: CashFlowType) -> CashFlowTypeView {
        CashFlowTypeView {
            id: cash_flow_type.id,
            name: cash_flow_type.name,
        }
    }

    fn input(body: CashFlowTypeWrite) -> Result<NameInput, ServerError> {
        let mut fields = Fields::default();
        let name = fields.text("name", body.name);
        fields.finish(NameInput { name })
    }

    fn list(
        engine: &Engine,
        request: PageRequest,
    ) -> impl Future<Output = ResultEngine<Page<CashFlowType>>> + Send {
        engine.list_cash_flow_types(request)
    }

    fn get(engine: &Engine, id: i32) -> impl Future<Output = ResultEngine<CashFlowType>> + Send {
        engine.cash_flow_type(id)
    }

    fn create(
        engine: &Engine,
        input: NameInput,
    ) -> impl Future<Output = ResultEngine<CashFlowType>> + Send {
        engine.create_cash_flow_type(input)
    }

    fn update(
        engine: &Engine,
        id: i32,
        input: NameInput,
        mode: WriteMode,
    ) -> impl Future<Output = ResultEngine<CashFlowType>> + Send {
        engine.update_cash_flow_type(id, input, mode)
    }

    fn delete(engine: &Engine, id: i32) -> impl Future<Output = ResultEngine<()>> + Send {
        engine.delete_cash_flow_type(id)
    }
}

pub(crate) struct Categories;

impl Resource for Categories {
    type Domain = Category;
    type View = CategoryView;
    type Write = CategoryWrite;
    type Input = CategoryInput;

    fn view(category: Category) -> CategoryView {
        CategoryView {
            id: category.id,
            name: category.name,
            cash_flow_type: category.cash_flow_type_id,
            cash_flow_type_name: category.cash_flow_type_name,
        }
    }

    fn input(body: CategoryWrite) -> Result<CategoryInput, ServerError> {
        let mut fields = Fields::default();
        let input = CategoryInput {
            name: fields.text("name", body.name),
            cash_flow_type: fields.id("cash_flow_type", body.cash_flow_type),
        };
        fields.finish(input)
    }

    fn list(
        engine: &Engine,
        request: PageRequest,
    ) -> impl Future<Output = ResultEngine<Page<Category>>> + Send {
        engine.list_categories(request)
    }

    fn get(engine: &Engine, id: i32) -> impl Future<Output = ResultEngine<Category>> + Send {
        engine.category(id)
    }

    fn create(
        engine: &Engine,
        input: CategoryInput,
    ) -> impl Future<Output = ResultEngine<Category>> + Send {
        engine.create_category(input)
    }

    fn update(
        engine: &Engine,
        id: i32,
        input: CategoryInput,
        mode: WriteMode,
    ) -> impl Future<Output = ResultEngine<Category>> + Send {
        engine.update_category(id, input, mode)
    }

    fn delete(engine: &Engine, id: i32) -> impl Future<Output = ResultEngine<()>> + Send {
        engine.delete_category(id)
    }
}

pub(crate) struct Subcategories;

impl Resource for Subcategories {
    type Domain = Subcategory;
    type View = SubcategoryView;
    type Write = SubcategoryWrite;
    type Input = SubcategoryInput;

    fn view(subcategory: Subcategory) -> SubcategoryView {
        SubcategoryView {
            id: subcategory.id,
            name: subcategory.name,
            category: subcategory.category_id,
            category_name: subcategory.category_name,
        }
    }

    fn input(body: SubcategoryWrite) -> Result<SubcategoryInput, ServerError> {
        let mut fields = Fields::default();
        let input = SubcategoryInput {
            name: fields.text("name", body.name),
            category: fields.id("category", body.category),
        };
        fields.finish(input)
    }

    fn list(
        engine: &Engine,
        request: PageRequest,
    ) -> impl Future<Output = ResultEngine<Page<Subcategory>>> + Send {
        engine.list_subcategories(request)
    }

    fn get(engine: &Engine, id: i32) -> impl Future<Output = ResultEngine<Subcategory>> + Send {
        engine.subcategory(id)
    }

    fn create(
        engine: &Engine,
        input: SubcategoryInput,
    ) -> impl Future<Output = ResultEngine<Subcategory>> + Send {
        engine.create_subcategory(input)
    }

    fn update(
        engine: &Engine,
        id: i32,
        input: SubcategoryInput,
        mode: WriteMode,
    ) -> impl Future<Output = ResultEngine<Subcategory>> + Send {
        engine.update_subcategory(id, input, mode)
    }

    fn delete(engine: &Engine, id: i32) -> impl Future<Output = ResultEngine<()>> + Send {
        engine.delete_subcategory(id)
    }
}
