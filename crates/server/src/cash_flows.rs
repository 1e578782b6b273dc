//! Cash flow API endpoints
//!
//! The listing accepts the filters `status`, `cash_flow_type`, `category`,
//! `subcategory`, `created_at_after` and `created_at_before`, sorting with
//! `ordering` and the usual `page` / `page_size`.

use api_types::{
    Paginated,
    cash_flow::{CashFlowQuery, CashFlowView, CashFlowWrite},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use engine::{
    CashFlow, CashFlowFilter, CashFlowFilterParams, CashFlowInput, CashFlowOrdering, WriteMode,
};

use crate::{
    ServerError,
    input::Fields,
    pagination::{ListUrl, paginated},
    server::ServerState,
};

fn view(cash_flow: CashFlow) -> CashFlowView {
    CashFlowView {
        id: cash_flow.id,
        status: cash_flow.status_id,
        status_name: cash_flow.status_name,
        cash_flow_type: cash_flow.cash_flow_type_id,
        cash_flow_type_name: cash_flow.cash_flow_type_name,
        category: cash_flow.category_id,
        category_name: cash_flow.category_name,
        subcategory: cash_flow.subcategory_id,
        subcategory_name: cash_flow.subcategory_name,
        amount: cash_flow.amount.to_string(),
        created_at: cash_flow.created_at,
        comment: cash_flow.comment,
    }
}

fn input(body: CashFlowWrite) -> Result<CashFlowInput, ServerError> {
    let mut fields = Fields::default();
    let input = CashFlowInput {
        status: fields.id("status", body.status),
        cash_flow_type: fields.id("cash_flow_type", body.cash_flow_type),
        category: fields.id("category", body.category),
        subcategory: fields.id("subcategory", body.subcategory),
        amount: fields.decimal("amount", body.amount),
        comment: fields.text("comment", body.comment),
    };
    fields.finish(input)
}

/// Handle requests for listing cash flows, newest first by default
pub async fn list(
    State(state): State<ServerState>,
    url: ListUrl,
    WithRejection(Query(pairs), _): WithRejection<Query<Vec<(String, String)>>, ServerError>,
) -> Result<Json<Paginated<CashFlowView>>, ServerError> {
    let query: CashFlowQuery = pairs.into_iter().collect();
    let filter = CashFlowFilter::parse(CashFlowFilterParams {
        status: query.status.as_deref(),
        cash_flow_type: query.cash_flow_type.as_deref(),
        category: query.category.as_deref(),
        subcategory: query.subcategory.as_deref(),
        created_at_after: query.created_at_after.as_deref(),
        created_at_before: query.created_at_before.as_deref(),
    })?;
    let orderings = CashFlowOrdering::parse_list(query.ordering.as_deref());
    let request = state
        .engine
        .pagination()
        .request(query.page.as_deref(), query.page_size.as_deref())?;

    let page = state
        .engine
        .list_cash_flows(&filter, &orderings, request)
        .await?;
    Ok(Json(paginated(page, &url, view)))
}

/// Handle requests for recording a new cash flow
pub async fn create(
    State(state): State<ServerState>,
    WithRejection(Json(body), _): WithRejection<Json<CashFlowWrite>, ServerError>,
) -> Result<(StatusCode, Json<CashFlowView>), ServerError> {
    let cash_flow = state.engine.create_cash_flow(input(body)?).await?;
    tracing::info!(id = cash_flow.id, "cash flow recorded");
    Ok((StatusCode::CREATED, Json(view(cash_flow))))
}

pub async fn retrieve(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ServerError>,
) -> Result<Json<CashFlowView>, ServerError> {
    let cash_flow = state.engine.cash_flow(id).await?;
    Ok(Json(view(cash_flow)))
}

pub async fn update(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ServerError>,
    WithRejection(Json(body), _): WithRejection<Json<CashFlowWrite>, ServerError>,
) -> Result<Json<CashFlowView>, ServerError> {
    let cash_flow = state
        .engine
        .update_cash_flow(id, input(body)?, WriteMode::Full)
        .await?;
    Ok(Json(view(cash_flow)))
}

pub async fn partial_update(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ServerError>,
    WithRejection(Json(body), _): WithRejection<Json<CashFlowWrite>, ServerError>,
) -> Result<Json<CashFlowView>, ServerError> {
    let cash_flow = state
        .engine
        .update_cash_flow(id, input(body)?, WriteMode::Partial)
        .await?;
    Ok(Json(view(cash_flow)))
}

pub async fn destroy(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ServerError>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_cash_flow(id).await?;
    tracing::info!(id, "cash flow deleted");
    Ok(StatusCode::NO_CONTENT)
}
