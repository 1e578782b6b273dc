use std::collections::BTreeMap;

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use engine::EngineError;

use serde::Serialize;
pub use server::{ServerState, router, run_with_listener, spawn_with_listener};

mod cash_flows;
mod input;
mod pagination;
mod root;
mod server;
mod taxonomy;

pub mod types {
    pub use api_types::{ApiRoot, IdInput, PageQuery, Paginated, TextInput};

    pub mod status {
        pub use api_types::status::{StatusView, StatusWrite};
        pub use engine::Status;
    }

    pub mod cash_flow_type {
        pub use api_types::cash_flow_type::{CashFlowTypeView, CashFlowTypeWrite};
        pub use engine::CashFlowType;
    }

    pub mod category {
        pub use api_types::category::{CategoryView, CategoryWrite};
        pub use engine::Category;
    }

    pub mod subcategory {
        pub use api_types::subcategory::{SubcategoryView, SubcategoryWrite};
        pub use engine::Subcategory;
    }

    pub mod cash_flow {
        pub use api_types::cash_flow::{CashFlowQuery, CashFlowView, CashFlowWrite, DecimalInput};
        pub use engine::CashFlow;
    }
}

const NOT_FOUND: &str = "Not found.";
const SERVER_ERROR: &str = "A server error occurred.";

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    /// Malformed request: unreadable JSON body or query string.
    Generic(String),
    /// The path does not name a row, e.g. a non-numeric id.
    NotFound,
}

#[derive(Serialize)]
struct Detail {
    detail: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Validation(_) => StatusCode::BAD_REQUEST,
        EngineError::KeyNotFound(_) | EngineError::InvalidPage(_) => StatusCode::NOT_FOUND,
        EngineError::IntegrityConflict(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn detail_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            SERVER_ERROR.to_string()
        }
        EngineError::KeyNotFound(key) => {
            tracing::debug!("{key} not found");
            NOT_FOUND.to_string()
        }
        EngineError::InvalidPage(message) | EngineError::IntegrityConflict(message) => message,
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, detail) = match self {
            ServerError::Engine(EngineError::Validation(errors)) => {
                let body: BTreeMap<&str, &[String]> = errors.iter().collect();
                return (StatusCode::BAD_REQUEST, Json(body)).into_response();
            }
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), detail_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
            ServerError::NotFound => (StatusCode::NOT_FOUND, NOT_FOUND.to_string()),
        };

        (status, Json(Detail { detail })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        Self::Generic(value.body_text())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(value: QueryRejection) -> Self {
        Self::Generic(value.body_text())
    }
}

impl From<PathRejection> for ServerError {
    fn from(_: PathRejection) -> Self {
        Self::NotFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::FieldErrors;

    async fn body_json(res: axum::response::Response) -> serde_json::Value {
        use http_body_util::BodyExt;

        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_maps_to_400_with_field_body() {
        let mut errors = FieldErrors::new();
        errors.add("amount", "Amount must be positive");
        let res = ServerError::from(EngineError::Validation(errors)).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(res).await,
            serde_json::json!({"amount": ["Amount must be positive"]})
        );
    }

    #[tokio::test]
    async fn not_found_maps_to_404() {
        let err = EngineError::KeyNotFound("status 3".to_string());
        let res = ServerError::from(err).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(res).await,
            serde_json::json!({"detail": "Not found."})
        );
    }

    #[tokio::test]
    async fn invalid_page_maps_to_404() {
        let err = EngineError::InvalidPage("Invalid page.".to_string());
        let res = ServerError::from(err).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(res).await,
            serde_json::json!({"detail": "Invalid page."})
        );
    }

    #[test]
    fn integrity_conflict_maps_to_409() {
        let err = EngineError::IntegrityConflict("x".to_string());
        let res = ServerError::from(err).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn database_errors_are_hidden() {
        let err = EngineError::Database(sea_orm::DbErr::Custom("boom".to_string()));
        let res = ServerError::from(err).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(res).await,
            serde_json::json!({"detail": "A server error occurred."})
        );
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
