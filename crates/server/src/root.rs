//! API root

use api_types::ApiRoot;
use axum::Json;

/// List the URL of every collection.
pub async fn index() -> Json<ApiRoot> {
    Json(ApiRoot {
        cash_flow_types: "/api/cash_flow_types/".to_string(),
        statuses: "/api/statuses/".to_string(),
        categories: "/api/categories/".to_string(),
        subcategories: "/api/subcategories/".to_string(),
        cash_flows: "/api/cash_flows/".to_string(),
    })
}
