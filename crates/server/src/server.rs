use axum::{
    Router,
    routing::{MethodRouter, get},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use std::sync::Arc;

use crate::{
    cash_flows, root,
    taxonomy::{CashFlowTypes, Categories, Statuses, Subcategories, collection, member},
};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Register `path` both with and without its trailing slash.
fn route_both(
    router: Router<ServerState>,
    path: &str,
    method_router: MethodRouter<ServerState>,
) -> Router<ServerState> {
    let trimmed = path.trim_end_matches('/');
    router
        .route(path, method_router.clone())
        .route(trimmed, method_router)
}

pub fn router(state: ServerState) -> Router {
    let routes = [
        ("/api/", get(root::index)),
        ("/api/statuses/", collection::<Statuses>()),
        ("/api/statuses/{id}/", member::<Statuses>()),
        ("/api/cash_flow_types/", collection::<CashFlowTypes>()),
        ("/api/cash_flow_types/{id}/", member::<CashFlowTypes>()),
        ("/api/categories/", collection::<Categories>()),
        ("/api/categories/{id}/", member::<Categories>()),
        ("/api/subcategories/", collection::<Subcategories>()),
        ("/api/subcategories/{id}/", member::<Subcategories>()),
        (
            "/api/cash_flows/",
            get(cash_flows::list).post(cash_flows::create),
        ),
        (
            "/api/cash_flows/{id}/",
            get(cash_flows::retrieve)
                .put(cash_flows::update)
                .patch(cash_flows::partial_update)
                .delete(cash_flows::destroy),
        ),
    ];

    routes
        .into_iter()
        .fold(Router::new(), |router, (path, method_router)| {
            route_both(router, path, method_router)
        })
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
