use migration::{Migrator, MigratorTrait};

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "cashflow={level},server={level},engine={level},migration={level},tower_http={level}",
            level = settings.app.level
        ))
        .init();

    let pagination = engine::Pagination::new(
        settings.pagination.default_page_size,
        settings.pagination.max_page_size,
    )?;

    tracing::info!("Opening database...");
    let db = sea_orm::Database::connect(settings.server.database_url.as_str()).await?;
    Migrator::up(&db, None).await?;

    let engine = engine::Engine::builder()
        .database(db)
        .pagination(pagination)
        .build()
        .await?;

    let addr = format!("{}:{}", settings.server.bind, settings.server.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener on {addr}: {err}");
            return Err(err.into());
        }
    };
    server::run_with_listener(engine, listener).await?;

    Ok(())
}
