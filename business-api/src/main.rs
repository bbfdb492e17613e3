mod adapters;
mod app_state;
mod config;
mod domain;
mod factory;
mod router;
mod routes;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::domain::ports::outbound::DocumentIndex;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,business_api=debug,tower_http=debug".into()),
        )
        .with(fmt::layer().with_timer(fmt::time::LocalTime::rfc_3339()))
        .init();

    let settings = config::read_config().context("failed to read configuration")?;

    let pool = PgPoolOptions::new()
        .max_connections(settings.database.max_connections)
        .acquire_timeout(settings.database.query_timeout())
        .connect_with(settings.database.with_db())
        .await
        .context("failed to connect to Postgres")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to run database migrations")?;

    let index = factory::create_document_index(&settings)?;
    match index.ping().await {
        Ok(()) => tracing::info!(url = %settings.search.url, "search index reachable"),
        // Search endpoints fail until it comes up; CRUD keeps working.
        Err(err) => tracing::warn!(url = %settings.search.url, "search index unreachable: {}", err),
    }

    let app_state = factory::create_app_state(pool, index, &settings);
    let app = router::create(app_state, &settings.application.app_url);

    let addr = format!("{}:{}", settings.application.host, settings.application.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(
        environment = %settings.application.environment,
        "listening on {}",
        listener.local_addr()?
    );

    axum::serve(listener, app).await?;
    Ok(())
}
