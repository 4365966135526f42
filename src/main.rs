//! MicroMart - e-commerce backend service.

use std::sync::Arc;

use anyhow::Result;
use micromart::config::Config;
use micromart::{app, AppState};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let db = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&db).await?;

    let addr = format!("0.0.0.0:{}", config.port);
    let state = AppState { db, config: Arc::new(config) };
    tracing::info!("MicroMart API listening on {}", addr);
    axum::serve(tokio::net::TcpListener::bind(&addr).await?, app(state)).await?;
    Ok(())
}
