use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing::info;

use auth_api::bootstrap::build_application;
use auth_api::telemetry::init_tracing;
use auth_api::create_app;
use auth_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("invalid configuration")?;
    init_tracing(&config.logging);

    info!(environment = %config.environment, "starting auth service");

    let application = build_application(&config).await?;
    let state = web::Data::new(application.state);
    let cors = config.cors.clone();

    let bind_address = config.server.bind_address();
    info!(address = %bind_address, "server binding");

    HttpServer::new(move || create_app(state.clone(), &cors))
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await?;

    if let Some(task) = application.cleanup_task {
        task.abort();
    }
    info!("auth service stopped");
    Ok(())
}
