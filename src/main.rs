use std::sync::Arc;

use anyhow::Context;

use tasklist_server::{
    auth::bootstrap::init_providers,
    config::{AppConfig, defaults::DEFAULT_RUST_LOG},
    db::connection,
    logging::init_tracing,
    routes::app,
    services::ServiceContext,
    state::AppState,
};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        tracing::error!("server failed: {err:?}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cfg = match AppConfig::from_env() {
        Ok(cfg) => cfg,
        Err(err) => {
            init_tracing(DEFAULT_RUST_LOG);
            return Err(err.context("failed to load config"));
        }
    };
    init_tracing(&cfg.logging.rust_log);

    let db_cfg = cfg
        .database
        .clone()
        .context("database config is required (set APP_DATABASE__URL)")?;
    let db = connection::connect(&db_cfg).await?;
    let services = ServiceContext::new(&db).with_ownership(cfg.identity.ownership_policy);

    let providers = init_providers(&cfg.identity, &services).await?;

    let state = AppState::new(cfg, db, providers);
    let router = app(Arc::clone(&state));

    let general = &state.config.general;
    let listener = tokio::net::TcpListener::bind((general.host.as_str(), general.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", general.host, general.port))?;
    tracing::info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    connection::close(state.db.clone()).await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
