//! SK Ledger API Server
//!
//! Main entry point for the budget ledger service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skledger_api::{AppState, create_router};
use skledger_core::audit::AuditRecorder;
use skledger_db::{AuditLogRepository, connect_with};
use skledger_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skledger=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = connect_with(&config.database).await?;
    info!("Connected to database");

    let jwt_config = JwtConfig {
        secret: config.jwt.secret.clone(),
        access_token_expires_minutes: i64::try_from(config.jwt.access_token_expiry_secs / 60)
            .context("access token expiry out of range")?,
    };
    let jwt_service = JwtService::new(jwt_config);

    // The worker stops once every recorder clone is dropped with the router.
    let (audit, audit_worker) = AuditRecorder::spawn(
        Arc::new(AuditLogRepository::new(db.clone())),
        config.ledger.audit_channel_capacity,
    );
    info!(
        capacity = config.ledger.audit_channel_capacity,
        max_amount = %config.ledger.max_amount,
        "Ledger configured"
    );

    let state = AppState::new(&db, jwt_service, audit, &config.ledger);
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Let queued audit events drain before exiting.
    audit_worker.await?;
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}
