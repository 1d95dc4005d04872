// SPDX-FileCopyrightText: 2026 Ombuds Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `ombuds serve` command implementation.
//!
//! Starts the full bot: Telegram channel adapter, SQLite report store,
//! in-memory sessions, the intake loop, and the keep-alive health server.
//! Supports graceful shutdown via signal handlers.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use ombuds_config::model::OmbudsConfig;
use ombuds_core::error::OmbudsError;
use ombuds_core::{ChannelAdapter, ReportStore, SessionStore, UserId};
use ombuds_intake::{
    ConversationController, InMemorySessionStore, IntakeLoop, install_signal_handler,
};
use ombuds_storage::SqliteReportStore;
use ombuds_telegram::TelegramChannel;

use crate::health;

/// Runs the `ombuds serve` command.
pub async fn run_serve(config: OmbudsConfig) -> Result<(), OmbudsError> {
    // Initialize tracing subscriber.
    init_tracing(&config.bot.log_level);

    info!("starting ombuds serve");

    let admin_chat_id = config.telegram.admin_chat_id.ok_or_else(|| {
        eprintln!(
            "error: admin chat id required. Set via: config or OMBUDS_TELEGRAM_ADMIN_CHAT_ID"
        );
        OmbudsError::Config("telegram.admin_chat_id is required".into())
    })?;

    let admin_password = config
        .telegram
        .admin_password
        .clone()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| {
            eprintln!(
                "error: admin password required. Set via: config or OMBUDS_TELEGRAM_ADMIN_PASSWORD"
            );
            OmbudsError::Config("telegram.admin_password is required".into())
        })?;

    // Initialize the report store.
    let reports = Arc::new(SqliteReportStore::new(config.storage.clone()));
    reports.initialize().await?;
    info!(
        database_path = config.storage.database_path.as_str(),
        "report store initialized"
    );

    // Initialize and connect the Telegram channel.
    let mut telegram = TelegramChannel::new(&config.telegram).map_err(|e| {
        error!(error = %e, "failed to initialize Telegram channel");
        eprintln!(
            "error: Telegram bot token required. Set via: config or OMBUDS_TELEGRAM_BOT_TOKEN"
        );
        e
    })?;
    telegram.connect().await?;
    let channel: Arc<dyn ChannelAdapter> = Arc::new(telegram);

    let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());

    let controller = Arc::new(ConversationController::new(
        channel.clone(),
        reports.clone() as Arc<dyn ReportStore>,
        sessions.clone(),
        UserId(admin_chat_id),
        admin_password,
    ));

    // Install signal handler.
    let cancel = install_signal_handler();

    // Spawn the keep-alive health server.
    {
        let server_config = config.server.clone();
        let health_cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(e) = health::start_health_server(&server_config, health_cancel).await {
                error!(error = %e, "health server failed");
            }
        });
    }

    // Run the intake loop until shutdown.
    let intake = IntakeLoop::new(
        channel,
        controller,
        sessions,
        Duration::from_secs(config.session.idle_timeout_secs),
        Duration::from_secs(config.session.sweep_interval_secs),
    );
    intake.run(cancel).await?;

    // Close storage.
    reports.close().await?;

    info!("ombuds serve shutdown complete");
    Ok(())
}

/// Initializes the global tracing subscriber with the configured log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ombuds={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
