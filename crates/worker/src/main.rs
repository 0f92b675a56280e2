use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use metal_detector_butler::{ButlerApi, ButlerConfig, ButlerReleaseSource};
use metal_detector_db::store::PgStore;
use metal_detector_notifications::{
    ChannelDispatcher, Collaborators, EmailChannel, EmailConfig, NotificationScheduler,
    TelegramChannel, TelegramConfig,
};
use metal_detector_worker::config::WorkerConfig;
use metal_detector_worker::triggers::{run_scheduled, TriggerKind};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How long to wait for in-flight runs after a shutdown signal.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "metal_detector_worker=debug,metal_detector_notifications=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = WorkerConfig::from_env().context("Invalid worker configuration")?;
    tracing::info!(concurrency = config.concurrency, "Loaded worker configuration");

    // --- Database ---
    let pool = metal_detector_db::create_pool(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    metal_detector_db::health_check(&pool)
        .await
        .context("Database health check failed")?;
    metal_detector_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database ready");

    let store = Arc::new(PgStore::new(pool));

    // --- Release butler ---
    let butler_config = ButlerConfig::from_env().context("BUTLER_RELEASES_URL must be set")?;
    tracing::info!(url = %butler_config.releases_url, "Using release butler");
    let releases = Arc::new(ButlerReleaseSource::new(
        ButlerApi::new(butler_config).context("Failed to build butler client")?,
    ));

    // --- Channels ---
    let mut dispatcher = ChannelDispatcher::new();
    match EmailConfig::from_env() {
        Some(email) => {
            dispatcher.register(Arc::new(
                EmailChannel::new(email).context("Failed to build SMTP transport")?,
            ));
        }
        None => tracing::warn!("SMTP_HOST not set, email notifications disabled"),
    }
    match TelegramConfig::from_env() {
        Some(telegram) => {
            dispatcher.register(Arc::new(
                TelegramChannel::new(telegram).context("Failed to build Telegram client")?,
            ));
        }
        None => tracing::info!("TELEGRAM_BOT_TOKEN not set, Telegram notifications disabled"),
    }
    if dispatcher.registered().is_empty() {
        tracing::warn!("No notification channel configured, every delivery will fail");
    }

    // --- Scheduler ---
    let scheduler = Arc::new(NotificationScheduler::new(
        Collaborators {
            releases,
            follows: store.clone(),
            configs: store.clone(),
            recipients: store,
        },
        Arc::new(dispatcher),
        config.concurrency,
    ));

    // --- Triggers ---
    let cancel = CancellationToken::new();
    let handles = [
        (TriggerKind::Frequency, config.frequency_schedule),
        (TriggerKind::ReleaseDate, config.release_date_schedule),
        (TriggerKind::AnnouncementDate, config.announcement_date_schedule),
    ]
    .map(|(kind, schedule)| {
        tokio::spawn(run_scheduled(
            kind,
            schedule,
            Arc::clone(&scheduler),
            cancel.clone(),
        ))
    });
    tracing::info!("Notification triggers started");

    shutdown_signal().await;
    tracing::info!("Shutdown signal received, waiting for in-flight runs");

    cancel.cancel();
    for handle in handles {
        if tokio::time::timeout(SHUTDOWN_TIMEOUT, handle).await.is_err() {
            tracing::warn!("Notification trigger did not stop in time");
        }
    }

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
