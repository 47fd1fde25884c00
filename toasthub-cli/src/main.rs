use std::time::Duration;

use clap::Parser;
use toasthub::{AppError, ManagerConfig, Severity, ToastManager, ToastOptions};
use tracing::{debug, info};

mod cli;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    run(Cli::parse()).await
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

async fn run(cli: Cli) -> Result<(), AppError> {
    init_tracing();

    let (cfg_path, cfg) = ManagerConfig::find_and_load(cli.config)?;
    info!(path=?cfg_path, capacity = cfg.capacity, "loaded config");

    let manager = ToastManager::new(&cfg);

    let cancel = tokio_util::sync::CancellationToken::new();
    let cancel_child = cancel.child_token();
    let feed_manager = manager.clone();
    let feed_interval = Duration::from_millis(cli.feed_interval_ms);
    let toast_duration = cli.toast_duration_ms;
    let mut handle = tokio::spawn(async move {
        feed_loop(cancel_child, feed_manager, feed_interval, toast_duration).await;
    });

    tokio::select! {
        _ = shutdown_signal() => {
            info!("shutdown signal received; stopping demo feed");
            cancel.cancel();
        }
        _ = &mut handle => {
            info!("demo feed finished");
        }
    }

    if !handle.is_finished() {
        let _ = tokio::time::timeout(Duration::from_secs(3), handle).await;
    }
    manager.shutdown();
    Ok(())
}

/// Enqueue a rotating-severity toast every interval and log what the manager
/// holds; stands in for the presentation layer polling `snapshot`.
async fn feed_loop(
    cancel: tokio_util::sync::CancellationToken,
    manager: ToastManager,
    interval: Duration,
    toast_duration_ms: u64,
) {
    const SEVERITIES: [Severity; 4] = [
        Severity::Info,
        Severity::Success,
        Severity::Warning,
        Severity::Error,
    ];

    let mut round: usize = 0;
    loop {
        if cancel.is_cancelled() {
            break;
        }

        let severity = SEVERITIES[round % SEVERITIES.len()];
        let id = manager.notify(
            severity,
            format!("demo toast #{round}"),
            ToastOptions::default()
                .title("toasthub demo")
                .duration_ms(toast_duration_ms),
        );
        info!(id = %id, severity = %severity, "enqueued demo toast");

        for toast in manager.snapshot() {
            debug!(
                id = %toast.id,
                severity = %toast.severity,
                remaining_pct = toast.remaining_pct,
                "active toast"
            );
        }
        info!(active = manager.len(), capacity = manager.capacity(), "manager state");

        round += 1;
        tokio::select! {
            _ = cancel.cancelled() => { break; }
            _ = tokio::time::sleep(interval) => {}
        }
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigint = signal(SignalKind::interrupt()).expect("listen SIGINT");
        let mut sigterm = signal(SignalKind::terminate()).expect("listen SIGTERM");
        tokio::select! {
            _ = sigint.recv() => {
                info!("shutdown: received SIGINT");
            }
            _ = sigterm.recv() => {
                info!("shutdown: received SIGTERM");
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        info!("shutdown: received Ctrl+C");
    }
}
