//! Application entry point for the `glucose-monitor` service.
//!
//! Startup sequence:
//! - Initialize structured logging/tracing
//! - Load configuration from environment variables or `.env`
//! - Build the fixed alert policy and check its thresholds
//! - Spawn the poller that fetches, evaluates, and renders each reading
//! - Serve `/health` and `/display` until Ctrl-C
//!
//! # Environment Variables
//! - `DATA_SOURCE_URL` (**required**) – entries endpoint of the data source
//! - `MONITOR_NAME`, `POLL_INTERVAL_SECS`, `FETCH_TIMEOUT_SECS`, `LISTEN_PORT`
//!   (optional, see `config`)
//! - `MONITOR_LOG_LEVEL` (optional) – log verbosity (default: `debug`)
//! - `MONITOR_SPAN_EVENTS` (optional) – span event mode for tracing
use std::{env, net::SocketAddr};

use anyhow::{Context, Result};
use dotenvy::dotenv;
use is_terminal::IsTerminal;
use tokio::sync::watch;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use glucose_monitor::clock::SystemClock;
use glucose_monitor::poller::{Poller, TokioSleeper};
use glucose_monitor::source::HttpReadingSource;
use glucose_monitor::{config, routes, AlertPolicy, SharedDisplay};

// ---

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    init_tracing();
    dotenv().ok();

    let cfg = config::load_from_env()?;
    cfg.log_config();

    let policy = AlertPolicy::new()?;
    let display = SharedDisplay::new();
    let source = HttpReadingSource::new(cfg.data_source_url.clone(), cfg.fetch_timeout())?;

    let poller = Poller::new(
        source,
        SystemClock,
        TokioSleeper,
        display.clone(),
        policy,
        cfg.monitor_name.clone(),
        cfg.poll_interval(),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let poller_shutdown = shutdown_rx.clone();
    let poller_task = tokio::spawn(async move { poller.run(poller_shutdown).await });

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            // Dropping the sender would stop the poller and server.
            std::future::pending::<()>().await;
        }
        tracing::info!("Shutdown requested");
        let _ = shutdown_tx.send(true);
    });

    let app = routes::router(display);

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.listen_port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    let mut server_shutdown = shutdown_rx;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = server_shutdown.wait_for(|stop| *stop).await;
        })
        .await?;

    poller_task.await?;
    Ok(())
}

// ---

/// Initialize the global tracing subscriber for structured logging.
///
/// - Log target, file, and line number output enabled
/// - Color output controlled by TTY detection and `FORCE_COLOR` env var:
///   - `FORCE_COLOR=1|true|yes`: force colors on
///   - `FORCE_COLOR=0|false|no`: force colors off
///   - unset or other values: auto-detect TTY
/// - Span event emission mode controlled by the `MONITOR_SPAN_EVENTS` env var:
///   - `"full"`       : emit ENTER, EXIT, and CLOSE events with timing
///   - `"enter_exit"` : emit ENTER and EXIT only
///   - unset or other values: emit CLOSE events only (default)
/// - Log level from `RUST_LOG`, else `MONITOR_LOG_LEVEL`
///
/// Call once at startup before any logging macros are invoked.
fn init_tracing() {
    // ---
    let span_events = match env::var("MONITOR_SPAN_EVENTS").as_deref() {
        Ok("full") => FmtSpan::FULL,
        Ok("enter_exit") => FmtSpan::ENTER | FmtSpan::EXIT,
        _ => FmtSpan::CLOSE,
    };

    let use_color = match env::var("FORCE_COLOR").as_deref() {
        Ok("1") | Ok("true") | Ok("yes") => true,
        Ok("0") | Ok("false") | Ok("no") => false,
        _ => std::io::stdout().is_terminal(),
    };

    // Use RUST_LOG if available, otherwise fall back to MONITOR_LOG_LEVEL
    let env_filter = if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match env::var("MONITOR_LOG_LEVEL").ok().as_deref() {
            Some("trace") => "trace",
            Some("debug") => "debug",
            Some("info") => "info",
            Some("warn") => "warn",
            Some("error") => "error",
            _ => "debug",
        };
        EnvFilter::new(format!("{level},hyper=warn,hyper_util=warn,reqwest=warn"))
    };

    tracing_subscriber::fmt()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(span_events)
        .with_env_filter(env_filter)
        .with_ansi(use_color)
        .compact()
        .init();
}
