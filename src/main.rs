// Cartwatch entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Build the store client
// 4. Create mpsc channels
// 5. Spawn the app orchestrator task (triggers the initial fetch)
// 6. Run the TUI event loop (blocking until the user quits)
// 7. Cleanup on exit

use cartwatch::app;
use cartwatch::config;
use cartwatch::store::StoreClient;
use cartwatch::tui;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, not the terminal the TUI owns)
    init_tracing()?;
    info!("Cartwatch starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: store={}, table={}, page_size={}",
        config.store.url, config.store.table, config.store.page_size
    );

    // 3. Build the store client
    let store = StoreClient::from_config(&config);
    match &store {
        StoreClient::Active(_) => info!("Store client initialized (service key configured)"),
        StoreClient::Unconfigured => {
            info!("Store client unconfigured (no service key); fetches will fail with a notice")
        }
    }

    // 4. Create mpsc channels
    let (fetch_tx, fetch_rx) = mpsc::channel(64);
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    // 5. Spawn the app orchestrator task
    let app_state = app::AppState::new(config, store, fetch_tx);
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(fetch_rx, cmd_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    // 6. Run the TUI event loop (blocking until the user quits)
    if let Err(e) = tui::run(ui_rx, cmd_tx).await {
        error!("TUI error: {}", e);
    }

    // 7. Cleanup: wait for the app task to finish (with timeout)
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("Cartwatch shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("cartwatch.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cartwatch=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
