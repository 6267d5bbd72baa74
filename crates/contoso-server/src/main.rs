#![doc = include_str!("../README.md")]

mod server;

use clap::Parser;
use contoso_core::Bank;
use server::config::{CliArgs, ServerConfig};
use server::service::{router::create_router, state::AppState};
use server::telemetry::init_telemetry;
use tokio::net::TcpListener;
use tokio::signal;

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = ServerConfig::try_from(args)?;

    let providers = init_telemetry()?;

    let bank = Bank::seeded()?;
    let state = AppState::new(bank, config.clone());
    let app = create_router(state.clone());

    let res = if config.uds {
        #[cfg(unix)]
        {
            use tokio::net::UnixListener;
            let uds_path = config.server_addr.clone();
            let uds = UnixListener::bind(&uds_path)?;
            log_startup_info(&uds_path, &config);
            let res = axum::serve(uds, app)
                .with_graceful_shutdown(shutdown_signal(state))
                .await;
            // A panic can still leave the socket file behind.
            let _ = std::fs::remove_file(&uds_path);
            res
        }
        #[cfg(not(unix))]
        {
            anyhow::bail!("Unix domain sockets are not supported on this platform");
        }
    } else {
        let tcp = TcpListener::bind(&config.server_addr).await?;
        log_startup_info(&config.server_addr, &config);
        axum::serve(tcp, app)
            .with_graceful_shutdown(shutdown_signal(state))
            .await
    };

    tracing::info!("Service shut down successfully");
    providers.shutdown();
    Ok(res?)
}

fn log_startup_info(addr: &str, config: &ServerConfig) {
    if cfg!(debug_assertions) {
        tracing::info!(
            "Starting Contoso Banking API on {} with full config: {:#?}",
            addr,
            config
        );
    } else {
        tracing::info!(
            "Starting Contoso Banking API on {} (default delay {:?}, ceiling {:?})",
            addr,
            config.default_delay,
            config.max_delay
        );
    }
}

async fn shutdown_signal(state: AppState) {
    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        () = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }

    tracing::info!("Shutdown signal received, terminating gracefully...");

    // Flip health and end every in-flight stream so open connections can
    // drain.
    state.shutdown();
}
