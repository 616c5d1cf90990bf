/*
[INPUT]:  CLI arguments, environment variables, OS shutdown signals
[OUTPUT]: Running research proxy with graceful shutdown
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or shutdown handling
*/

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tokio::signal::ctrl_c;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use fragrance_research_proxy::{ProxyArgs, ProxyConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let args = ProxyArgs::parse();

    // RUST_LOG wins over --log-level when set.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .context("invalid log level")?;
    fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| anyhow!(err))?;

    let config = ProxyConfig::from_args(&args).context("load proxy config")?;
    info!(
        upstream = %config.upstream_url,
        bind = %config.bind_addr,
        "starting fragrance-research-proxy"
    );

    let shutdown = CancellationToken::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        trigger.cancel();
    });

    fragrance_research_proxy::serve(config, shutdown).await
}

/// Resolves on the first SIGINT or SIGTERM. A handler that fails to install never fires.
async fn shutdown_signal() {
    let interrupt = async {
        match ctrl_c().await {
            Ok(()) => info!("received Ctrl+C, shutting down"),
            Err(err) => {
                warn!(error = %err, "failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(err) => {
                warn!(error = %err, "failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => {},
        _ = terminate => {},
    }
}
