/*
[INPUT]:  Proxy configuration and a shutdown token
[OUTPUT]: Running HTTP proxy in front of the deep research service
[POS]:    Crate root - module wiring and server startup
[UPDATE]: When adding modules or changing startup/shutdown flow
*/

pub mod config;
pub mod error;
pub mod forward;
pub mod routes;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub use config::{ProxyArgs, ProxyConfig};
pub use error::ProxyError;
pub use forward::{Forwarded, TaskProxy};

/// Bind the configured address and serve until `shutdown` is cancelled.
pub async fn serve(config: ProxyConfig, shutdown: CancellationToken) -> Result<()> {
    let proxy = TaskProxy::new(config.upstream_url.clone(), &config.client)
        .context("build upstream client")?;
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("bind {}", config.bind_addr))?;

    serve_on(listener, proxy, shutdown).await
}

/// Serve on an already bound listener.
pub async fn serve_on(
    listener: TcpListener,
    proxy: TaskProxy,
    shutdown: CancellationToken,
) -> Result<()> {
    let address = listener.local_addr().context("listener address")?;
    info!(%address, upstream = %proxy.upstream(), "research proxy listening");

    axum::serve(listener, routes::router(proxy))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .context("serve research proxy")?;

    info!("research proxy stopped");
    Ok(())
}
