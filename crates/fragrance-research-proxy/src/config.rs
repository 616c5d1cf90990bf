/*
[INPUT]:  CLI flags and environment variables (DEEP_RESEARCH_URL, HOST, PORT)
[OUTPUT]: Validated proxy configuration
[POS]:    Configuration layer - proxy startup settings
[UPDATE]: When adding new configuration options
*/

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use fragrance_research_adapter::ClientConfig;
use url::Url;

/// Research service address used when DEEP_RESEARCH_URL is unset
pub const DEFAULT_UPSTREAM_URL: &str = "http://localhost:5001";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "fragrance-research-proxy",
    version,
    about = "Forwards research task calls to the deep research service"
)]
pub struct ProxyArgs {
    /// Base URL of the deep research service
    #[arg(long = "upstream-url", env = "DEEP_RESEARCH_URL", default_value = DEFAULT_UPSTREAM_URL)]
    pub upstream_url: String,
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,
    /// Total timeout for one upstream call
    #[arg(long = "timeout-secs", value_name = "SECS", default_value_t = 30)]
    pub timeout_secs: u64,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub upstream_url: Url,
    pub bind_addr: SocketAddr,
    pub client: ClientConfig,
}

impl ProxyConfig {
    pub fn from_args(args: &ProxyArgs) -> Result<Self> {
        let upstream_url = Url::parse(&args.upstream_url)
            .with_context(|| format!("invalid upstream url: {}", args.upstream_url))?;
        let host: IpAddr = args
            .host
            .parse()
            .with_context(|| format!("invalid host address: {}", args.host))?;

        Ok(Self {
            upstream_url,
            bind_addr: SocketAddr::new(host, args.port),
            client: ClientConfig {
                timeout: Duration::from_secs(args.timeout_secs),
                ..ClientConfig::default()
            },
        })
    }
}
