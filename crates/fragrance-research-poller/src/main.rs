/*
[INPUT]:  CLI arguments, optional YAML configuration file, OS shutdown signals
[OUTPUT]: One research task followed to completion, recommendations printed as JSON
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or shutdown handling
*/

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fragrance_research_adapter::{ClientConfig, ResearchClient};
use fragrance_research_poller::{PollerConfig, PollerPhase, TaskPoller, TaskSnapshot};

const REMOTE_CANCEL_GRACE: Duration = Duration::from_secs(5);

#[derive(Parser, Debug)]
#[command(name = "fragrance-research-poller", version, about = "Run one deep research task and follow it to completion")]
struct Cli {
    #[arg(long = "config", value_name = "PATH")]
    config_path: Option<PathBuf>,
    #[arg(long = "api-url", value_name = "URL", env = "RESEARCH_API_URL")]
    api_url: Option<String>,
    /// Fragrance note to research; repeat for several
    #[arg(long = "note", value_name = "NOTE")]
    notes: Vec<String>,
    #[arg(long = "preferences", value_name = "TEXT")]
    preferences: Option<String>,
    #[arg(long = "poll-interval-ms", value_name = "MS")]
    poll_interval_ms: Option<u64>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: String,
    #[arg(long = "dry-run")]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    let config = load_config(&args)?;
    let request = config.validate().context("validate config")?;
    info!(
        api_url = %config.api_url,
        notes = request.notes().len(),
        poll_interval_ms = config.poll_interval_ms,
        dry_run = args.dry_run,
        "starting fragrance-research-poller"
    );

    if args.dry_run {
        info!("dry-run requested; configuration validated");
        return Ok(());
    }

    let client = ResearchClient::with_config_and_base_url(ClientConfig::default(), &config.api_url)
        .context("build research client")?;
    let poller = TaskPoller::with_options(Arc::new(client), config.options());

    let shutdown = CancellationToken::new();
    setup_signal_handlers(shutdown.clone());

    let mut updates = poller.subscribe();
    let task_id = poller
        .start(request.notes().to_vec(), request.preferences())
        .await
        .context("start research task")?;
    info!(task_id, "research task accepted");

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("shutdown signal received");
                if let Some(remote) = poller.cancel() {
                    if tokio::time::timeout(REMOTE_CANCEL_GRACE, remote).await.is_err() {
                        warn!("remote cancel did not finish in time");
                    }
                }
                break;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                log_snapshot(&snapshot);
                if !snapshot.in_progress() {
                    break;
                }
            }
        }
    }

    report(poller.snapshot())
}

fn log_snapshot(snapshot: &TaskSnapshot) {
    info!(
        phase = ?snapshot.phase,
        task_id = ?snapshot.task_id,
        status = ?snapshot.status,
        progress = snapshot.progress,
        message = %snapshot.message,
        "research progress"
    );
}

fn report(snapshot: TaskSnapshot) -> Result<()> {
    match snapshot.phase {
        PollerPhase::Completed => {
            let output = serde_json::to_string_pretty(&snapshot.recommendations)
                .context("serialize recommendations")?;
            println!("{output}");
            info!(count = snapshot.recommendations.len(), "research completed");
            Ok(())
        }
        PollerPhase::Failed => Err(anyhow!(
            "research failed: {}",
            snapshot.error.unwrap_or_else(|| snapshot.message.clone())
        )),
        phase => {
            warn!(?phase, "research ended without results");
            Ok(())
        }
    }
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

fn load_config(args: &Cli) -> Result<PollerConfig> {
    let mut config = match &args.config_path {
        Some(path) => {
            let path_str = path
                .to_str()
                .context("config path must be valid utf-8")?;
            PollerConfig::from_file(path_str).context("load config")?
        }
        None => PollerConfig::default(),
    };

    if let Some(api_url) = &args.api_url {
        config.api_url = api_url.clone();
    }
    if !args.notes.is_empty() {
        config.notes = args.notes.clone();
    }
    if let Some(preferences) = &args.preferences {
        config.preferences = preferences.clone();
    }
    if let Some(poll_interval_ms) = args.poll_interval_ms {
        config.poll_interval_ms = poll_interval_ms;
    }
    Ok(config)
}

fn setup_signal_handlers(shutdown: CancellationToken) {
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install SIGINT handler");
            return;
        }
        info!("received SIGINT");
        shutdown_clone.cancel();
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let shutdown_clone = shutdown.clone();
        tokio::spawn(async move {
            match signal(SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                    info!("received SIGTERM");
                    shutdown_clone.cancel();
                }
                Err(err) => {
                    warn!(error = %err, "failed to install SIGTERM handler");
                }
            }
        });
    }
}
