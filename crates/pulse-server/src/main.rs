use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use pulse_cache::{CacheSettings, UpdateCache};
use pulse_config::PulseConfig;
use pulse_core::SystemClock;
use pulse_feed::FeedFetcher;
use pulse_server::{AppState, router};
use pulse_summarize::AnthropicClient;

/// Serve summarized development updates for one social account.
#[derive(Debug, Parser)]
#[command(name = "devpulse", version, about)]
struct Cli {
    /// Interface to bind (overrides `server.host`).
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides `server.port`).
    #[arg(long, short)]
    port: Option<u16>,

    /// Enable debug logging.
    #[arg(long, short, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors.
    #[arg(long, short)]
    quiet: bool,
}

impl Cli {
    fn apply(&self, config: &mut PulseConfig) {
        if let Some(host) = &self.host {
            config.server.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("devpulse error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let mut config = PulseConfig::load_with_dotenv().context("failed to load configuration")?;
    cli.apply(&mut config);
    warn_unconfigured(&config);

    let fetcher = FeedFetcher::from_config(&config.feed).context("failed to build feed client")?;
    let summarizer = AnthropicClient::new(
        &config.anthropic,
        &config.feed.account,
        config.feed.window_days,
    )
    .context("failed to build model client")?;
    let cache = UpdateCache::new(
        fetcher,
        summarizer,
        Arc::new(SystemClock),
        CacheSettings::from_config(&config),
    );
    let app = router(AppState::new(cache, &config.server), &config.server.api_prefix);

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(
        %addr,
        prefix = %config.server.api_prefix,
        environment = %config.server.environment,
        "devpulse listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("devpulse stopped");
    Ok(())
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("DEVPULSE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

fn warn_unconfigured(config: &PulseConfig) {
    if !config.anthropic.is_configured() {
        tracing::warn!(
            "anthropic.api_key is not set; /developments will fail until DEVPULSE_ANTHROPIC__API_KEY is provided"
        );
    }
    if !config.feed.is_configured() {
        tracing::warn!("feed is not configured; set feed.account and at least one mirror");
    }
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
