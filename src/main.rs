use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use codegen_agent::{AgentConfig, Server};

/// HTTP code generation agent backed by a chat-completion API.
#[derive(Debug, Parser)]
#[command(name = "codegen-agent", version)]
struct Args {
    /// YAML config file (models, provider, server sections).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on; overrides `server.bind`.
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// Directory holding `favicon.ico`; overrides `server.static_dir`.
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine.
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "codegen_agent=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AgentConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AgentConfig::default(),
    }
    .with_env_overrides();

    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(dir) = args.static_dir {
        config.server.static_dir = dir;
    }

    config.warn_if_unconfigured();

    let server = Server::new(&config).context("building HTTP client")?;
    server.run().await.context("serving HTTP")?;
    Ok(())
}
