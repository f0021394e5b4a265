//! HTTP surface — axum router around the `CodeAgent`.
//!
//! Every request is independent: the state holds only the immutable agent
//! handle and the static directory, nothing that changes per request.

mod error;
pub mod handlers;
mod routes;

use std::net::SocketAddr;
use std::path::PathBuf;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use crate::agent::CodeAgent;
use crate::config::AgentConfig;
use crate::llm::client::LlmError;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;

#[derive(Clone)]
pub struct AppState {
    pub agent: CodeAgent,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(agent: CodeAgent, static_dir: PathBuf) -> Self {
        Self { agent, static_dir }
    }
}

pub struct Server {
    state: AppState,
    addr: SocketAddr,
}

impl Server {
    /// Build the server and its provider-backed agent from configuration.
    pub fn new(config: &AgentConfig) -> Result<Self, LlmError> {
        let agent = CodeAgent::from_config(config)?;
        Ok(Self {
            state: AppState::new(agent, config.server.static_dir.clone()),
            addr: config.server.bind,
        })
    }

    pub async fn run(self) -> std::io::Result<()> {
        let router = create_router(self.state);
        let listener = TcpListener::bind(self.addr).await?;

        info!("Code generation API listening on http://{}", listener.local_addr()?);
        info!("  GET  /generate?query=<text> - Generate code");
        info!("  POST /generate              - Generate code (JSON body)");
        info!("  GET  /health                - Liveness probe");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully");
        },
    }
}
