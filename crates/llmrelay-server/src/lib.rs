//! LLMRelay Server
//!
//! Exposes a [`ChatService`] as an OpenAI-compatible HTTP endpoint:
//!
//! - `GET /health`: liveness plus model name and call counters
//! - `POST /v1/chat/completions`: the completion, or one synthetic stream chunk
//! - `GET /v1/models`: the single configured model
//!
//! With tools enabled in the config the service is a `ToolOrchestrator`,
//! otherwise requests go straight to the `RotatingClient`.

pub mod builtin;
mod routes;

pub use routes::{router, AppState, MAX_BODY_BYTES};

use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

use llmrelay_core::client::{ChatService, LlmError, RotatingClient};
use llmrelay_core::config::{ConfigError, RelayConfig};
use llmrelay_core::logging::Logger;
use llmrelay_core::orchestrator::ToolOrchestrator;
use llmrelay_core::tools::{ToolError, ToolRegistry};
use llmrelay_core::transport::create_transport;

/// Errors that stop the server from starting
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ServerResult<T> = Result<T, ServerError>;

/// Build the service described by `config`
///
/// An empty `tools` list yields the plain client; otherwise the built-in
/// tools are registered and an orchestrator is built over them.
pub fn build_service(
    config: &RelayConfig,
    logger: Arc<dyn Logger>,
) -> ServerResult<Arc<dyn ChatService>> {
    let transport = create_transport(config.llm.base_url(), Arc::clone(&logger));
    let client = RotatingClient::new(
        config.llm.clone(),
        config.retries,
        transport,
        Arc::clone(&logger),
    )?;

    if config.tools.is_empty() {
        logger.info("[Server] No tools enabled, serving the plain client");
        return Ok(Arc::new(client));
    }

    let registry = ToolRegistry::new(Arc::clone(&logger));
    builtin::register(&registry)?;

    let orchestrator = ToolOrchestrator::new(
        Arc::new(client),
        Arc::new(registry),
        config.tools.clone(),
        config.orchestrator.clone(),
        logger,
    )?;
    Ok(Arc::new(orchestrator))
}

/// Bind to the configured address and serve until Ctrl-C
pub async fn serve(config: &RelayConfig, logger: Arc<dyn Logger>) -> ServerResult<()> {
    let shutdown_logger = Arc::clone(&logger);
    serve_until(config, logger, async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            shutdown_logger.error(&format!("[Server] Cannot listen for Ctrl-C: {}", err));
            std::future::pending::<()>().await;
        }
        shutdown_logger.info("[Server] Shutting down");
    })
    .await
}

/// Serve until `shutdown` resolves, then finish in-flight requests
pub async fn serve_until<F>(
    config: &RelayConfig,
    logger: Arc<dyn Logger>,
    shutdown: F,
) -> ServerResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let service = build_service(config, Arc::clone(&logger))?;
    let app = router(AppState::new(service, Arc::clone(&logger)));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    logger.info(&format!(
        "[Server] Listening on http://{}",
        listener.local_addr()?
    ));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    logger.info("[Server] Stopped");
    Ok(())
}
