use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use llmrelay_core::config::RelayConfig;
use llmrelay_core::logging::{ConsoleLogger, Logger};

/// OpenAI-compatible relay with API key rotation and prompt-level tools
#[derive(Debug, Parser)]
#[command(name = "llmrelay-server", version, about)]
struct Cli {
    /// Config file (default: <config_dir>/llmrelay/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listen host
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port
    #[arg(short, long)]
    port: Option<u16>,

    /// Print debug logs
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let logger: Arc<dyn Logger> = Arc::new(ConsoleLogger::new().verbose(cli.verbose));

    let path = cli.config.unwrap_or_else(RelayConfig::user_path);
    let mut config = match RelayConfig::load(&path) {
        Ok(config) => config,
        Err(err) => {
            logger.error(&format!("[Server] Cannot load {}: {}", path.display(), err));
            std::process::exit(1);
        }
    };
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    if let Err(err) = llmrelay_server::serve(&config, Arc::clone(&logger)).await {
        logger.error(&format!("[Server] {}", err));
        std::process::exit(1);
    }
}
