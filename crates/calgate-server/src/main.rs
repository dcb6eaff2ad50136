//! calgate server entry point.

use std::process::ExitCode;

use calgate_core::{TracingConfig, init_tracing};
use calgate_server::cli::Cli;
use calgate_server::http::serve;
use calgate_server::{
    AppState, CredentialRegistry, ServerConfig, ServerError, ServerResult, Shutdown,
};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let tracing_config = if cli.debug {
        TracingConfig::debug()
    } else {
        TracingConfig::server().with_format(config.log_format)
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(&cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, config: ServerConfig) -> ServerResult<()> {
    config.validate()?;

    let credentials = config
        .credentials
        .as_ref()
        .ok_or_else(|| ServerError::config("no credentials file configured"))?;
    // A malformed descriptor must stop the process before it serves traffic.
    let registry = CredentialRegistry::load(credentials, &config.registry_settings())?;

    if cli.check {
        info!("credentials OK: {} domain(s)", registry.len());
        return Ok(());
    }

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::bind(addr.to_string(), e))?;

    let shutdown = Shutdown::new();
    shutdown.spawn_listener();

    serve(listener, AppState::new(registry), shutdown).await
}
