#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;

use args::{Args, Command};
use clap::Parser;
use errcode_config::Config;
use errcode_server::{Catalog, Server};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = Config::load(&args.config)?;
    if let Some(listen) = args.listen {
        config.server.listen_address = Some(listen);
    }

    // Initialize telemetry
    errcode_telemetry::init(&config.telemetry)?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&args.config, &config).await,
        Command::Check => check(&config),
        Command::Lookup { code } => lookup(&config, code),
    }
}

async fn serve(config_path: &std::path::Path, config: &Config) -> anyhow::Result<()> {
    tracing::info!(
        config_path = %config_path.display(),
        "starting errcode"
    );

    // Build server
    let server = Server::new(config)?;
    server.catalog().install_global()?;

    // Set up graceful shutdown
    let shutdown = CancellationToken::new();
    let shutdown_clone = shutdown.clone();

    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown_clone.cancel();
    });

    // Run server
    server.serve(shutdown).await?;

    tracing::info!("errcode stopped");
    Ok(())
}

fn check(config: &Config) -> anyhow::Result<()> {
    let catalog = Catalog::from_config(config)?;

    for info in catalog.entries() {
        match info.message {
            Some(message) => println!("{}\t{}\t{message}", info.code, info.http_status),
            None => println!("{}\t{}", info.code, info.http_status),
        }
    }

    tracing::info!(codes = catalog.registry().len(), "configuration is valid");
    Ok(())
}

fn lookup(config: &Config, code: u32) -> anyhow::Result<()> {
    let catalog = Catalog::from_config(config)?;

    match catalog.get(code) {
        Some(info) => println!("{code}\t{}", info.http_status),
        None => {
            let fallback = catalog.registry().resolve(code);
            println!("{code}\t{} (unregistered)", fallback.as_u16());
        }
    }

    Ok(())
}

/// Wait for a shutdown signal (`SIGINT` or `SIGTERM`)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("shutdown signal received");
}
