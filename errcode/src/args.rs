use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Error code catalog service
#[derive(Debug, Parser)]
#[command(name = "errcode", about = "Serve and validate error code catalogs")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "errcode.toml", env = "ERRCODE_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "ERRCODE_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Serve the catalog over HTTP (default)
    Serve,
    /// Validate the configuration and print the catalog
    Check,
    /// Print the HTTP status a code resolves to
    Lookup {
        /// Error code
        code: u32,
    },
}
