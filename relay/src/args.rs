use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Relay chat gateway
#[derive(Debug, Parser)]
#[command(name = "relay", about = "Ollama-compatible chat gateway for Ollama and OpenAI upstreams")]
pub struct Args {
    /// Path to configuration file; configuration comes from the environment when omitted
    #[arg(short, long, env = "RELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the listen address
    #[arg(long, env = "RELAY_LISTEN")]
    pub listen: Option<SocketAddr>,

    /// Log filter used when `RUST_LOG` is unset
    #[arg(long, default_value = "info")]
    pub log_filter: String,
}
