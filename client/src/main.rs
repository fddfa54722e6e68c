//! Simplechat Client – Einstiegspunkt

use anyhow::Result;
use clap::Parser;
use simplechat_client::config::ClientConfig;

#[derive(Parser, Debug)]
#[command(version, about = "Simplechat Client")]
struct Args {
    /// Server-Host (Standard: localhost)
    host: Option<String>,
    /// Server-Port (Standard: 5555)
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_pfad =
        std::env::var("SC_CLIENT_CONFIG").unwrap_or_else(|_| "client.toml".into());
    let mut config = ClientConfig::laden(&config_pfad)?;
    if let Some(host) = args.host {
        config.client.host = host;
    }
    if let Some(port) = args.port {
        config.client.port = port;
    }

    simplechat_observability::logging_initialisieren(
        &config.logging.level,
        &config.logging.format,
    );
    tracing::debug!(
        host = %config.client.host,
        port = config.client.port,
        "Simplechat Client wird initialisiert"
    );

    simplechat_client::starten(config).await
}
