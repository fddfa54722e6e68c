//! Simplechat Server – Einstiegspunkt
//!
//! Laedt die Konfiguration, initialisiert das Logging und startet den Server.

use anyhow::Result;
use clap::Parser;
use simplechat_server::{config::ServerConfig, Server};

#[derive(Parser, Debug)]
#[command(version, about = "Simplechat Server")]
struct Args {
    /// Port fuer eingehende Verbindungen (Standard: 5555)
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Konfigurationsdatei-Pfad aus Umgebungsvariable oder Standard
    let config_pfad =
        std::env::var("SC_SERVER_CONFIG").unwrap_or_else(|_| "server.toml".into());

    // Konfiguration laden (Standardwerte falls Datei fehlt)
    let mut config = ServerConfig::laden(&config_pfad)?;
    if let Some(port) = args.port {
        config.server.port = port;
    }

    simplechat_observability::logging_initialisieren(
        &config.logging.level,
        &config.logging.format,
    );

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_pfad,
        "Simplechat Server wird initialisiert"
    );

    Server::neu(config).starten().await
}
