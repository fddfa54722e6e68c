//! simplechat-server – Bibliotheks-Root
//!
//! Verdrahtet Konfiguration, Chat-Kern, TCP-Transport und Operator-Console.

pub mod config;

use anyhow::Result;
use config::ServerConfig;
use simplechat_core::{Console, StdoutConsole, Steuerung};
use simplechat_signaling::{ChatServer, OperatorController, TcpTransport, Transport};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Startet den Server und liest Operator-Befehle von stdin
    ///
    /// Reihenfolge:
    /// 1. Chat-Kern und TCP-Transport aufbauen
    /// 2. Auf dem konfigurierten Port lauschen (wie `#start`)
    /// 3. Operator-Console bis `#quit`, EOF oder Ctrl-C
    pub async fn starten(self) -> Result<()> {
        let console: Arc<dyn Console> = Arc::new(StdoutConsole::neu());
        let chat = ChatServer::neu(console);
        let transport = TcpTransport::neu(chat.clone(), self.config.transport_konfig());
        let mut controller = OperatorController::neu(transport, chat, self.config.server.port);

        tracing::info!(port = self.config.server.port, "Server startet");
        controller.starten().await;

        let stdin = BufReader::new(tokio::io::stdin());
        let signal = tokio::select! {
            ergebnis = console_schleife(&mut controller, stdin) => {
                ergebnis?;
                false
            }
            _ = tokio::signal::ctrl_c() => true,
        };
        if signal {
            tracing::info!("Shutdown-Signal empfangen, Server wird beendet");
            controller.eingabe_verarbeiten("#quit").await;
        }
        Ok(())
    }
}

/// Liest Operator-Zeilen bis `#quit` oder EOF
///
/// Bei EOF wird der Server wie bei `#quit` geschlossen.
pub async fn console_schleife<T, R>(
    controller: &mut OperatorController<T>,
    eingabe: R,
) -> Result<()>
where
    T: Transport,
    R: AsyncBufRead + Unpin,
{
    let mut zeilen = eingabe.lines();
    while let Some(zeile) = zeilen.next_line().await? {
        if controller.eingabe_verarbeiten(&zeile).await == Steuerung::Beenden {
            return Ok(());
        }
    }
    tracing::debug!("Console-Eingabe beendet");
    controller.eingabe_verarbeiten("#quit").await;
    Ok(())
}
