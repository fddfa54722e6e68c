//! simplechat-client – Bibliotheks-Root
//!
//! Konsolen-Client: liest Zeilen von stdin, fuehrt lokale Befehle aus und
//! sendet alles andere an den Server.

pub mod config;
pub mod connection;
pub mod controller;

pub use connection::{ClientTransport, TcpClientTransport};
pub use controller::ClientController;

use anyhow::Result;
use config::ClientConfig;
use simplechat_core::{Console, StdoutConsole, Steuerung};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::watch;

/// Startet den Client mit der gegebenen Konfiguration
///
/// Versucht sofort zu verbinden; schlaegt das fehl, wartet der Client auf
/// Befehle wie `#sethost` und `#login`.
pub async fn starten(config: ClientConfig) -> Result<()> {
    let console: Arc<dyn Console> = Arc::new(StdoutConsole::mit_praefix("> "));
    let transport = TcpClientTransport::neu(
        Arc::clone(&console),
        config.client.max_zeilen_laenge,
        config.schreib_timeout(),
    );
    let ende = transport.ende_signal();
    let mut controller =
        ClientController::neu(transport, console, config.client.host, config.client.port);

    controller.verbinden().await;

    let stdin = BufReader::new(tokio::io::stdin());
    console_schleife(&mut controller, stdin, ende).await
}

/// Liest Console-Zeilen bis `#quit`, EOF oder Serverabbruch
pub async fn console_schleife<T, R>(
    controller: &mut ClientController<T>,
    eingabe: R,
    mut ende: watch::Receiver<bool>,
) -> Result<()>
where
    T: ClientTransport,
    R: AsyncBufRead + Unpin,
{
    let mut zeilen = eingabe.lines();
    loop {
        tokio::select! {
            zeile = zeilen.next_line() => match zeile? {
                Some(zeile) => {
                    if controller.eingabe_verarbeiten(&zeile).await == Steuerung::Beenden {
                        return Ok(());
                    }
                }
                None => {
                    tracing::debug!("Console-Eingabe beendet");
                    controller.eingabe_verarbeiten("#quit").await;
                    return Ok(());
                }
            },
            geaendert = ende.changed() => {
                if geaendert.is_err() || *ende.borrow() {
                    tracing::info!("Verbindung serverseitig beendet, Client wird beendet");
                    return Ok(());
                }
            }
        }
    }
}
