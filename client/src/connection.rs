//! Client-seitige TCP-Verbindung zum Chat-Server
//!
//! Nutzt den `ZeilenCodec` aus simplechat-protocol fuer das Wire-Format
//! (UTF-8 Zeilen, `\n`-terminiert). Eingehende Zeilen liest ein eigener
//! Task und gibt sie direkt auf der Console aus.

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use simplechat_core::{ChatError, Console, Result};
use simplechat_protocol::{hinweise, ZeilenCodec};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::codec::Framed;

/// Verbindung des Clients zum Server
///
/// Abstrahiert den Socket, damit der `ClientController` ohne Netzwerk
/// testbar bleibt.
#[async_trait]
pub trait ClientTransport: Send + Sync {
    /// Baut die Verbindung zu `host:port` auf
    async fn oeffnen(&mut self, host: &str, port: u16) -> Result<()>;

    /// Trennt die Verbindung, ohne den Client zu beenden
    async fn schliessen(&mut self);

    /// Sendet eine Zeile an den Server
    async fn senden(&mut self, zeile: &str) -> Result<()>;

    fn ist_verbunden(&self) -> bool;
}

type ZeilenSink = SplitSink<Framed<TcpStream, ZeilenCodec>, String>;
type ZeilenStream = SplitStream<Framed<TcpStream, ZeilenCodec>>;

struct AktiveVerbindung {
    sink: ZeilenSink,
    leser: JoinHandle<()>,
}

/// Echte TCP-Verbindung zum Chat-Server
pub struct TcpClientTransport {
    console: Arc<dyn Console>,
    max_zeilen_laenge: usize,
    /// Liest der Server nicht mehr, schlaegt das Senden danach fehl
    schreib_timeout: Duration,
    verbindung: Option<AktiveVerbindung>,
    /// Wird gesetzt wenn der Server die Verbindung beendet
    ende_tx: Arc<watch::Sender<bool>>,
}

impl TcpClientTransport {
    pub fn neu(
        console: Arc<dyn Console>,
        max_zeilen_laenge: usize,
        schreib_timeout: Duration,
    ) -> Self {
        let (ende_tx, _) = watch::channel(false);
        Self {
            console,
            max_zeilen_laenge,
            schreib_timeout,
            verbindung: None,
            ende_tx: Arc::new(ende_tx),
        }
    }

    /// Signal, das `true` wird sobald die Verbindung serverseitig endet
    /// und der Client sich beenden soll
    pub fn ende_signal(&self) -> watch::Receiver<bool> {
        self.ende_tx.subscribe()
    }
}

#[async_trait]
impl ClientTransport for TcpClientTransport {
    async fn oeffnen(&mut self, host: &str, port: u16) -> Result<()> {
        if self.ist_verbunden() {
            return Err(ChatError::UngueltigerZustand("bereits verbunden".into()));
        }
        // Reste einer serverseitig beendeten Verbindung verwerfen
        self.verbindung = None;

        tracing::info!(host = host, port = port, "Verbinde mit Server");
        let stream = TcpStream::connect((host, port)).await?;
        let (sink, stream) =
            Framed::new(stream, ZeilenCodec::with_max_length(self.max_zeilen_laenge)).split();

        let leser = tokio::spawn(lese_schleife(
            stream,
            Arc::clone(&self.console),
            Arc::clone(&self.ende_tx),
        ));
        self.verbindung = Some(AktiveVerbindung { sink, leser });
        tracing::info!(host = host, port = port, "TCP-Verbindung hergestellt");
        Ok(())
    }

    async fn schliessen(&mut self) {
        if let Some(mut verbindung) = self.verbindung.take() {
            // Leser zuerst stoppen, sonst meldet er das Ende als Serverabbruch
            verbindung.leser.abort();
            if let Err(e) = verbindung.sink.close().await {
                tracing::debug!(fehler = %e, "Fehler beim Schliessen der Verbindung");
            }
            tracing::info!("TCP-Verbindung getrennt");
        }
    }

    async fn senden(&mut self, zeile: &str) -> Result<()> {
        let verbindung = self
            .verbindung
            .as_mut()
            .ok_or_else(|| ChatError::UngueltigerZustand("nicht verbunden".into()))?;
        tokio::time::timeout(self.schreib_timeout, verbindung.sink.send(zeile.to_string()))
            .await
            .map_err(|_| {
                io::Error::new(
                    io::ErrorKind::TimedOut,
                    "Server nimmt keine Daten mehr an",
                )
            })??;
        Ok(())
    }

    fn ist_verbunden(&self) -> bool {
        self.verbindung
            .as_ref()
            .is_some_and(|v| !v.leser.is_finished())
    }
}

/// Gibt eingehende Zeilen aus bis der Server die Verbindung beendet
async fn lese_schleife(
    mut stream: ZeilenStream,
    console: Arc<dyn Console>,
    ende_tx: Arc<watch::Sender<bool>>,
) {
    loop {
        match stream.next().await {
            Some(Ok(zeile)) => console.display(&zeile),
            Some(Err(e)) => {
                tracing::warn!(fehler = %e, "Empfangsfehler");
                break;
            }
            None => {
                tracing::info!("Server hat die Verbindung beendet");
                break;
            }
        }
    }
    console.display(hinweise::SERVER_WEG);
    ende_tx.send_replace(true);
}
