//! TCP-Transport – Bindet Socket, akzeptiert Verbindungen
//!
//! `TcpTransport` implementiert `Transport` auf Basis von `tokio::net`.
//! Pro akzeptierter Verbindung wird eine Send-Queue angelegt, beim
//! `ServerHandler` registriert und ein `ClientConnection`-Task gestartet.
//!
//! Lauschen und Verbindungen sind entkoppelt: `lauschen_stoppen` beendet nur
//! die Accept-Loop, `schliessen` trennt zusaetzlich alle Verbindungen ueber
//! ein gemeinsames Trenn-Signal.

use async_trait::async_trait;
use parking_lot::Mutex;
use simplechat_core::ConnectionId;
use simplechat_protocol::wire::DEFAULT_MAX_ZEILEN_LAENGE;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;

use crate::broadcast::ClientSender;
use crate::connection::ClientConnection;
use crate::transport::{ServerHandler, Transport};

/// Standard-Timeout fuer Schreibvorgaenge auf eine Verbindung
pub const DEFAULT_SCHREIB_TIMEOUT_SEK: u64 = 5;

/// Konfiguration des TCP-Transports
#[derive(Debug, Clone)]
pub struct TcpTransportKonfig {
    pub bind_adresse: IpAddr,
    /// Groesse der Send-Queue pro Verbindung
    pub send_queue_groesse: usize,
    pub max_zeilen_laenge: usize,
    /// Maximale Dauer eines Socket-Schreibvorgangs, danach wird getrennt
    pub schreib_timeout: Duration,
}

impl Default for TcpTransportKonfig {
    fn default() -> Self {
        Self {
            bind_adresse: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            send_queue_groesse: 64,
            max_zeilen_laenge: DEFAULT_MAX_ZEILEN_LAENGE,
            schreib_timeout: Duration::from_secs(DEFAULT_SCHREIB_TIMEOUT_SEK),
        }
    }
}

struct Lauscher {
    stopp_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

pub struct TcpTransport {
    handler: Arc<dyn ServerHandler>,
    konfig: TcpTransportKonfig,
    lauscher: Mutex<Option<Lauscher>>,
    /// Trenn-Signal fuer alle Verbindungen der aktuellen Generation
    trennen_tx: Mutex<watch::Sender<bool>>,
    verbindungen: TaskTracker,
}

impl TcpTransport {
    pub fn neu(handler: Arc<dyn ServerHandler>, konfig: TcpTransportKonfig) -> Self {
        let (trennen_tx, _) = watch::channel(false);
        Self {
            handler,
            konfig,
            lauscher: Mutex::new(None),
            trennen_tx: Mutex::new(trennen_tx),
            verbindungen: TaskTracker::new(),
        }
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn lauschen(&self, port: u16) -> io::Result<SocketAddr> {
        if self.lauscht() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                "Transport lauscht bereits",
            ));
        }

        let listener = TcpListener::bind((self.konfig.bind_adresse, port)).await?;
        let adresse = listener.local_addr()?;

        let (stopp_tx, stopp_rx) = watch::channel(false);
        let accept = AcceptLoop {
            listener,
            handler: Arc::clone(&self.handler),
            konfig: self.konfig.clone(),
            trennen_rx: self.trennen_tx.lock().subscribe(),
            verbindungen: self.verbindungen.clone(),
        };
        let task = tokio::spawn(accept.laufen(stopp_rx));

        *self.lauscher.lock() = Some(Lauscher { stopp_tx, task });
        self.handler.bei_lauschen_gestartet(adresse);
        Ok(adresse)
    }

    async fn lauschen_stoppen(&self) {
        let lauscher = self.lauscher.lock().take();
        let Some(lauscher) = lauscher else {
            return;
        };

        let _ = lauscher.stopp_tx.send(true);
        if let Err(e) = lauscher.task.await {
            tracing::error!(fehler = %e, "Accept-Loop abgebrochen");
        }
        self.handler.bei_lauschen_gestoppt();
    }

    fn lauscht(&self) -> bool {
        self.lauscher.lock().is_some()
    }

    async fn schliessen(&self) {
        self.lauschen_stoppen().await;

        // Neue Generation fuer spaetere Verbindungen, alte wird getrennt
        let (neu_tx, _) = watch::channel(false);
        let alt_tx = std::mem::replace(&mut *self.trennen_tx.lock(), neu_tx);
        let _ = alt_tx.send(true);

        self.verbindungen.close();
        self.verbindungen.wait().await;
        self.verbindungen.reopen();
        tracing::info!("Alle Verbindungen getrennt");
    }
}

/// Accept-Loop (laeuft in einem eigenen Task)
struct AcceptLoop {
    listener: TcpListener,
    handler: Arc<dyn ServerHandler>,
    konfig: TcpTransportKonfig,
    trennen_rx: watch::Receiver<bool>,
    verbindungen: TaskTracker,
}

impl AcceptLoop {
    async fn laufen(self, mut stopp_rx: watch::Receiver<bool>) {
        loop {
            tokio::select! {
                // Neue eingehende Verbindung
                result = self.listener.accept() => {
                    match result {
                        Ok((stream, peer_addr)) => {
                            let id = ConnectionId::new();
                            let (tx, rx) = mpsc::channel(self.konfig.send_queue_groesse);

                            // Registrieren bevor die erste Zeile gelesen wird
                            self.handler.bei_verbindung(id, peer_addr, ClientSender::neu(id, tx));

                            let verbindung = ClientConnection {
                                id,
                                peer_addr,
                                handler: Arc::clone(&self.handler),
                                max_zeilen_laenge: self.konfig.max_zeilen_laenge,
                                schreib_timeout: self.konfig.schreib_timeout,
                            };
                            let trennen_rx = self.trennen_rx.clone();
                            self.verbindungen.spawn(verbindung.verarbeiten(stream, rx, trennen_rx));
                        }
                        Err(e) => {
                            tracing::error!(fehler = %e, "TCP-Accept-Fehler");
                            tokio::time::sleep(Duration::from_millis(10)).await;
                        }
                    }
                }

                // Stopp-Signal
                Ok(()) = stopp_rx.changed() => {
                    if *stopp_rx.borrow() {
                        break;
                    }
                }
            }
        }
        tracing::debug!("Accept-Loop beendet");
    }
}
