//! Client-Connection – Verarbeitet eine einzelne TCP-Verbindung
//!
//! Jede TCP-Verbindung laeuft in einem eigenen tokio-Task. Der Task liest
//! Zeilen vom Socket und reicht sie in Ankunftsreihenfolge an den
//! `ServerHandler` weiter, und er schreibt die Send-Queue der Verbindung auf
//! den Socket.
//!
//! ## Ende der Verbindung
//! - Client schliesst den Socket oder Lesefehler
//! - Send-Queue geschlossen (Verbindung aus der Registry entfernt)
//! - Schreibfehler oder Schreib-Timeout (Gegenstelle liest nicht mehr)
//! - Trenn-Signal vom Transport (`schliessen`)
//!
//! In jedem Fall wird `bei_trennung` genau einmal aufgerufen.

use futures_util::{SinkExt, StreamExt};
use simplechat_core::ConnectionId;
use simplechat_protocol::ZeilenCodec;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio_util::codec::Framed;

use crate::transport::ServerHandler;

pub(crate) struct ClientConnection {
    pub id: ConnectionId,
    pub peer_addr: SocketAddr,
    pub handler: Arc<dyn ServerHandler>,
    pub max_zeilen_laenge: usize,
    pub schreib_timeout: Duration,
}

impl ClientConnection {
    /// Verarbeitungsschleife bis zum Ende der Verbindung
    pub async fn verarbeiten(
        self,
        stream: TcpStream,
        mut ausgehend_rx: mpsc::Receiver<String>,
        mut trennen_rx: watch::Receiver<bool>,
    ) {
        let id = self.id;
        let peer_addr = self.peer_addr;
        let mut framed = Framed::new(stream, ZeilenCodec::with_max_length(self.max_zeilen_laenge));

        loop {
            tokio::select! {
                // Eingehende Zeile vom Client
                zeile = framed.next() => {
                    match zeile {
                        Some(Ok(zeile)) => self.handler.bei_nachricht(id, &zeile),
                        Some(Err(e)) => {
                            self.handler.bei_empfangsfehler(id, &e);
                            break;
                        }
                        None => {
                            tracing::debug!(verbindung = %id, "Verbindung vom Client getrennt");
                            break;
                        }
                    }
                }

                // Ausgehende Zeile aus der Send-Queue
                ausgehend = ausgehend_rx.recv() => {
                    match ausgehend {
                        Some(zeile) => {
                            match tokio::time::timeout(self.schreib_timeout, framed.send(zeile)).await {
                                Ok(Ok(())) => {}
                                Ok(Err(e)) => {
                                    tracing::warn!(
                                        verbindung = %id,
                                        fehler = %e,
                                        "Senden fehlgeschlagen"
                                    );
                                    break;
                                }
                                Err(_) => {
                                    tracing::warn!(
                                        verbindung = %id,
                                        timeout_ms = self.schreib_timeout.as_millis() as u64,
                                        "Schreib-Timeout, Gegenstelle liest nicht"
                                    );
                                    break;
                                }
                            }
                        }
                        None => {
                            tracing::debug!(verbindung = %id, "Send-Queue geschlossen");
                            break;
                        }
                    }
                }

                // Trenn-Signal
                Ok(()) = trennen_rx.changed() => {
                    if *trennen_rx.borrow() {
                        tracing::debug!(verbindung = %id, "Trenn-Signal – Verbindung wird geschlossen");
                        break;
                    }
                }
            }
        }

        self.handler.bei_trennung(id, peer_addr);
        tracing::debug!(verbindung = %id, "Verbindungs-Task beendet");
    }
}
