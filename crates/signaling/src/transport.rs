//! Transport-Schnittstelle
//!
//! Der Kern kennt den Transport nur ueber zwei Traits:
//! - `Transport`: vom Operator-Controller gesteuert (lauschen, stoppen, schliessen)
//! - `ServerHandler`: Callbacks, die der Transport pro Ereignis aufruft
//!
//! Senden an eine einzelne Verbindung oder an alle laeuft ueber die
//! `ClientSender`-Queue, die der Transport bei `bei_verbindung` uebergibt.

use async_trait::async_trait;
use simplechat_core::ConnectionId;
use std::io;
use std::net::SocketAddr;

use crate::broadcast::ClientSender;

/// Steuerbare Transport-Schicht des Servers
#[async_trait]
pub trait Transport: Send + Sync {
    /// Beginnt auf `port` Verbindungen anzunehmen
    ///
    /// Gibt die tatsaechlich gebundene Adresse zurueck (relevant bei Port 0).
    async fn lauschen(&self, port: u16) -> io::Result<SocketAddr>;

    /// Nimmt keine neuen Verbindungen mehr an, bestehende bleiben offen
    async fn lauschen_stoppen(&self);

    fn lauscht(&self) -> bool;

    /// Stoppt das Lauschen und trennt alle Verbindungen
    async fn schliessen(&self);
}

/// Callbacks vom Transport in den Kern
///
/// Fuer jede Verbindung werden die Aufrufe in Ankunftsreihenfolge gemacht.
/// Zwischen verschiedenen Verbindungen gibt es keine Ordnung.
pub trait ServerHandler: Send + Sync {
    fn bei_verbindung(&self, id: ConnectionId, peer: SocketAddr, sender: ClientSender);

    fn bei_nachricht(&self, id: ConnectionId, zeile: &str);

    fn bei_trennung(&self, id: ConnectionId, peer: SocketAddr);

    fn bei_lauschen_gestartet(&self, adresse: SocketAddr);

    fn bei_lauschen_gestoppt(&self);

    fn bei_empfangsfehler(&self, id: ConnectionId, fehler: &io::Error);
}
