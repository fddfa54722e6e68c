//! Gemeinsamer Server-Zustand
//!
//! `ChatServer` buendelt Registry, Broadcast-Router und Session-Gate und
//! nimmt die Callbacks des Transports entgegen. Er wird als `Arc` zwischen
//! Transport-Tasks und Operator-Controller geteilt.

use simplechat_core::{Console, ConnectionId};
use simplechat_protocol::hinweise;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::broadcast::{BroadcastRouter, ClientSender};
use crate::gate::SessionGate;
use crate::registry::ConnectionRegistry;
use crate::transport::ServerHandler;

pub struct ChatServer {
    /// Lebende Verbindungen und ihr Login-Zustand
    pub registry: Arc<ConnectionRegistry>,
    /// Verteilt Nachrichten an alle Verbindungen
    pub router: BroadcastRouter,
    gate: SessionGate,
    console: Arc<dyn Console>,
}

impl ChatServer {
    pub fn neu(console: Arc<dyn Console>) -> Arc<Self> {
        let registry = Arc::new(ConnectionRegistry::neu());
        let router = BroadcastRouter::neu(Arc::clone(&registry));
        let gate = SessionGate::neu(Arc::clone(&registry), router.clone(), Arc::clone(&console));
        Arc::new(Self {
            registry,
            router,
            gate,
            console,
        })
    }

    pub fn console(&self) -> &Arc<dyn Console> {
        &self.console
    }
}

impl ServerHandler for ChatServer {
    fn bei_verbindung(&self, id: ConnectionId, peer: SocketAddr, sender: ClientSender) {
        if let Err(e) = self.registry.registrieren(id, peer, sender) {
            tracing::error!(verbindung = %id, fehler = %e, "Registrierung fehlgeschlagen");
            return;
        }
        tracing::info!(verbindung = %id, peer = %peer, "Neue Verbindung");
        self.console.display(&hinweise::willkommen(&peer.to_string()));
    }

    fn bei_nachricht(&self, id: ConnectionId, zeile: &str) {
        tracing::trace!(verbindung = %id, "Zeile empfangen");
        if let Err(e) = self.gate.zeile_verarbeiten(id, zeile) {
            tracing::warn!(verbindung = %id, fehler = %e, "Zeile konnte nicht verarbeitet werden");
        }
    }

    fn bei_trennung(&self, id: ConnectionId, peer: SocketAddr) {
        let verbindung = self.registry.entfernen(&id);
        tracing::info!(
            verbindung = %id,
            login = ?verbindung.and_then(|v| v.login),
            "Verbindung getrennt"
        );
        self.console.display(&hinweise::getrennt(&peer.to_string()));
    }

    fn bei_lauschen_gestartet(&self, adresse: SocketAddr) {
        tracing::info!(adresse = %adresse, "Server lauscht");
        self.console.display(&hinweise::lauscht(adresse.port()));
    }

    fn bei_lauschen_gestoppt(&self) {
        tracing::info!("Server lauscht nicht mehr");
        self.console.display(hinweise::LAUSCHEN_GESTOPPT);
    }

    fn bei_empfangsfehler(&self, id: ConnectionId, fehler: &io::Error) {
        tracing::warn!(verbindung = %id, fehler = %fehler, "Empfangsfehler – Verbindung wird getrennt");
    }
}
