//! Broadcast-Router – Verteilt eine Nachricht an alle Verbindungen
//!
//! Jede Verbindung hat eine begrenzte Send-Queue (`ClientSender`), die der
//! Verbindungs-Task auf den Socket schreibt. Der Router reiht Nachrichten
//! nur nicht-blockierend ein: eine volle oder geschlossene Queue gilt als
//! Zustellfehler und die Verbindung wird aus der Registry entfernt.
//!
//! ## Formate
//! - Chat-Nachricht eines Clients: `<name>: <text>`
//! - Operator-Nachricht: `SERVER MSG> <text>`

use simplechat_core::{ChatError, ConnectionId, Result};
use simplechat_protocol::hinweise;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::registry::ConnectionRegistry;

// ---------------------------------------------------------------------------
// ClientSender
// ---------------------------------------------------------------------------

/// Handle auf die Send-Queue einer Verbindung
#[derive(Clone, Debug)]
pub struct ClientSender {
    pub id: ConnectionId,
    tx: mpsc::Sender<String>,
}

impl ClientSender {
    pub fn neu(id: ConnectionId, tx: mpsc::Sender<String>) -> Self {
        Self { id, tx }
    }

    /// Reiht eine Zeile nicht-blockierend ein
    ///
    /// Schlaegt fehl wenn die Queue voll oder geschlossen ist.
    pub fn senden(&self, zeile: String) -> Result<()> {
        match self.tx.try_send(zeile) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(verbindung = %self.id, "Send-Queue voll – Verbindung wird getrennt");
                Err(ChatError::SendFehler("Send-Queue voll".into()))
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::debug!(verbindung = %self.id, "Send-Queue geschlossen (Client getrennt)");
                Err(ChatError::SendFehler("Send-Queue geschlossen".into()))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// BroadcastRouter
// ---------------------------------------------------------------------------

/// Verteilt Nachrichten ueber die Connection-Registry
///
/// Clone teilt die Registry.
#[derive(Clone)]
pub struct BroadcastRouter {
    registry: Arc<ConnectionRegistry>,
}

impl BroadcastRouter {
    pub fn neu(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Sendet eine Zeile an alle registrierten Verbindungen
    ///
    /// Unabhaengig vom Anmeldestatus. Gibt die Anzahl der erfolgreichen
    /// Zustellungen zurueck.
    pub fn an_alle_senden(&self, zeile: &str) -> usize {
        let zustellung = self.registry.an_alle_zustellen(zeile);
        for id in &zustellung.getrennt {
            tracing::info!(verbindung = %id, "Zustellung fehlgeschlagen – Verbindung entfernt");
        }
        tracing::trace!(
            gesendet = zustellung.gesendet,
            getrennt = zustellung.getrennt.len(),
            "Broadcast verteilt"
        );
        zustellung.gesendet
    }

    /// Chat-Nachricht eines angemeldeten Clients
    pub fn chat_senden(&self, absender: &str, text: &str) -> usize {
        self.an_alle_senden(&hinweise::chat_nachricht(absender, text))
    }

    /// Nachricht des Server-Operators
    pub fn server_senden(&self, text: &str) -> usize {
        self.an_alle_senden(&hinweise::server_nachricht(text))
    }

    /// Private Antwort an genau eine Verbindung
    pub fn an_verbindung_senden(&self, id: &ConnectionId, zeile: &str) -> Result<()> {
        self.registry.an_verbindung_zustellen(id, zeile)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
