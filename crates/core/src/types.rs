//! Gemeinsame Identifikationstypen fuer Simplechat
//!
//! Die Transport-Schicht vergibt pro akzeptierter Verbindung eine
//! `ConnectionId`. Fuer den Kern ist sie ein opaker Handle.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Eindeutige Verbindungs-ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    /// Erstellt eine neue zufaellige ConnectionId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "verbindung:{}", self.0)
    }
}

/// Ergebnis eines Steuerbefehls fuer die Eingabeschleife
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steuerung {
    /// Naechste Eingabezeile lesen
    Weiter,
    /// Prozess beenden (`#quit`)
    Beenden,
}
