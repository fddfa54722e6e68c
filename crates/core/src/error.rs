//! Fehlertypen fuer Simplechat
//!
//! Zustandsfehler (`BereitsAngemeldet`, `NichtAngemeldet`,
//! `UngueltigerZustand`, `UngueltigeEingabe`) werden lokal behandelt und nur
//! als Hinweis angezeigt. `Transport` ist der einzige Fehler, der eine
//! Verbindung beendet.

use thiserror::Error;

/// Globaler Result-Alias fuer Simplechat
pub type Result<T> = std::result::Result<T, ChatError>;

/// Alle moeglichen Fehler im Simplechat-System
#[derive(Debug, Error)]
pub enum ChatError {
    // --- Session ---
    #[error("You have already set your login ID!")]
    BereitsAngemeldet,

    #[error("You must set a login ID first!")]
    NichtAngemeldet,

    // --- Zustand ---
    #[error("Ungueltiger Zustand: {0}")]
    UngueltigerZustand(String),

    #[error("{0}")]
    UngueltigeEingabe(String),

    // --- Transport ---
    #[error("Transportfehler: {0}")]
    Transport(#[from] std::io::Error),

    #[error("Senden fehlgeschlagen: {0}")]
    SendFehler(String),

    #[error("Unbekannte Verbindung: {0}")]
    UnbekannteVerbindung(String),
}

impl ChatError {
    /// Erstellt einen Eingabefehler aus einer beliebigen Nachricht
    pub fn eingabe(msg: impl Into<String>) -> Self {
        Self::UngueltigeEingabe(msg.into())
    }
}
