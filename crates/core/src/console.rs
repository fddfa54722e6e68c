//! Console-Capability – Senke fuer lokal anzuzeigende Hinweise
//!
//! Server und Client zeigen Hinweise unterschiedlich an (der Client stellt
//! `> ` voran). Der Kern schreibt nie direkt auf den Bildschirm, sondern
//! immer ueber dieses Trait.

use std::io::Write;

use parking_lot::Mutex;

/// Anzeige-Senke fuer Hinweise an den lokalen Benutzer
pub trait Console: Send + Sync {
    /// Zeigt eine Zeile an
    fn display(&self, text: &str);
}

/// Console auf stdout mit optionalem Zeilen-Praefix
#[derive(Debug, Clone, Default)]
pub struct StdoutConsole {
    praefix: String,
}

impl StdoutConsole {
    /// Console ohne Praefix (Server-Operator)
    pub fn neu() -> Self {
        Self::default()
    }

    /// Console mit Praefix vor jeder Zeile
    pub fn mit_praefix(praefix: impl Into<String>) -> Self {
        Self {
            praefix: praefix.into(),
        }
    }
}

impl Console for StdoutConsole {
    fn display(&self, text: &str) {
        let mut stdout = std::io::stdout().lock();
        // stdout geschlossen: Hinweis geht verloren, Logging bleibt
        if let Err(e) = writeln!(stdout, "{}{}", self.praefix, text) {
            tracing::debug!(fehler = %e, "Console-Ausgabe fehlgeschlagen");
        }
    }
}

/// Console die alle Zeilen im Speicher sammelt
#[derive(Debug, Default)]
pub struct AufzeichnungsConsole {
    zeilen: Mutex<Vec<String>>,
}

impl AufzeichnungsConsole {
    pub fn neu() -> Self {
        Self::default()
    }

    /// Gibt alle bisher angezeigten Zeilen zurueck
    pub fn zeilen(&self) -> Vec<String> {
        self.zeilen.lock().clone()
    }

    /// Prueft ob eine Zeile exakt angezeigt wurde
    pub fn enthaelt(&self, text: &str) -> bool {
        self.zeilen.lock().iter().any(|z| z == text)
    }

    /// Leert den Puffer
    pub fn leeren(&self) {
        self.zeilen.lock().clear();
    }
}

impl Console for AufzeichnungsConsole {
    fn display(&self, text: &str) {
        self.zeilen.lock().push(text.to_string());
    }
}
