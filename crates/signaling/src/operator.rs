//! Operator-Controller – Steuerbefehle der Server-Console
//!
//! ## Zustandsmaschine
//! ```text
//! gestoppt --#start--> lauschend --#stop--> gestoppt
//!     ^                    |
//!     +------#close--------+   (trennt zusaetzlich alle Verbindungen)
//! ```
//!
//! | Befehl          | Voraussetzung  | Bei Verletzung                      |
//! |-----------------|----------------|-------------------------------------|
//! | `#start`        | nicht lauschend| "The server has already started!"   |
//! | `#stop`         | lauschend      | –                                   |
//! | `#close`        | –              | –                                   |
//! | `#quit`         | –              | –                                   |
//! | `#setport <p>`  | nicht lauschend| "You are already connected!"        |
//! | `#getport`      | –              | –                                   |
//!
//! Alles ohne `#` geht am Session-Gate vorbei als `SERVER MSG> <text>` an
//! alle Verbindungen.

use simplechat_core::{Console, Steuerung};
use simplechat_protocol::{hinweise, zeile_klassifizieren, Befehl, Eingabe};
use std::sync::Arc;

use crate::server_state::ChatServer;
use crate::transport::Transport;

pub struct OperatorController<T: Transport> {
    transport: T,
    server: Arc<ChatServer>,
    console: Arc<dyn Console>,
    /// Nur aenderbar solange nicht gelauscht wird
    port: u16,
}

impl<T: Transport> OperatorController<T> {
    pub fn neu(transport: T, server: Arc<ChatServer>, port: u16) -> Self {
        let console = Arc::clone(server.console());
        Self {
            transport,
            server,
            console,
            port,
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn lauscht(&self) -> bool {
        self.transport.lauscht()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Verarbeitet eine Zeile der Operator-Console
    pub async fn eingabe_verarbeiten(&mut self, zeile: &str) -> Steuerung {
        match zeile_klassifizieren(zeile) {
            Eingabe::Befehl(befehl) => self.befehl_ausfuehren(&befehl).await,
            Eingabe::Nachricht(text) => {
                let nachricht = hinweise::server_nachricht(&text);
                self.console.display(&nachricht);
                self.server.router.an_alle_senden(&nachricht);
                Steuerung::Weiter
            }
        }
    }

    async fn befehl_ausfuehren(&mut self, befehl: &Befehl) -> Steuerung {
        match befehl.name.as_str() {
            "start" => self.starten().await,
            "stop" => self.transport.lauschen_stoppen().await,
            "close" => self.schliessen().await,
            "quit" => {
                self.schliessen().await;
                return Steuerung::Beenden;
            }
            "setport" => self.port_setzen(befehl),
            "getport" => self.console.display(&hinweise::port_anzeige(self.port)),
            andere => {
                tracing::debug!(befehl = %andere, "Unbekannter Operator-Befehl ignoriert");
            }
        }
        Steuerung::Weiter
    }

    /// `#start`: beginnt auf dem konfigurierten Port zu lauschen
    pub async fn starten(&mut self) {
        if self.transport.lauscht() {
            self.console.display(hinweise::BEREITS_GESTARTET);
            return;
        }
        if let Err(e) = self.transport.lauschen(self.port).await {
            tracing::error!(port = self.port, fehler = %e, "Lauschen fehlgeschlagen");
            self.console.display(hinweise::LAUSCHEN_FEHLGESCHLAGEN);
        }
    }

    async fn schliessen(&mut self) {
        self.transport.schliessen().await;
        self.console.display(hinweise::SERVER_GESCHLOSSEN);
    }

    fn port_setzen(&mut self, befehl: &Befehl) {
        if self.transport.lauscht() {
            self.console.display(hinweise::BEREITS_VERBUNDEN);
            return;
        }
        match befehl.port_arg() {
            Ok(port) => {
                self.port = port;
                self.console.display(&hinweise::port_geaendert(port));
            }
            Err(e) => self.console.display(&e.to_string()),
        }
    }
}
