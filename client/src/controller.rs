//! Client-Controller – lokale Befehle und Verbindungszustand
//!
//! | Befehl          | Voraussetzung  | Bei Verletzung               |
//! |-----------------|----------------|------------------------------|
//! | `#login [id]`   | getrennt       | "You are already connected!" |
//! | `#logoff`       | verbunden      | –                            |
//! | `#quit`         | –              | –                            |
//! | `#sethost <h>`  | getrennt       | "You are already connected!" |
//! | `#setport <p>`  | getrennt       | "You are already connected!" |
//! | `#gethost`      | –              | –                            |
//! | `#getport`      | –              | –                            |
//!
//! Alles andere wird unveraendert an den Server gesendet. Ohne Verbindung
//! wird es verworfen, ein Sendefehler beendet den Client.

use simplechat_core::{Console, Steuerung};
use simplechat_protocol::{hinweise, zeile_klassifizieren, Befehl, Eingabe};
use std::sync::Arc;

use crate::connection::ClientTransport;

pub struct ClientController<T: ClientTransport> {
    transport: T,
    console: Arc<dyn Console>,
    /// `host` und `port` nur aenderbar solange keine Verbindung besteht
    host: String,
    port: u16,
}

impl<T: ClientTransport> ClientController<T> {
    pub fn neu(transport: T, console: Arc<dyn Console>, host: impl Into<String>, port: u16) -> Self {
        Self {
            transport,
            console,
            host: host.into(),
            port,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn ist_verbunden(&self) -> bool {
        self.transport.ist_verbunden()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Verbindet mit dem konfigurierten Server
    ///
    /// Bei Fehlschlag erscheint ein Hinweis und der Client wartet auf Befehle.
    pub async fn verbinden(&mut self) -> bool {
        match self.transport.oeffnen(&self.host, self.port).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(host = %self.host, port = self.port, fehler = %e, "Verbindung fehlgeschlagen");
                self.console.display(hinweise::VERBINDUNG_FEHLGESCHLAGEN);
                false
            }
        }
    }

    /// Verarbeitet eine Zeile der Client-Console
    pub async fn eingabe_verarbeiten(&mut self, zeile: &str) -> Steuerung {
        match zeile_klassifizieren(zeile) {
            Eingabe::Befehl(befehl) => self.befehl_ausfuehren(&befehl).await,
            Eingabe::Nachricht(text) => {
                if !self.transport.ist_verbunden() {
                    tracing::debug!("Nicht verbunden, Nachricht verworfen");
                    return Steuerung::Weiter;
                }
                self.an_server_senden(&text).await
            }
        }
    }

    async fn befehl_ausfuehren(&mut self, befehl: &Befehl) -> Steuerung {
        match befehl.name.as_str() {
            "quit" => {
                self.trennen().await;
                return Steuerung::Beenden;
            }
            "logoff" => self.trennen().await,
            "login" => return self.anmelden(befehl).await,
            "sethost" => {
                if self.getrennt_oder_hinweis() {
                    match befehl.pflicht_arg(0) {
                        Ok(host) => self.host = host.to_string(),
                        Err(e) => self.console.display(&e.to_string()),
                    }
                }
            }
            "setport" => {
                if self.getrennt_oder_hinweis() {
                    match befehl.port_arg() {
                        Ok(port) => self.port = port,
                        Err(e) => self.console.display(&e.to_string()),
                    }
                }
            }
            "gethost" => self.console.display(&self.host),
            "getport" => self.console.display(&self.port.to_string()),
            andere => {
                tracing::debug!(befehl = %andere, "Unbekannter Client-Befehl ignoriert");
            }
        }
        Steuerung::Weiter
    }

    /// `#login [id]`: verbindet und reicht `#login <id>` an den Server weiter
    async fn anmelden(&mut self, befehl: &Befehl) -> Steuerung {
        if !self.getrennt_oder_hinweis() {
            return Steuerung::Weiter;
        }
        if !self.verbinden().await {
            return Steuerung::Weiter;
        }
        match befehl.arg(0) {
            Some(id) if !id.is_empty() => self.an_server_senden(&befehl.als_zeile()).await,
            _ => Steuerung::Weiter,
        }
    }

    async fn an_server_senden(&mut self, zeile: &str) -> Steuerung {
        match self.transport.senden(zeile).await {
            Ok(()) => Steuerung::Weiter,
            Err(e) => {
                tracing::error!(fehler = %e, "Senden an Server fehlgeschlagen");
                self.console.display(hinweise::SENDEN_FEHLGESCHLAGEN);
                self.transport.schliessen().await;
                Steuerung::Beenden
            }
        }
    }

    async fn trennen(&mut self) {
        if self.transport.ist_verbunden() {
            self.transport.schliessen().await;
            self.console.display(hinweise::VERBINDUNG_GESCHLOSSEN);
        }
    }

    /// `true` wenn getrennt, sonst Hinweis "already connected"
    fn getrennt_oder_hinweis(&self) -> bool {
        if self.transport.ist_verbunden() {
            self.console.display(hinweise::BEREITS_VERBUNDEN);
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use simplechat_core::{AufzeichnungsConsole, ChatError, Result};
    use std::io;

    /// Transport ohne Sockets, protokolliert Aufrufe und gesendete Zeilen
    #[derive(Default)]
    struct TestTransport {
        verbunden: bool,
        oeffnen_fehler: bool,
        senden_fehler: bool,
        aufrufe: Mutex<Vec<String>>,
        gesendet: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ClientTransport for TestTransport {
        async fn oeffnen(&mut self, host: &str, port: u16) -> Result<()> {
            self.aufrufe.lock().push(format!("oeffnen {host}:{port}"));
            if self.oeffnen_fehler {
                return Err(io::Error::new(io::ErrorKind::ConnectionRefused, "abgelehnt").into());
            }
            self.verbunden = true;
            Ok(())
        }

        async fn schliessen(&mut self) {
            self.aufrufe.lock().push("schliessen".into());
            self.verbunden = false;
        }

        async fn senden(&mut self, zeile: &str) -> Result<()> {
            if self.senden_fehler {
                return Err(ChatError::Transport(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "weg",
                )));
            }
            self.gesendet.lock().push(zeile.to_string());
            Ok(())
        }

        fn ist_verbunden(&self) -> bool {
            self.verbunden
        }
    }

    fn controller(
        transport: TestTransport,
    ) -> (ClientController<TestTransport>, Arc<AufzeichnungsConsole>) {
        let console = Arc::new(AufzeichnungsConsole::neu());
        (
            ClientController::neu(transport, console.clone(), "localhost", 5555),
            console,
        )
    }

    fn verbunden() -> TestTransport {
        TestTransport {
            verbunden: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn login_verbindet_und_leitet_weiter() {
        let (mut ctl, _console) = controller(TestTransport::default());

        assert_eq!(ctl.eingabe_verarbeiten("#login alice").await, Steuerung::Weiter);

        assert!(ctl.ist_verbunden());
        assert_eq!(*ctl.transport().aufrufe.lock(), vec!["oeffnen localhost:5555"]);
        assert_eq!(*ctl.transport().gesendet.lock(), vec!["#login alice"]);
    }

    #[tokio::test]
    async fn login_ohne_id_verbindet_nur() {
        let (mut ctl, _console) = controller(TestTransport::default());
        ctl.eingabe_verarbeiten("#login").await;

        assert!(ctl.ist_verbunden());
        assert!(ctl.transport().gesendet.lock().is_empty());
    }

    #[tokio::test]
    async fn login_waehrend_verbunden() {
        let (mut ctl, console) = controller(verbunden());
        ctl.eingabe_verarbeiten("#login bob").await;

        assert!(console.enthaelt("You are already connected!"));
        assert!(ctl.transport().aufrufe.lock().is_empty());
        assert!(ctl.transport().gesendet.lock().is_empty());
    }

    #[tokio::test]
    async fn verbindungsfehler_wartet_auf_befehle() {
        let transport = TestTransport {
            oeffnen_fehler: true,
            ..Default::default()
        };
        let (mut ctl, console) = controller(transport);

        assert!(!ctl.verbinden().await);
        assert_eq!(ctl.eingabe_verarbeiten("#login alice").await, Steuerung::Weiter);

        assert!(!ctl.ist_verbunden());
        assert!(console.enthaelt("Cannot open connection.  Awaiting command."));
        assert!(ctl.transport().gesendet.lock().is_empty());
    }

    #[tokio::test]
    async fn sethost_setport_nur_getrennt() {
        let (mut ctl, console) = controller(TestTransport::default());
        ctl.eingabe_verarbeiten("#sethost chat.example.org").await;
        ctl.eingabe_verarbeiten("#setport 6000").await;
        ctl.eingabe_verarbeiten("#gethost").await;
        ctl.eingabe_verarbeiten("#getport").await;

        assert_eq!(ctl.host(), "chat.example.org");
        assert_eq!(ctl.port(), 6000);
        assert_eq!(console.zeilen(), vec!["chat.example.org", "6000"]);

        ctl.eingabe_verarbeiten("#login").await;
        console.leeren();
        ctl.eingabe_verarbeiten("#sethost anders").await;
        ctl.eingabe_verarbeiten("#setport 7000").await;

        assert_eq!(ctl.host(), "chat.example.org");
        assert_eq!(ctl.port(), 6000);
        assert_eq!(
            console.zeilen(),
            vec!["You are already connected!", "You are already connected!"]
        );
    }

    #[tokio::test]
    async fn ungueltige_argumente_aendern_nichts() {
        let (mut ctl, console) = controller(TestTransport::default());
        ctl.eingabe_verarbeiten("#setport abc").await;
        ctl.eingabe_verarbeiten("#sethost").await;

        assert_eq!(ctl.port(), 5555);
        assert_eq!(ctl.host(), "localhost");
        assert!(console.enthaelt("Invalid port: abc"));
        assert!(console.enthaelt("Missing argument for #sethost"));
    }

    #[tokio::test]
    async fn nachricht_wird_gesendet() {
        let (mut ctl, _console) = controller(verbunden());
        ctl.eingabe_verarbeiten("hallo zusammen").await;
        ctl.eingabe_verarbeiten("").await;

        assert_eq!(*ctl.transport().gesendet.lock(), vec!["hallo zusammen", ""]);
    }

    #[tokio::test]
    async fn nachricht_ohne_verbindung_wird_verworfen() {
        let (mut ctl, console) = controller(TestTransport::default());
        assert_eq!(ctl.eingabe_verarbeiten("hallo").await, Steuerung::Weiter);

        assert!(ctl.transport().gesendet.lock().is_empty());
        assert!(console.zeilen().is_empty());
    }

    #[tokio::test]
    async fn sendefehler_beendet_client() {
        let transport = TestTransport {
            verbunden: true,
            senden_fehler: true,
            ..Default::default()
        };
        let (mut ctl, console) = controller(transport);

        assert_eq!(ctl.eingabe_verarbeiten("hallo").await, Steuerung::Beenden);
        assert!(console.enthaelt("Could not send message to server. Terminating client."));
        assert!(!ctl.ist_verbunden());
    }

    #[tokio::test]
    async fn logoff_und_quit() {
        let (mut ctl, console) = controller(verbunden());

        assert_eq!(ctl.eingabe_verarbeiten("#logoff").await, Steuerung::Weiter);
        assert!(!ctl.ist_verbunden());
        assert!(console.enthaelt("The connection to the server is closed!"));

        // Bereits getrennt: kein zweites schliessen
        assert_eq!(ctl.eingabe_verarbeiten("#quit").await, Steuerung::Beenden);
        assert_eq!(*ctl.transport().aufrufe.lock(), vec!["schliessen"]);
    }

    #[tokio::test]
    async fn unbekannter_befehl_wird_ignoriert() {
        let (mut ctl, console) = controller(verbunden());
        assert_eq!(ctl.eingabe_verarbeiten("#whoami").await, Steuerung::Weiter);

        assert!(console.zeilen().is_empty());
        assert!(ctl.transport().gesendet.lock().is_empty());
    }
}
