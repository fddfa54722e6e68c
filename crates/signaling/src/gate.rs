//! Session-Gate – Nur angemeldete Verbindungen duerfen broadcasten
//!
//! ## Regeln
//! - `#login <name>`: einmalig pro Verbindung. Ein zweiter Versuch bekommt
//!   privat "You have already set your login ID!".
//! - Nachricht ohne Login: privat "You must set a login ID first!", die
//!   Nachricht wird verworfen.
//! - Nachricht mit Login: Broadcast als `<name>: <text>`.
//! - Andere Befehle von Clients werden ignoriert.

use simplechat_core::{ChatError, Console, ConnectionId, Result};
use simplechat_protocol::{hinweise, zeile_klassifizieren, Befehl, Eingabe};
use std::sync::Arc;

use crate::broadcast::BroadcastRouter;
use crate::registry::ConnectionRegistry;

pub struct SessionGate {
    registry: Arc<ConnectionRegistry>,
    router: BroadcastRouter,
    console: Arc<dyn Console>,
}

impl SessionGate {
    pub fn neu(
        registry: Arc<ConnectionRegistry>,
        router: BroadcastRouter,
        console: Arc<dyn Console>,
    ) -> Self {
        Self {
            registry,
            router,
            console,
        }
    }

    /// Verarbeitet eine eingehende Zeile einer Verbindung
    ///
    /// Fehler sind Transportfehler der eigenen Verbindung (private Antwort
    /// nicht zustellbar oder Verbindung unbekannt).
    pub fn zeile_verarbeiten(&self, id: ConnectionId, zeile: &str) -> Result<()> {
        match zeile_klassifizieren(zeile) {
            Eingabe::Befehl(befehl) if befehl.name == "login" => self.login(id, &befehl),
            Eingabe::Befehl(befehl) => {
                tracing::debug!(verbindung = %id, befehl = %befehl.name, "Unbekannter Befehl ignoriert");
                Ok(())
            }
            Eingabe::Nachricht(text) => self.nachricht(id, &text),
        }
    }

    fn login(&self, id: ConnectionId, befehl: &Befehl) -> Result<()> {
        let name = match befehl.pflicht_arg(0) {
            Ok(name) => name,
            Err(e) => return self.privat(id, &e.to_string()),
        };

        match self.registry.anmelden(&id, name) {
            Ok(()) => {
                tracing::info!(verbindung = %id, login = %name, "Verbindung angemeldet");
                self.console.display(&hinweise::angemeldet(name));
                Ok(())
            }
            Err(e @ ChatError::BereitsAngemeldet) => self.privat(id, &e.to_string()),
            Err(e) => Err(e),
        }
    }

    fn nachricht(&self, id: ConnectionId, text: &str) -> Result<()> {
        let verbindung = self
            .registry
            .nachschlagen(&id)
            .ok_or_else(|| ChatError::UnbekannteVerbindung(id.to_string()))?;

        match verbindung.login {
            Some(name) => {
                tracing::info!("Message received: {} from {}", text, name);
                self.router.chat_senden(&name, text);
                Ok(())
            }
            None => self.privat(id, &ChatError::NichtAngemeldet.to_string()),
        }
    }

    fn privat(&self, id: ConnectionId, text: &str) -> Result<()> {
        self.router.an_verbindung_senden(&id, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcast::ClientSender;
    use simplechat_core::AufzeichnungsConsole;
    use tokio::sync::mpsc;

    struct Aufbau {
        registry: Arc<ConnectionRegistry>,
        console: Arc<AufzeichnungsConsole>,
        gate: SessionGate,
    }

    fn aufbau() -> Aufbau {
        let registry = Arc::new(ConnectionRegistry::neu());
        let console = Arc::new(AufzeichnungsConsole::neu());
        let gate = SessionGate::neu(
            Arc::clone(&registry),
            BroadcastRouter::neu(Arc::clone(&registry)),
            console.clone(),
        );
        Aufbau {
            registry,
            console,
            gate,
        }
    }

    fn verbinden(registry: &ConnectionRegistry) -> (ConnectionId, mpsc::Receiver<String>) {
        let id = ConnectionId::new();
        let (tx, rx) = mpsc::channel(16);
        registry
            .registrieren(id, "127.0.0.1:40002".parse().unwrap(), ClientSender::neu(id, tx))
            .unwrap();
        (id, rx)
    }

    fn alle(rx: &mut mpsc::Receiver<String>) -> Vec<String> {
        std::iter::from_fn(|| rx.try_recv().ok()).collect()
    }

    #[test]
    fn login_dann_nachricht_wird_gebroadcastet() {
        let a = aufbau();
        let (alice, mut rx_alice) = verbinden(&a.registry);
        let (_bob, mut rx_bob) = verbinden(&a.registry);

        a.gate.zeile_verarbeiten(alice, "#login alice").unwrap();
        a.gate.zeile_verarbeiten(alice, "hello").unwrap();

        assert_eq!(
            a.registry.nachschlagen(&alice).unwrap().login.as_deref(),
            Some("alice")
        );
        assert!(a.console.enthaelt("alice has logged in."));
        assert_eq!(alle(&mut rx_bob), vec!["alice: hello"]);
        assert_eq!(alle(&mut rx_alice), vec!["alice: hello"]);
    }

    #[test]
    fn nachricht_ohne_login_bleibt_privat() {
        let a = aufbau();
        let (bob, mut rx_bob) = verbinden(&a.registry);
        let (_carol, mut rx_carol) = verbinden(&a.registry);

        a.gate.zeile_verarbeiten(bob, "hi").unwrap();

        assert_eq!(alle(&mut rx_bob), vec!["You must set a login ID first!"]);
        assert!(alle(&mut rx_carol).is_empty());
    }

    #[test]
    fn zweiter_login_wird_abgelehnt() {
        let a = aufbau();
        let (alice, mut rx_alice) = verbinden(&a.registry);

        a.gate.zeile_verarbeiten(alice, "#login alice").unwrap();
        a.gate.zeile_verarbeiten(alice, "#login eve").unwrap();

        assert_eq!(
            alle(&mut rx_alice),
            vec!["You have already set your login ID!"]
        );
        assert_eq!(
            a.registry.nachschlagen(&alice).unwrap().login.as_deref(),
            Some("alice")
        );
        assert!(!a.console.enthaelt("eve has logged in."));
    }

    #[test]
    fn login_ohne_namen() {
        let a = aufbau();
        let (id, mut rx) = verbinden(&a.registry);

        a.gate.zeile_verarbeiten(id, "#login").unwrap();

        assert_eq!(alle(&mut rx), vec!["Missing argument for #login"]);
        assert!(!a.registry.nachschlagen(&id).unwrap().ist_authentifiziert());
    }

    #[test]
    fn unbekannter_befehl_wird_ignoriert() {
        let a = aufbau();
        let (id, mut rx) = verbinden(&a.registry);
        let (_andere, mut rx_andere) = verbinden(&a.registry);

        a.gate.zeile_verarbeiten(id, "#login alice").unwrap();
        a.gate.zeile_verarbeiten(id, "#frobnicate 1 2").unwrap();
        a.gate.zeile_verarbeiten(id, "#LOGIN bob").unwrap();

        assert!(alle(&mut rx).is_empty());
        assert!(alle(&mut rx_andere).is_empty());
    }

    #[test]
    fn leere_nachricht_ist_payload() {
        let a = aufbau();
        let (id, mut rx) = verbinden(&a.registry);

        a.gate.zeile_verarbeiten(id, "").unwrap();
        assert_eq!(alle(&mut rx), vec!["You must set a login ID first!"]);
    }

    #[test]
    fn unbekannte_verbindung_ist_fehler() {
        let a = aufbau();
        let ergebnis = a.gate.zeile_verarbeiten(ConnectionId::new(), "hallo");
        assert!(matches!(ergebnis, Err(ChatError::UnbekannteVerbindung(_))));
    }
}
