//! Connection-Registry – Menge der lebenden Verbindungen und ihr Login-Zustand
//!
//! Registrierung, Entfernung, Login-Zustand und die Iteration beim Broadcast
//! laufen alle unter derselben Mutex. Ein Disconnect waehrend eines
//! Broadcasts ist damit ausgeschlossen: entweder ist die Verbindung zum
//! Zeitpunkt des Broadcasts noch registriert und bekommt die Nachricht, oder
//! sie ist bereits entfernt und bekommt sie nicht.
//!
//! Weil Broadcasts serialisiert in die Send-Queues eingereiht werden, sehen
//! alle Verbindungen dieselbe Reihenfolge.

use parking_lot::Mutex;
use simplechat_core::{ChatError, ConnectionId, Result};
use std::collections::HashMap;
use std::net::SocketAddr;

use crate::broadcast::ClientSender;

// ---------------------------------------------------------------------------
// Verbindung
// ---------------------------------------------------------------------------

/// Anmeldezustand einer Verbindung
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionZustand {
    Unauthentifiziert,
    Authentifiziert,
}

/// Momentaufnahme einer registrierten Verbindung
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verbindung {
    pub id: ConnectionId,
    pub peer: SocketAddr,
    /// Login-Name, gesetzt durch genau ein erfolgreiches `#login`
    pub login: Option<String>,
}

impl Verbindung {
    pub fn zustand(&self) -> SessionZustand {
        match self.login {
            Some(_) => SessionZustand::Authentifiziert,
            None => SessionZustand::Unauthentifiziert,
        }
    }

    pub fn ist_authentifiziert(&self) -> bool {
        self.zustand() == SessionZustand::Authentifiziert
    }
}

struct Eintrag {
    verbindung: Verbindung,
    sender: ClientSender,
}

/// Ergebnis eines Broadcasts
#[derive(Debug, Default)]
pub struct Zustellung {
    pub gesendet: usize,
    /// Verbindungen, die wegen Zustellfehler entfernt wurden
    pub getrennt: Vec<ConnectionId>,
}

// ---------------------------------------------------------------------------
// ConnectionRegistry
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct ConnectionRegistry {
    verbindungen: Mutex<HashMap<ConnectionId, Eintrag>>,
}

impl ConnectionRegistry {
    pub fn neu() -> Self {
        Self::default()
    }

    /// Fuegt eine neue, nicht angemeldete Verbindung hinzu
    pub fn registrieren(
        &self,
        id: ConnectionId,
        peer: SocketAddr,
        sender: ClientSender,
    ) -> Result<()> {
        let mut verbindungen = self.verbindungen.lock();
        if verbindungen.contains_key(&id) {
            return Err(ChatError::UngueltigerZustand(format!(
                "{id} ist bereits registriert"
            )));
        }
        verbindungen.insert(
            id,
            Eintrag {
                verbindung: Verbindung {
                    id,
                    peer,
                    login: None,
                },
                sender,
            },
        );
        tracing::debug!(verbindung = %id, peer = %peer, "Verbindung registriert");
        Ok(())
    }

    /// Entfernt eine Verbindung
    ///
    /// Die Send-Queue wird dabei geschlossen, was den Verbindungs-Task beendet.
    pub fn entfernen(&self, id: &ConnectionId) -> Option<Verbindung> {
        let entfernt = self.verbindungen.lock().remove(id).map(|e| e.verbindung);
        if entfernt.is_some() {
            tracing::debug!(verbindung = %id, "Verbindung entfernt");
        }
        entfernt
    }

    pub fn nachschlagen(&self, id: &ConnectionId) -> Option<Verbindung> {
        self.verbindungen
            .lock()
            .get(id)
            .map(|e| e.verbindung.clone())
    }

    /// Setzt den Login-Namen einer Verbindung
    ///
    /// Ein zweiter Login wird abgelehnt, der erste Name bleibt bestehen.
    /// Gleiche Namen auf verschiedenen Verbindungen sind erlaubt.
    pub fn anmelden(&self, id: &ConnectionId, name: &str) -> Result<()> {
        let mut verbindungen = self.verbindungen.lock();
        let eintrag = verbindungen
            .get_mut(id)
            .ok_or_else(|| ChatError::UnbekannteVerbindung(id.to_string()))?;

        if eintrag.verbindung.login.is_some() {
            return Err(ChatError::BereitsAngemeldet);
        }
        eintrag.verbindung.login = Some(name.to_string());
        Ok(())
    }

    /// Reiht eine Zeile fuer genau eine Verbindung ein
    pub fn an_verbindung_zustellen(&self, id: &ConnectionId, zeile: &str) -> Result<()> {
        let mut verbindungen = self.verbindungen.lock();
        let ergebnis = match verbindungen.get(id) {
            Some(eintrag) => eintrag.sender.senden(zeile.to_string()),
            None => return Err(ChatError::UnbekannteVerbindung(id.to_string())),
        };
        if ergebnis.is_err() {
            verbindungen.remove(id);
        }
        ergebnis
    }

    /// Reiht eine Zeile fuer alle Verbindungen ein
    ///
    /// Verbindungen mit Zustellfehler werden im selben kritischen Abschnitt
    /// entfernt, die restlichen bekommen die Nachricht trotzdem.
    pub fn an_alle_zustellen(&self, zeile: &str) -> Zustellung {
        let mut verbindungen = self.verbindungen.lock();
        let mut zustellung = Zustellung::default();

        for (id, eintrag) in verbindungen.iter() {
            match eintrag.sender.senden(zeile.to_string()) {
                Ok(()) => zustellung.gesendet += 1,
                Err(_) => zustellung.getrennt.push(*id),
            }
        }
        for id in &zustellung.getrennt {
            verbindungen.remove(id);
        }
        zustellung
    }

    pub fn verbindungen(&self) -> Vec<Verbindung> {
        self.verbindungen
            .lock()
            .values()
            .map(|e| e.verbindung.clone())
            .collect()
    }

    pub fn anzahl(&self) -> usize {
        self.verbindungen.lock().len()
    }

    pub fn ist_leer(&self) -> bool {
        self.anzahl() == 0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn peer() -> SocketAddr {
        "127.0.0.1:40001".parse().unwrap()
    }

    fn neue_verbindung(registry: &ConnectionRegistry) -> (ConnectionId, mpsc::Receiver<String>) {
        let id = ConnectionId::new();
        let (tx, rx) = mpsc::channel(16);
        registry
            .registrieren(id, peer(), ClientSender::neu(id, tx))
            .unwrap();
        (id, rx)
    }

    #[test]
    fn neue_verbindung_ist_unauthentifiziert() {
        let registry = ConnectionRegistry::neu();
        let (id, _rx) = neue_verbindung(&registry);

        let v = registry.nachschlagen(&id).unwrap();
        assert_eq!(v.zustand(), SessionZustand::Unauthentifiziert);
        assert!(v.login.is_none());
    }

    #[test]
    fn doppelte_registrierung_wird_abgelehnt() {
        let registry = ConnectionRegistry::neu();
        let (id, _rx) = neue_verbindung(&registry);
        let (tx, _rx2) = mpsc::channel(1);

        let ergebnis = registry.registrieren(id, peer(), ClientSender::neu(id, tx));
        assert!(matches!(ergebnis, Err(ChatError::UngueltigerZustand(_))));
        assert_eq!(registry.anzahl(), 1);
    }

    #[test]
    fn zweiter_login_aendert_namen_nicht() {
        let registry = ConnectionRegistry::neu();
        let (id, _rx) = neue_verbindung(&registry);

        registry.anmelden(&id, "alice").unwrap();
        let fehler = registry.anmelden(&id, "mallory").unwrap_err();
        assert!(matches!(fehler, ChatError::BereitsAngemeldet));

        let v = registry.nachschlagen(&id).unwrap();
        assert_eq!(v.login.as_deref(), Some("alice"));
        assert!(v.ist_authentifiziert());
    }

    #[test]
    fn gleicher_name_auf_zwei_verbindungen() {
        let registry = ConnectionRegistry::neu();
        let (a, _rxa) = neue_verbindung(&registry);
        let (b, _rxb) = neue_verbindung(&registry);

        registry.anmelden(&a, "alice").unwrap();
        registry.anmelden(&b, "alice").unwrap();
    }

    #[test]
    fn login_fuer_unbekannte_verbindung() {
        let registry = ConnectionRegistry::neu();
        let ergebnis = registry.anmelden(&ConnectionId::new(), "alice");
        assert!(matches!(ergebnis, Err(ChatError::UnbekannteVerbindung(_))));
    }

    #[test]
    fn entfernen_schliesst_queue() {
        let registry = ConnectionRegistry::neu();
        let (id, mut rx) = neue_verbindung(&registry);

        assert!(registry.entfernen(&id).is_some());
        assert!(registry.entfernen(&id).is_none());
        assert!(registry.ist_leer());
        assert!(matches!(
            rx.try_recv(),
            Err(mpsc::error::TryRecvError::Disconnected)
        ));
    }

    #[test]
    fn entfernte_verbindung_bekommt_keinen_broadcast() {
        let registry = ConnectionRegistry::neu();
        let (weg, mut rx_weg) = neue_verbindung(&registry);
        let (_, mut rx_da) = neue_verbindung(&registry);

        registry.entfernen(&weg);
        let zustellung = registry.an_alle_zustellen("hallo");

        assert_eq!(zustellung.gesendet, 1);
        assert!(rx_weg.try_recv().is_err());
        assert_eq!(rx_da.try_recv().unwrap(), "hallo");
    }

    #[test]
    fn nebenlaeufige_broadcasts_haben_gleiche_reihenfolge() {
        let registry = Arc::new(ConnectionRegistry::neu());
        let mut receivers = Vec::new();
        for _ in 0..4 {
            let id = ConnectionId::new();
            let (tx, rx) = mpsc::channel(1024);
            registry
                .registrieren(id, peer(), ClientSender::neu(id, tx))
                .unwrap();
            receivers.push(rx);
        }

        let threads: Vec<_> = (0..4)
            .map(|t| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        registry.an_alle_zustellen(&format!("{t}-{i}"));
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }

        let folgen: Vec<Vec<String>> = receivers
            .iter_mut()
            .map(|rx| std::iter::from_fn(|| rx.try_recv().ok()).collect())
            .collect();
        assert_eq!(folgen[0].len(), 200);
        for folge in &folgen[1..] {
            assert_eq!(folge, &folgen[0]);
        }
    }
}
