//! Server-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! sinnvolle Standardwerte, sodass der Server ohne Konfigurationsdatei
//! lauffaehig ist. Der Port aus der Kommandozeile hat Vorrang.

use serde::{Deserialize, Serialize};
use simplechat_signaling::TcpTransportKonfig;
use std::net::IpAddr;
use std::time::Duration;

/// Standard-Port von Server und Client
pub const DEFAULT_PORT: u16 = 5555;

/// Vollstaendige Server-Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Netzwerk-Einstellungen
    pub server: ServerEinstellungen,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
}

/// Netzwerk-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerEinstellungen {
    /// Port fuer eingehende Verbindungen
    pub port: u16,
    /// Bind-Adresse
    pub bind_adresse: IpAddr,
    /// Groesse der Send-Queue pro Verbindung
    pub send_queue_groesse: usize,
    /// Maximale Laenge einer eingehenden Zeile in Bytes
    pub max_zeilen_laenge: usize,
    /// Sekunden, die ein Schreibvorgang auf eine Verbindung dauern darf
    pub schreib_timeout_sek: u64,
}

impl Default for ServerEinstellungen {
    fn default() -> Self {
        let transport = TcpTransportKonfig::default();
        Self {
            port: DEFAULT_PORT,
            bind_adresse: transport.bind_adresse,
            send_queue_groesse: transport.send_queue_groesse,
            max_zeilen_laenge: transport.max_zeilen_laenge,
            schreib_timeout_sek: transport.schreib_timeout.as_secs(),
        }
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            format: "text".into(),
        }
    }
}

impl ServerConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => Self::aus_toml(&inhalt)
                .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}")),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(
                    pfad = pfad,
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
            )),
        }
    }

    /// Parst und prueft eine TOML-Konfiguration
    pub fn aus_toml(inhalt: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(inhalt)?;
        simplechat_observability::logging::einstellungen_pruefen(
            &config.logging.level,
            &config.logging.format,
        )
        .map_err(|e| anyhow::anyhow!("[logging]: {e}"))?;
        Ok(config)
    }

    /// Konfiguration fuer den TCP-Transport
    pub fn transport_konfig(&self) -> TcpTransportKonfig {
        TcpTransportKonfig {
            bind_adresse: self.server.bind_adresse,
            send_queue_groesse: self.server.send_queue_groesse,
            max_zeilen_laenge: self.server.max_zeilen_laenge,
            schreib_timeout: Duration::from_secs(self.server.schreib_timeout_sek),
        }
    }
}
