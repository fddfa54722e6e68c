//! Client-Konfiguration
//!
//! TOML-Datei mit Standardwerten. `<host> <port>` aus der Kommandozeile
//! haben Vorrang.

use serde::{Deserialize, Serialize};
use simplechat_protocol::wire::DEFAULT_MAX_ZEILEN_LAENGE;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 5555;
pub const DEFAULT_SCHREIB_TIMEOUT_SEK: u64 = 5;

/// Vollstaendige Client-Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub client: ClientEinstellungen,
    pub logging: LoggingEinstellungen,
}

/// Verbindungs-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientEinstellungen {
    pub host: String,
    pub port: u16,
    /// Maximale Laenge einer Zeile vom Server in Bytes
    pub max_zeilen_laenge: usize,
    /// Sekunden, die das Senden einer Zeile dauern darf
    pub schreib_timeout_sek: u64,
}

impl Default for ClientEinstellungen {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT,
            max_zeilen_laenge: DEFAULT_MAX_ZEILEN_LAENGE,
            schreib_timeout_sek: DEFAULT_SCHREIB_TIMEOUT_SEK,
        }
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    pub level: String,
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

impl ClientConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => Self::aus_toml(&inhalt)
                .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}")),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
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

    pub fn schreib_timeout(&self) -> Duration {
        Duration::from_secs(self.client.schreib_timeout_sek)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standardwerte() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.client.host, "localhost");
        assert_eq!(cfg.client.port, 5555);
    }

    #[test]
    fn teilweise_toml() {
        let cfg = ClientConfig::aus_toml("[client]\nhost = \"chat.local\"\n").unwrap();
        assert_eq!(cfg.client.host, "chat.local");
        assert_eq!(cfg.client.port, 5555);
        assert_eq!(cfg.logging.level, "warn");
    }

    #[test]
    fn ungueltiges_toml_ist_fehler() {
        assert!(ClientConfig::aus_toml("[client]\nport = \"abc\"\n").is_err());
    }

    #[test]
    fn ungueltiges_log_format_ist_fehler() {
        let fehler = ClientConfig::aus_toml("[logging]\nformat = \"xml\"\n").unwrap_err();
        assert!(fehler.to_string().contains("xml"));
    }
}
