//! Structured Logging Setup via tracing-subscriber
//!
//! Ausgabe immer auf stderr, damit sie nicht in die Chat-Console auf stdout
//! geraet. Die Umgebung hat Vorrang vor der Konfigurationsdatei:
//! - `SC_LOG_LEVEL`: Log-Level oder EnvFilter-Direktive
//! - `SC_LOG_FORMAT`: `text` oder `json`

use std::str::FromStr;
use tracing_subscriber::{fmt, EnvFilter};

const LOG_LEVEL_VAR: &str = "SC_LOG_LEVEL";
const LOG_FORMAT_VAR: &str = "SC_LOG_FORMAT";

/// Ausgabeformat der Log-Zeilen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            andere => Err(format!(
                "unbekanntes Log-Format '{andere}' (erlaubt: text, json)"
            )),
        }
    }
}

/// Prueft die `[logging]`-Einstellungen einer Konfigurationsdatei
///
/// Das Level muss ein einfaches Level sein (`trace` bis `error`),
/// Direktiven wie `simplechat=debug` sind nur ueber `SC_LOG_LEVEL` moeglich.
pub fn einstellungen_pruefen(level: &str, format: &str) -> Result<(), String> {
    if !matches!(level, "trace" | "debug" | "info" | "warn" | "error") {
        return Err(format!(
            "unbekanntes Log-Level '{level}' (erlaubt: trace, debug, info, warn, error)"
        ));
    }
    LogFormat::from_str(format).map(|_| ())
}

/// Initialisiert das Logging-System.
///
/// `level` und `format` kommen aus der Konfiguration und werden von
/// `SC_LOG_LEVEL` bzw. `SC_LOG_FORMAT` ueberschrieben.
pub fn logging_initialisieren(level: &str, format: &str) {
    let filter = EnvFilter::try_from_env(LOG_LEVEL_VAR)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let format = std::env::var(LOG_FORMAT_VAR)
        .ok()
        .and_then(|f| f.parse().ok())
        .or_else(|| format.parse().ok())
        .unwrap_or_default();

    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    match format {
        LogFormat::Json => builder.json().with_current_span(true).init(),
        LogFormat::Text => builder.with_target(true).init(),
    }
}
