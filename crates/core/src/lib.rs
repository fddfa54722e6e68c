//! simplechat-core – Gemeinsame Typen, Traits und Fehlertypen
//!
//! Dieses Crate stellt die fundamentalen Bausteine bereit, die von Server
//! und Client gemeinsam genutzt werden.

pub mod console;
pub mod error;
pub mod types;

// Re-Exporte fuer bequemen Zugriff
pub use console::{AufzeichnungsConsole, Console, StdoutConsole};
pub use error::{ChatError, Result};
pub use types::{ConnectionId, Steuerung};
