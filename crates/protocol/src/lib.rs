//! simplechat-protocol – Textprotokoll von Client und Server
//!
//! Jede Zeile ist entweder ein Steuerbefehl (`#name arg ...`) oder eine
//! Chat-Nachricht. Client, Server und Operator-Console teilen sich dieselbe
//! Grammatik.

pub mod befehl;
pub mod hinweise;
pub mod wire;

pub use befehl::{zeile_klassifizieren, Befehl, Eingabe};
pub use wire::ZeilenCodec;
