//! simplechat-observability – Structured Logging
//!
//! Logs gehen auf stderr, damit sie sich nicht mit den Console-Hinweisen
//! auf stdout vermischen.

pub mod logging;

pub use logging::logging_initialisieren;
