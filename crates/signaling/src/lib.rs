//! simplechat-signaling – Server-Kern des Chat-Protokolls
//!
//! ## Architektur
//!
//! ```text
//! TcpTransport (Accept-Loop)
//!     |
//!     v
//! ClientConnection (pro Verbindung ein Task)
//!     |  Zeile -> ServerHandler::bei_nachricht
//!     v
//! ChatServer
//!     |
//!     +-- SessionGate       (#login, Nachrichten nur nach Login)
//!     +-- BroadcastRouter   (an alle, privat)
//!     +-- ConnectionRegistry (Verbindungen + Login-Zustand)
//!
//! OperatorController – #start/#stop/#close/#quit/#setport/#getport
//! ```

pub mod broadcast;
mod connection;
pub mod gate;
pub mod operator;
pub mod registry;
pub mod server_state;
pub mod tcp;
pub mod transport;

// Bequeme Re-Exporte
pub use broadcast::{BroadcastRouter, ClientSender};
pub use gate::SessionGate;
pub use operator::OperatorController;
pub use registry::{ConnectionRegistry, SessionZustand, Verbindung};
pub use server_state::ChatServer;
pub use tcp::{TcpTransport, TcpTransportKonfig};
pub use transport::{ServerHandler, Transport};
