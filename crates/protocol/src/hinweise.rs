//! Nachrichtenformate und Hinweistexte
//!
//! Alle Texte, die Benutzer oder Operator zu sehen bekommen, an einer Stelle.

/// Praefix fuer Broadcasts des Server-Operators
pub const SERVER_PRAEFIX: &str = "SERVER MSG> ";

pub const BEREITS_VERBUNDEN: &str = "You are already connected!";
pub const BEREITS_GESTARTET: &str = "The server has already started!";
pub const SERVER_GESCHLOSSEN: &str = "The server has been closed.";
pub const LAUSCHEN_GESTOPPT: &str = "Server has stopped listening for connections.";
pub const LAUSCHEN_FEHLGESCHLAGEN: &str = "ERROR - Could not listen for clients!";

pub const VERBINDUNG_FEHLGESCHLAGEN: &str = "Cannot open connection.  Awaiting command.";
pub const VERBINDUNG_GESCHLOSSEN: &str = "The connection to the server is closed!";
pub const SERVER_WEG: &str = "The server has stopped listening. The client is shutting down.";
pub const SENDEN_FEHLGESCHLAGEN: &str = "Could not send message to server. Terminating client.";

/// Chat-Nachricht eines angemeldeten Clients: `<name>: <text>`
pub fn chat_nachricht(name: &str, text: &str) -> String {
    format!("{name}: {text}")
}

/// Broadcast des Operators: `SERVER MSG> <text>`
pub fn server_nachricht(text: &str) -> String {
    format!("{SERVER_PRAEFIX}{text}")
}

pub fn angemeldet(name: &str) -> String {
    format!("{name} has logged in.")
}

pub fn lauscht(port: u16) -> String {
    format!("Server listening for connections on port {port}")
}

pub fn willkommen(verbindung: &str) -> String {
    format!("Welcome to the server, {verbindung}!")
}

pub fn getrennt(verbindung: &str) -> String {
    format!("{verbindung} has disconnected from the server!")
}

pub fn port_geaendert(port: u16) -> String {
    format!("You have changed the port to {port}")
}

pub fn port_anzeige(port: u16) -> String {
    format!("Port: {port}")
}
