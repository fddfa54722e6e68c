//! Befehlsgrammatik
//!
//! Eine Zeile, deren erstes Zeichen `#` ist, wird an einzelnen Leerzeichen
//! zerlegt: das erste Token ist der Befehlsname, der Rest sind positionale
//! Argumente. Alles andere (auch die leere Zeile) ist eine Chat-Nachricht.
//!
//! Der Befehlsname wird exakt verglichen, es findet kein Case-Folding statt.
//! Leere Tokens zwischen zwei Leerzeichen bleiben erhalten, leere Tokens am
//! Zeilenende werden verworfen.

use simplechat_core::{ChatError, Result};

/// Praefix-Zeichen fuer Steuerbefehle
pub const BEFEHLS_PRAEFIX: char = '#';

/// Klassifizierte Eingabezeile
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eingabe {
    /// Steuerbefehl
    Befehl(Befehl),
    /// Chat-Nachricht (Payload)
    Nachricht(String),
}

/// Ein geparster Steuerbefehl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Befehl {
    /// Befehlsname ohne `#` (z.B. "login", "setport")
    pub name: String,
    /// Positionale Argumente
    pub args: Vec<String>,
}

impl Befehl {
    /// Gibt ein Argument zurueck
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(|s| s.as_str())
    }

    /// Gibt ein Pflicht-Argument zurueck oder einen Fehler
    pub fn pflicht_arg(&self, index: usize) -> Result<&str> {
        match self.arg(index) {
            Some(wert) if !wert.is_empty() => Ok(wert),
            _ => Err(ChatError::eingabe(format!(
                "Missing argument for #{}",
                self.name
            ))),
        }
    }

    /// Gibt das erste Argument als Port zurueck
    pub fn port_arg(&self) -> Result<u16> {
        let wert = self.pflicht_arg(0)?;
        wert.parse::<u16>()
            .map_err(|_| ChatError::eingabe(format!("Invalid port: {wert}")))
    }

    /// Gibt die Zeile so zurueck, wie sie auf die Leitung geht
    pub fn als_zeile(&self) -> String {
        let mut zeile = format!("{BEFEHLS_PRAEFIX}{}", self.name);
        for arg in &self.args {
            zeile.push(' ');
            zeile.push_str(arg);
        }
        zeile
    }
}

/// Klassifiziert eine Eingabezeile als Befehl oder Nachricht
pub fn zeile_klassifizieren(zeile: &str) -> Eingabe {
    // Leere Zeile hat kein erstes Zeichen
    if !zeile.starts_with(BEFEHLS_PRAEFIX) {
        return Eingabe::Nachricht(zeile.to_string());
    }

    let mut tokens: Vec<&str> = zeile.split(' ').collect();
    while tokens.len() > 1 && tokens.last().is_some_and(|t| t.is_empty()) {
        tokens.pop();
    }

    let name = tokens[0]
        .strip_prefix(BEFEHLS_PRAEFIX)
        .unwrap_or(tokens[0])
        .to_string();
    let args = tokens[1..].iter().map(|t| t.to_string()).collect();

    Eingabe::Befehl(Befehl { name, args })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn befehl(zeile: &str) -> Befehl {
        match zeile_klassifizieren(zeile) {
            Eingabe::Befehl(b) => b,
            Eingabe::Nachricht(n) => panic!("Befehl erwartet, Nachricht erhalten: {n:?}"),
        }
    }

    #[test]
    fn einfacher_befehl() {
        let b = befehl("#quit");
        assert_eq!(b.name, "quit");
        assert!(b.args.is_empty());
    }

    #[test]
    fn befehl_mit_argument() {
        let b = befehl("#login alice");
        assert_eq!(b.name, "login");
        assert_eq!(b.arg(0), Some("alice"));
        assert_eq!(b.arg(1), None);
    }

    #[test]
    fn leere_zeile_ist_nachricht() {
        assert_eq!(zeile_klassifizieren(""), Eingabe::Nachricht(String::new()));
    }

    #[test]
    fn normale_zeile_ist_nachricht() {
        assert_eq!(
            zeile_klassifizieren("hallo #welt"),
            Eingabe::Nachricht("hallo #welt".into())
        );
        // Fuehrendes Leerzeichen: kein Befehl
        assert_eq!(
            zeile_klassifizieren(" #quit"),
            Eingabe::Nachricht(" #quit".into())
        );
    }

    #[test]
    fn kein_case_folding() {
        let b = befehl("#LOGIN alice");
        assert_eq!(b.name, "LOGIN");
    }

    #[test]
    fn doppelte_leerzeichen_erzeugen_leere_tokens() {
        let b = befehl("#login  alice");
        assert_eq!(b.args, vec!["".to_string(), "alice".to_string()]);
        assert!(b.pflicht_arg(0).is_err());
    }

    #[test]
    fn nachlaufende_leerzeichen_werden_verworfen() {
        let b = befehl("#setport 6000  ");
        assert_eq!(b.args, vec!["6000".to_string()]);
    }

    #[test]
    fn nur_praefix() {
        let b = befehl("#");
        assert_eq!(b.name, "");
        assert!(b.args.is_empty());
    }

    #[test]
    fn port_argument() {
        assert_eq!(befehl("#setport 6000").port_arg().unwrap(), 6000);

        let fehler = befehl("#setport abc").port_arg().unwrap_err();
        assert_eq!(fehler.to_string(), "Invalid port: abc");

        let fehler = befehl("#setport").port_arg().unwrap_err();
        assert_eq!(fehler.to_string(), "Missing argument for #setport");

        assert!(befehl("#setport 70000").port_arg().is_err());
    }

    #[test]
    fn als_zeile_rekonstruiert_befehl() {
        assert_eq!(befehl("#login alice").als_zeile(), "#login alice");
        assert_eq!(befehl("#logoff").als_zeile(), "#logoff");
    }
}
