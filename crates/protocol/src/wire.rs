//! Wire-Format fuer TCP-Verbindungen
//!
//! Zeilenbasiertes Protokoll: UTF-8-Text, jede Nachricht endet mit `\n`.
//! Ein optionales `\r` vor dem Zeilenende wird beim Lesen entfernt.
//! Maximale Zeilenlaenge ist konfigurierbar (Standard: 8 KB).

use bytes::BytesMut;
use std::io;
use tokio_util::codec::{Decoder, Encoder, LinesCodec, LinesCodecError};

// ---------------------------------------------------------------------------
// Konstanten
// ---------------------------------------------------------------------------

/// Standard-maximale Zeilenlaenge (8 KB)
pub const DEFAULT_MAX_ZEILEN_LAENGE: usize = 8 * 1024;

// ---------------------------------------------------------------------------
// ZeilenCodec
// ---------------------------------------------------------------------------

/// tokio-util Codec fuer zeilenbasierte TCP-Verbindungen
///
/// Wrapper um `LinesCodec`, der Fehler auf `io::Error` abbildet, damit
/// Transport-Schicht und Aufrufer nur einen Fehlertyp sehen.
///
/// # Beispiel
///
/// ```rust,no_run
/// use tokio_util::codec::Framed;
/// use simplechat_protocol::wire::ZeilenCodec;
///
/// // let stream = TcpStream::connect(...).await?;
/// // let framed = Framed::new(stream, ZeilenCodec::new());
/// ```
#[derive(Debug, Clone)]
pub struct ZeilenCodec {
    inner: LinesCodec,
    max_zeilen_laenge: usize,
}

impl ZeilenCodec {
    /// Erstellt einen neuen `ZeilenCodec` mit Standard-Limit
    pub fn new() -> Self {
        Self::with_max_length(DEFAULT_MAX_ZEILEN_LAENGE)
    }

    /// Erstellt einen `ZeilenCodec` mit benutzerdefinierter maximaler Zeilenlaenge
    pub fn with_max_length(max_zeilen_laenge: usize) -> Self {
        Self {
            inner: LinesCodec::new_with_max_length(max_zeilen_laenge),
            max_zeilen_laenge,
        }
    }
}

impl Default for ZeilenCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn io_fehler(e: LinesCodecError, max: usize) -> io::Error {
    match e {
        LinesCodecError::Io(e) => e,
        LinesCodecError::MaxLineLengthExceeded => io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Zeile zu lang (Maximum: {max} Bytes)"),
        ),
    }
}

// ---------------------------------------------------------------------------
// Decoder-Implementierung
// ---------------------------------------------------------------------------

impl Decoder for ZeilenCodec {
    type Item = String;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let max = self.max_zeilen_laenge;
        self.inner.decode(src).map_err(|e| io_fehler(e, max))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let max = self.max_zeilen_laenge;
        self.inner.decode_eof(src).map_err(|e| io_fehler(e, max))
    }
}

// ---------------------------------------------------------------------------
// Encoder-Implementierung
// ---------------------------------------------------------------------------

impl Encoder<String> for ZeilenCodec {
    type Error = io::Error;

    fn encode(&mut self, item: String, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if item.contains('\n') {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "Nachricht enthaelt einen Zeilenumbruch",
            ));
        }
        let max = self.max_zeilen_laenge;
        self.inner.encode(item, dst).map_err(|e| io_fehler(e, max))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
