//! Error taxonomy shared by the container parser and the inflator.
//!
//! Every fallible operation in this crate returns a [`PngDecodeError`], which
//! carries both a coarse [`ErrorKind`] (what went wrong) and an [`ErrorSite`]
//! (roughly where). `PngDecoder` keeps the two tags around after a failed
//! call so callers that dropped the `Result` can still ask about the last
//! failure.

use std::fmt;

/// Coarse classification of a decode failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A size guard in [`crate::DecoderOptions`] was exceeded.
    NoMem,
    /// The input does not start with the PNG signature, or the first chunk
    /// is not `IHDR`.
    NotPng,
    /// The input has the right shape but violates some structural rule
    /// (bad chunk bounds, bad IHDR field, broken DEFLATE stream, ...).
    Malformed,
    /// The input uses a PNG or DEFLATE feature this decoder does not
    /// implement (interlacing, an unsupported color depth, an unknown
    /// critical chunk, ...).
    Unsupported,
    /// `decode_file` could not read the file.
    NotFound,
}

/// Where, approximately, a [`PngDecodeError`] originated. Exposed so a
/// caller that only has a [`PngDecoder`](crate::PngDecoder) handle (no
/// `Result` in hand) can still narrow down the failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSite {
    /// No error has occurred yet.
    None,
    Signature,
    Ihdr,
    Dimensions,
    ChunkHeader,
    ChunkLength,
    CriticalChunk,
    ZlibHeader,
    DeflateBlockType,
    BitStream,
    Huffman,
    LzBackref,
    StoredBlock,
    Scanline,
    FilterByte,
    File,
}

#[derive(Debug)]
enum Payload {
    Static(&'static str),
    Owned(String),
    TooLarge { requested: u64, limit: u64 },
    Io(std::io::Error),
}

/// The error type returned by every fallible operation in this crate.
#[derive(Debug)]
pub struct PngDecodeError {
    kind: ErrorKind,
    site: ErrorSite,
    payload: Payload,
}

impl PngDecodeError {
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn site(&self) -> ErrorSite {
        self.site
    }

    pub(crate) fn not_png(site: ErrorSite, reason: &'static str) -> Self {
        PngDecodeError { kind: ErrorKind::NotPng, site, payload: Payload::Static(reason) }
    }

    pub(crate) fn malformed(site: ErrorSite, reason: &'static str) -> Self {
        PngDecodeError { kind: ErrorKind::Malformed, site, payload: Payload::Static(reason) }
    }

    pub(crate) fn malformed_owned(site: ErrorSite, reason: String) -> Self {
        PngDecodeError { kind: ErrorKind::Malformed, site, payload: Payload::Owned(reason) }
    }

    pub(crate) fn unsupported(site: ErrorSite, reason: &'static str) -> Self {
        PngDecodeError { kind: ErrorKind::Unsupported, site, payload: Payload::Static(reason) }
    }

    pub(crate) fn too_large(site: ErrorSite, requested: u64, limit: u64) -> Self {
        PngDecodeError { kind: ErrorKind::NoMem, site, payload: Payload::TooLarge { requested, limit } }
    }

    pub(crate) fn not_found(site: ErrorSite, source: std::io::Error) -> Self {
        PngDecodeError { kind: ErrorKind::NotFound, site, payload: Payload::Io(source) }
    }
}

impl fmt::Display for PngDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Payload::Static(s) => write!(f, "{s} (at {:?})", self.site),
            Payload::Owned(s) => write!(f, "{s} (at {:?})", self.site),
            Payload::TooLarge { requested, limit } => {
                write!(f, "dimension {requested} exceeds configured limit {limit} (at {:?})", self.site)
            }
            Payload::Io(e) => write!(f, "{e} (at {:?})", self.site),
        }
    }
}

impl std::error::Error for PngDecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.payload {
            Payload::Io(e) => Some(e),
            _ => None,
        }
    }
}

/// Status code reported by [`PngDecoder::get_error`](crate::PngDecoder::get_error),
/// with an `Ok` variant standing in for "no error recorded yet".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeStatus {
    #[default]
    Ok,
    NoMem,
    NotPng,
    Malformed,
    Unsupported,
    NotFound,
}

impl From<ErrorKind> for DecodeStatus {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::NoMem => DecodeStatus::NoMem,
            ErrorKind::NotPng => DecodeStatus::NotPng,
            ErrorKind::Malformed => DecodeStatus::Malformed,
            ErrorKind::Unsupported => DecodeStatus::Unsupported,
            ErrorKind::NotFound => DecodeStatus::NotFound,
        }
    }
}
