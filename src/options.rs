//! Decoder configuration: size guards and a hook for observing ancillary
//! chunks the core decoder otherwise just skips.

use log::trace;

/// Called for every non-critical chunk this decoder does not parse itself
/// (everything except `IHDR`/`IDAT`/`IEND`). The default implementation
/// just traces that the chunk was skipped.
pub type UnknownChunkHandler = fn(chunk_type: [u8; 4], data: &[u8]);

pub fn default_chunk_handler(chunk_type: [u8; 4], data: &[u8]) {
    let name = std::str::from_utf8(&chunk_type).unwrap_or("????");
    trace!("skipping ancillary chunk {name:?} ({} bytes)", data.len());
}

/// Configuration accepted by [`PngDecoder::new_with_options`](crate::PngDecoder::new_with_options).
#[derive(Clone, Copy)]
pub struct DecoderOptions {
    /// Rejects images wider than this with [`ErrorKind::NoMem`](crate::ErrorKind::NoMem).
    pub max_width: u32,
    /// Rejects images taller than this with [`ErrorKind::NoMem`](crate::ErrorKind::NoMem).
    pub max_height: u32,
    pub unknown_chunk_handler: UnknownChunkHandler,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        DecoderOptions { max_width: 1 << 20, max_height: 1 << 20, unknown_chunk_handler: default_chunk_handler }
    }
}
