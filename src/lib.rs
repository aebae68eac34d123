//! A small PNG decoder with its own DEFLATE/zlib inflator: no palette
//! support, no interlacing, no color management, just signature + `IHDR`
//! parsing, chunk walking, inflation and scanline reconstruction for
//! grayscale/RGB/grayscale+alpha/RGBA images at integer bit depths.

mod bitreader;
mod chunks;
mod constants;
mod decoder;
mod enums;
mod error;
mod filters;
mod huffman;
mod inflate;
mod options;

pub use crate::decoder::{ImageInfo, PngDecoder};
pub use crate::enums::{ColorType, PixelFormat};
pub use crate::error::{DecodeStatus, ErrorKind, ErrorSite, PngDecodeError};
pub use crate::options::{default_chunk_handler, DecoderOptions, UnknownChunkHandler};
