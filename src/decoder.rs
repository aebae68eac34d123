//! The public decoder handle: a small state machine over `new` / `inspect`
//! / `decode` / `reset`, mirroring a reusable decode-many-images-one-handle
//! lifecycle rather than a one-shot free function.

use log::debug;

use crate::chunks;
use crate::enums::{pixel_format, ColorType, PixelFormat};
use crate::error::{DecodeStatus, ErrorSite, PngDecodeError};
use crate::filters;
use crate::inflate;
use crate::options::DecoderOptions;

/// The subset of `IHDR` a caller can inspect without running a full decode.
#[derive(Debug, Clone, Copy)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub depth: u8,
    pub color_type: ColorType,
}

impl ImageInfo {
    fn unset() -> Self {
        ImageInfo { width: 0, height: 0, depth: 8, color_type: ColorType::Rgba }
    }

    /// Bits per pixel: depth times channel count.
    pub fn bpp(&self) -> u32 {
        u32::from(self.depth) * self.color_type.channels()
    }
}

/// A reusable PNG decoding handle. Construct with [`PngDecoder::new`], feed
/// it encoded bytes with [`PngDecoder::inspect`] or [`PngDecoder::decode`],
/// and read results back off the accessors. A handle that failed to decode
/// keeps reporting its previous successful buffer (or an empty one) until
/// the next successful `decode`.
pub struct PngDecoder {
    options: DecoderOptions,
    info: ImageInfo,
    buffer: Vec<u8>,
    last_error_kind: Option<crate::error::ErrorKind>,
    last_error_site: ErrorSite,
}

impl PngDecoder {
    pub fn new() -> Self {
        PngDecoder {
            options: DecoderOptions::default(),
            info: ImageInfo::unset(),
            buffer: Vec::new(),
            last_error_kind: None,
            last_error_site: ErrorSite::None,
        }
    }

    pub fn new_with_options(options: DecoderOptions) -> Self {
        PngDecoder { options, ..Self::new() }
    }

    /// Restores a handle to its just-constructed state, ready to decode an
    /// unrelated image.
    pub fn reset(&mut self) {
        self.info = ImageInfo::unset();
        self.buffer = Vec::new();
        self.last_error_kind = None;
        self.last_error_site = ErrorSite::None;
    }

    /// Parses the signature and `IHDR` only, filling in the accessors that
    /// don't need a full decode (`width`/`height`/`depth`/`format`).
    pub fn inspect(&mut self, data: &[u8]) -> Result<(), PngDecodeError> {
        match chunks::parse_signature_and_ihdr(data, &self.options) {
            Ok(info) => {
                self.info = info;
                self.last_error_kind = None;
                self.last_error_site = ErrorSite::None;
                Ok(())
            }
            Err(e) => {
                self.record_error(&e);
                Err(e)
            }
        }
    }

    /// Fully decodes `data`: re-runs `inspect`, walks the chunk stream,
    /// inflates the concatenated `IDAT` data, and reconstructs scanlines
    /// into a freshly allocated pixel buffer. On failure the handle's
    /// buffer is left untouched.
    pub fn decode(&mut self, data: &[u8]) -> Result<(), PngDecodeError> {
        match self.decode_inner(data) {
            Ok(buffer) => {
                debug!("decoded {} byte image into a {} byte buffer", data.len(), buffer.len());
                self.buffer = buffer;
                self.last_error_kind = None;
                self.last_error_site = ErrorSite::None;
                Ok(())
            }
            Err(e) => {
                self.record_error(&e);
                Err(e)
            }
        }
    }

    #[cfg(feature = "std")]
    pub fn decode_file<P: AsRef<std::path::Path>>(&mut self, path: P) -> Result<(), PngDecodeError> {
        match std::fs::read(path.as_ref()) {
            Ok(data) => self.decode(&data),
            Err(io_err) => {
                let err = PngDecodeError::not_found(ErrorSite::File, io_err);
                self.record_error(&err);
                Err(err)
            }
        }
    }

    fn decode_inner(&mut self, data: &[u8]) -> Result<Vec<u8>, PngDecodeError> {
        self.inspect(data)?;
        let idat = chunks::collect_idat(data, &self.options)?;
        let inflated = inflate::inflate_zlib(&idat)?;
        filters::reconstruct(&inflated, self.info.width, self.info.height, self.info.bpp())
    }

    fn record_error(&mut self, err: &PngDecodeError) {
        self.last_error_kind = Some(err.kind());
        self.last_error_site = err.site();
    }

    pub fn get_error(&self) -> DecodeStatus {
        self.last_error_kind.map(DecodeStatus::from).unwrap_or_default()
    }

    pub fn get_error_site(&self) -> ErrorSite {
        self.last_error_site
    }

    pub fn get_width(&self) -> u32 {
        self.info.width
    }

    pub fn get_height(&self) -> u32 {
        self.info.height
    }

    pub fn get_bpp(&self) -> u32 {
        self.info.bpp()
    }

    pub fn get_format(&self) -> PixelFormat {
        pixel_format(self.info.color_type, self.info.depth)
    }

    pub fn get_buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn get_size(&self) -> usize {
        self.buffer.len()
    }
}

impl Default for PngDecoder {
    fn default() -> Self {
        Self::new()
    }
}
