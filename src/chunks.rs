//! PNG container parsing: signature check, `IHDR` field extraction and
//! validation, and the chunk walk that concatenates `IDAT` payloads and
//! stops at `IEND`.

use log::{info, trace};

use crate::constants::PNG_SIGNATURE;
use crate::decoder::ImageInfo;
use crate::enums::ColorType;
use crate::error::{ErrorSite, PngDecodeError};
use crate::options::DecoderOptions;

/// Offset of the first chunk after the fixed-size signature + `IHDR` chunk
/// (8 signature bytes + 4 length + 4 type + 13 data + 4 CRC = 33).
const FIRST_CHUNK_OFFSET: usize = 33;

/// Minimum length `inspect` needs: signature (8) + length (4) + type (4) +
/// IHDR data (13) = 29. The IHDR chunk's trailing CRC isn't required to
/// populate the descriptor, only to walk past it into the next chunk.
const MIN_INSPECT_LENGTH: usize = 29;

/// Parses the 8-byte signature and the `IHDR` chunk only. This is the whole
/// of what `PngDecoder::inspect` needs.
pub(crate) fn parse_signature_and_ihdr(data: &[u8], options: &DecoderOptions) -> Result<ImageInfo, PngDecodeError> {
    if data.len() < MIN_INSPECT_LENGTH {
        return Err(PngDecodeError::not_png(ErrorSite::Signature, "input too short to hold a PNG signature and IHDR chunk"));
    }
    if data[0..8] != PNG_SIGNATURE {
        return Err(PngDecodeError::not_png(ErrorSite::Signature, "missing PNG signature"));
    }
    if &data[12..16] != b"IHDR" {
        return Err(PngDecodeError::not_png(ErrorSite::Ihdr, "first chunk after the signature is not IHDR"));
    }

    let info = parse_ihdr(&data[16..29], options)?;
    info!("width: {}", info.width);
    info!("height: {}", info.height);
    info!("depth: {}", info.depth);
    info!("color type: {:?}", info.color_type);
    Ok(info)
}

fn parse_ihdr(fields: &[u8], options: &DecoderOptions) -> Result<ImageInfo, PngDecodeError> {
    let width = u32::from_be_bytes(fields[0..4].try_into().unwrap());
    let height = u32::from_be_bytes(fields[4..8].try_into().unwrap());
    let depth = fields[8];
    let color_byte = fields[9];
    let compression = fields[10];
    let filter = fields[11];
    let interlace = fields[12];

    if width == 0 || height == 0 {
        return Err(PngDecodeError::malformed(ErrorSite::Ihdr, "width or height is zero"));
    }
    if u64::from(width) > u64::from(options.max_width) {
        return Err(PngDecodeError::too_large(ErrorSite::Dimensions, u64::from(width), u64::from(options.max_width)));
    }
    if u64::from(height) > u64::from(options.max_height) {
        return Err(PngDecodeError::too_large(ErrorSite::Dimensions, u64::from(height), u64::from(options.max_height)));
    }

    let color_type = ColorType::from_byte(color_byte)
        .ok_or_else(|| PngDecodeError::malformed_owned(ErrorSite::Ihdr, format!("unknown color type byte {color_byte}")))?;

    let depth_ok = match color_type {
        ColorType::Grey => matches!(depth, 1 | 2 | 4 | 8 | 16),
        ColorType::Rgb | ColorType::GreyAlpha | ColorType::Rgba => matches!(depth, 8 | 16),
    };
    if !depth_ok {
        return Err(PngDecodeError::malformed_owned(
            ErrorSite::Ihdr,
            format!("color depth {depth} is not valid for color type {color_type:?}"),
        ));
    }

    if compression != 0 {
        return Err(PngDecodeError::unsupported(ErrorSite::Ihdr, "unsupported IHDR compression method"));
    }
    if filter != 0 {
        return Err(PngDecodeError::unsupported(ErrorSite::Ihdr, "unsupported IHDR filter method"));
    }
    if interlace != 0 {
        return Err(PngDecodeError::unsupported(ErrorSite::Ihdr, "Adam7 interlacing is not supported"));
    }

    Ok(ImageInfo { width, height, depth, color_type })
}

/// Walks every chunk after `IHDR`, concatenating `IDAT` payloads and
/// stopping at `IEND`. Unknown ancillary chunks are handed to
/// `options.unknown_chunk_handler`; unknown critical chunks are rejected.
pub(crate) fn collect_idat(data: &[u8], options: &DecoderOptions) -> Result<Vec<u8>, PngDecodeError> {
    let mut idat = Vec::new();
    let mut pos = FIRST_CHUNK_OFFSET;
    let mut seen_iend = false;

    while !seen_iend {
        if pos + 12 > data.len() {
            return Err(PngDecodeError::malformed(ErrorSite::ChunkHeader, "truncated chunk header"));
        }

        let length = u32::from_be_bytes(data[pos..pos + 4].try_into().unwrap());
        if length > i32::MAX as u32 {
            return Err(PngDecodeError::malformed(ErrorSite::ChunkLength, "chunk length exceeds INT_MAX"));
        }
        let length = length as usize;
        let chunk_type: [u8; 4] = data[pos + 4..pos + 8].try_into().unwrap();

        if pos + length + 12 > data.len() {
            return Err(PngDecodeError::malformed(ErrorSite::ChunkLength, "chunk declares more data than remains in the input"));
        }
        let chunk_data = &data[pos + 8..pos + 8 + length];

        match &chunk_type {
            b"IDAT" => idat.extend_from_slice(chunk_data),
            b"IEND" => seen_iend = true,
            _ if chunk_type[0] & 0x20 == 0 => {
                return Err(PngDecodeError::unsupported(ErrorSite::CriticalChunk, "unknown critical chunk"));
            }
            _ => {
                trace!("ancillary chunk at offset {pos}, {length} bytes");
                (options.unknown_chunk_handler)(chunk_type, chunk_data);
            }
        }

        pos += length + 12;
    }

    Ok(idat)
}
