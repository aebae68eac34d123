//! zlib/DEFLATE inflation (RFC 1950 / RFC 1951), the core this crate is
//! built around: a zlib header check wrapping a DEFLATE block loop over
//! stored, fixed-Huffman and dynamic-Huffman blocks.

use log::trace;

use crate::bitreader::BitReader;
use crate::constants::{CODE_LENGTH_ORDER, DIST_BASE, DIST_EXTRA, LENGTH_BASE, LENGTH_EXTRA, NUM_CODE_LENGTH_CODES};
use crate::error::{ErrorSite, PngDecodeError};
use crate::huffman::HuffmanTree;

/// Validates the 2-byte zlib header and inflates the DEFLATE stream that
/// follows it.
pub(crate) fn inflate_zlib(data: &[u8]) -> Result<Vec<u8>, PngDecodeError> {
    if data.len() < 2 {
        return Err(PngDecodeError::malformed(ErrorSite::ZlibHeader, "zlib stream shorter than its header"));
    }
    let cmf = data[0];
    let flg = data[1];

    let header = u16::from(cmf) * 256 + u16::from(flg);
    if header % 31 != 0 {
        return Err(PngDecodeError::malformed(ErrorSite::ZlibHeader, "zlib header checksum (FCHECK) failed"));
    }

    let cm = cmf & 0x0F;
    let cinfo = cmf >> 4;
    let fdict = (flg >> 5) & 1;

    if cm != 8 {
        return Err(PngDecodeError::unsupported(ErrorSite::ZlibHeader, "zlib compression method is not DEFLATE"));
    }
    if cinfo > 7 {
        return Err(PngDecodeError::unsupported(ErrorSite::ZlibHeader, "zlib window size (CINFO) too large"));
    }
    if fdict != 0 {
        return Err(PngDecodeError::unsupported(ErrorSite::ZlibHeader, "zlib preset dictionaries are not supported"));
    }

    let mut reader = BitReader::new(&data[2..]);
    inflate_deflate(&mut reader)
}

fn inflate_deflate(reader: &mut BitReader) -> Result<Vec<u8>, PngDecodeError> {
    let mut out = Vec::new();
    loop {
        let bfinal = reader.read_bits(1)?;
        let btype = reader.read_bits(2)?;
        trace!("deflate block: bfinal={bfinal} btype={btype}");
        match btype {
            0 => inflate_stored_block(reader, &mut out)?,
            1 => inflate_huffman_block(reader, &mut out, true)?,
            2 => inflate_huffman_block(reader, &mut out, false)?,
            _ => {
                return Err(PngDecodeError::malformed(ErrorSite::DeflateBlockType, "reserved DEFLATE block type 3"))
            }
        }
        if bfinal == 1 {
            break;
        }
    }
    Ok(out)
}

fn inflate_stored_block(reader: &mut BitReader, out: &mut Vec<u8>) -> Result<(), PngDecodeError> {
    reader.align_to_byte();
    let len = reader.read_u16_aligned()?;
    let nlen = reader.read_u16_aligned()?;
    if nlen != !len {
        return Err(PngDecodeError::malformed(ErrorSite::StoredBlock, "stored block LEN/NLEN do not complement"));
    }
    out.extend_from_slice(reader.read_bytes(len as usize)?);
    Ok(())
}

fn inflate_huffman_block(reader: &mut BitReader, out: &mut Vec<u8>, fixed: bool) -> Result<(), PngDecodeError> {
    let (litlen_tree, dist_tree) = if fixed { build_fixed_trees()? } else { build_dynamic_trees(reader)? };

    loop {
        let sym = litlen_tree.decode(reader)? as u32;
        if sym < 256 {
            out.push(sym as u8);
        } else if sym == 256 {
            break;
        } else if sym <= 285 {
            let idx = (sym - 257) as usize;
            let length = LENGTH_BASE[idx] as usize + reader.read_bits(u32::from(LENGTH_EXTRA[idx]))? as usize;

            let dist_sym = dist_tree.decode(reader)? as usize;
            if dist_sym > 29 {
                return Err(PngDecodeError::malformed(ErrorSite::LzBackref, "distance symbol outside the valid range"));
            }
            let distance = DIST_BASE[dist_sym] as usize + reader.read_bits(u32::from(DIST_EXTRA[dist_sym]))? as usize;

            copy_match(out, distance, length)?;
        } else {
            return Err(PngDecodeError::malformed(ErrorSite::LzBackref, "literal/length symbol outside the valid range"));
        }
    }
    Ok(())
}

/// Copies `length` bytes from `distance` bytes back in `out`, one byte at a
/// time so that overlapping runs (distance < length) reproduce the RLE-style
/// repetition DEFLATE relies on.
fn copy_match(out: &mut Vec<u8>, distance: usize, length: usize) -> Result<(), PngDecodeError> {
    if distance == 0 || distance > out.len() {
        return Err(PngDecodeError::malformed(ErrorSite::LzBackref, "back-reference distance points before the start of output"));
    }
    let start = out.len() - distance;
    for i in 0..length {
        out.push(out[start + i]);
    }
    Ok(())
}

fn build_fixed_trees() -> Result<(HuffmanTree, HuffmanTree), PngDecodeError> {
    let mut litlen_lens = [0u8; 288];
    litlen_lens[0..144].fill(8);
    litlen_lens[144..256].fill(9);
    litlen_lens[256..280].fill(7);
    litlen_lens[280..288].fill(8);
    let litlen_tree = HuffmanTree::build(&litlen_lens, 15)?;

    let dist_lens = [5u8; 32];
    let dist_tree = HuffmanTree::build(&dist_lens, 15)?;

    Ok((litlen_tree, dist_tree))
}

fn build_dynamic_trees(reader: &mut BitReader) -> Result<(HuffmanTree, HuffmanTree), PngDecodeError> {
    let hlit = reader.read_bits(5)? as usize + 257;
    let hdist = reader.read_bits(5)? as usize + 1;
    let hclen = reader.read_bits(4)? as usize + 4;

    let mut cl_lens = [0u8; 19];
    for i in 0..hclen {
        cl_lens[CODE_LENGTH_ORDER[i] as usize] = reader.read_bits(3)? as u8;
    }
    let cl_tree = HuffmanTree::build(&cl_lens[..NUM_CODE_LENGTH_CODES], 7)?;

    let total = hlit + hdist;
    let mut lens = vec![0u8; total];
    let mut i = 0;
    while i < total {
        let sym = cl_tree.decode(reader)?;
        match sym {
            0..=15 => {
                lens[i] = sym as u8;
                i += 1;
            }
            16 => {
                if i == 0 {
                    return Err(PngDecodeError::malformed(ErrorSite::Huffman, "repeat-previous code with no previous length"));
                }
                let rep = 3 + reader.read_bits(2)? as usize;
                if i + rep > total {
                    return Err(PngDecodeError::malformed(ErrorSite::Huffman, "code-length repeat runs past the table end"));
                }
                let prev = lens[i - 1];
                for _ in 0..rep {
                    lens[i] = prev;
                    i += 1;
                }
            }
            17 => {
                let rep = 3 + reader.read_bits(3)? as usize;
                if i + rep > total {
                    return Err(PngDecodeError::malformed(ErrorSite::Huffman, "code-length zero-run runs past the table end"));
                }
                i += rep;
            }
            18 => {
                let rep = 11 + reader.read_bits(7)? as usize;
                if i + rep > total {
                    return Err(PngDecodeError::malformed(ErrorSite::Huffman, "code-length zero-run runs past the table end"));
                }
                i += rep;
            }
            _ => return Err(PngDecodeError::malformed(ErrorSite::Huffman, "invalid code-length alphabet symbol")),
        }
    }

    if lens[256] == 0 {
        return Err(PngDecodeError::malformed(ErrorSite::Huffman, "end-of-block symbol has zero length"));
    }

    let litlen_tree = HuffmanTree::build(&lens[0..hlit], 15)?;
    let dist_tree = HuffmanTree::build(&lens[hlit..hlit + hdist], 15)?;
    Ok((litlen_tree, dist_tree))
}
