//! Canonical Huffman code construction and bit-by-bit decoding.
//!
//! The tree is a flat `Vec<u16>` of two-child nodes: node `i` occupies
//! slots `2*i` (bit 0) and `2*i + 1` (bit 1). A slot holds either a leaf
//! symbol (`< numcodes`), a pointer to another node (`>= numcodes`, offset
//! by `numcodes`), or the `UNFILLED` sentinel if that path has no code.
//! Hitting `UNFILLED` during decode is a malformed stream, not a silent
//! fallback to symbol 0.

use crate::bitreader::BitReader;
use crate::error::{ErrorSite, PngDecodeError};

const UNFILLED: u16 = u16::MAX;

pub(crate) struct HuffmanTree {
    tree: Vec<u16>,
    numcodes: usize,
}

impl HuffmanTree {
    /// Builds a canonical Huffman tree from a per-symbol code-length table.
    /// `lengths[i] == 0` means symbol `i` is absent from the code.
    pub(crate) fn build(lengths: &[u8], max_bit_len: u8) -> Result<Self, PngDecodeError> {
        let numcodes = lengths.len();
        let max_bit_len = max_bit_len as usize;

        let mut bl_count = vec![0u32; max_bit_len + 1];
        for &len in lengths {
            if len != 0 {
                bl_count[len as usize] += 1;
            }
        }

        let mut next_code = vec![0u32; max_bit_len + 1];
        for bits in 1..=max_bit_len {
            next_code[bits] = (next_code[bits - 1] + bl_count[bits - 1]) << 1;
        }

        let mut codes = vec![0u32; numcodes];
        for (sym, &len) in lengths.iter().enumerate() {
            if len != 0 {
                codes[sym] = next_code[len as usize];
                next_code[len as usize] += 1;
            }
        }

        let mut tree = vec![UNFILLED; numcodes * 2];
        let mut nodefilled = 0usize;

        for (sym, &len) in lengths.iter().enumerate() {
            let len = len as usize;
            if len == 0 {
                continue;
            }
            let mut treepos = 0usize;
            for i in 0..len {
                if treepos > numcodes.saturating_sub(2) {
                    return Err(PngDecodeError::malformed(
                        ErrorSite::Huffman,
                        "oversubscribed Huffman code: too many codes for the given lengths",
                    ));
                }
                let bit = ((codes[sym] >> (len - i - 1)) & 1) as usize;
                let slot = 2 * treepos + bit;
                if tree[slot] == UNFILLED {
                    if i + 1 == len {
                        tree[slot] = sym as u16;
                    } else {
                        nodefilled += 1;
                        tree[slot] = (nodefilled + numcodes) as u16;
                        treepos = nodefilled;
                    }
                } else if i + 1 == len {
                    return Err(PngDecodeError::malformed(
                        ErrorSite::Huffman,
                        "duplicate Huffman code assigned to two symbols",
                    ));
                } else {
                    treepos = tree[slot] as usize - numcodes;
                }
            }
        }

        Ok(HuffmanTree { tree, numcodes })
    }

    pub(crate) fn decode(&self, reader: &mut BitReader) -> Result<u16, PngDecodeError> {
        let mut node = 0usize;
        loop {
            let bit = reader.read_bit()? as usize;
            let slot = 2 * node + bit;
            let val = self.tree[slot];
            if val == UNFILLED {
                return Err(PngDecodeError::malformed(ErrorSite::Huffman, "Huffman code not present in tree"));
            }
            if (val as usize) < self.numcodes {
                return Ok(val);
            }
            node = val as usize - self.numcodes;
        }
    }
}
