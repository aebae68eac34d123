//! Shared fixture builders for the integration tests: enough of a PNG/zlib/
//! DEFLATE encoder to produce small, hand-verifiable test images without a
//! general-purpose compressor.

pub fn chunk(kind: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + 12);
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(kind);
    out.extend_from_slice(data);
    out.extend_from_slice(&[0, 0, 0, 0]); // CRC is not verified by this decoder
    out
}

/// Wraps `raw` in a single zlib-framed DEFLATE stored block (BTYPE=00).
pub fn zlib_stored(raw: &[u8]) -> Vec<u8> {
    assert!(raw.len() <= u16::MAX as usize, "fixture too big for one stored block");
    let mut out = vec![0x78, 0x01]; // CMF/FLG: CM=8, CINFO=7, FCHECK satisfied, FDICT=0
    out.push(0x01); // BFINAL=1, BTYPE=00, rest of byte padding
    let len = raw.len() as u16;
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(&(!len).to_le_bytes());
    out.extend_from_slice(raw);
    out
}

pub fn build_png(width: u32, height: u32, depth: u8, color_type: u8, filtered_scanlines: &[u8]) -> Vec<u8> {
    let mut out = vec![137, 80, 78, 71, 13, 10, 26, 10];

    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&width.to_be_bytes());
    ihdr.extend_from_slice(&height.to_be_bytes());
    ihdr.push(depth);
    ihdr.push(color_type);
    ihdr.push(0); // compression method
    ihdr.push(0); // filter method
    ihdr.push(0); // interlace method
    out.extend_from_slice(&chunk(b"IHDR", &ihdr));

    let idat = zlib_stored(filtered_scanlines);
    out.extend_from_slice(&chunk(b"IDAT", &idat));
    out.extend_from_slice(&chunk(b"IEND", &[]));
    out
}

/// Mirrors the decoder's code-length-alphabet transmission order, for
/// fixtures that hand-build a dynamic Huffman block.
pub const CODE_LENGTH_ORDER: [u8; 19] = [16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15];

/// Computes canonical Huffman codes for a code-length table, the same
/// algorithm the decoder's tree builder uses, so fixtures can derive codes
/// instead of transcribing them by hand.
pub fn canonical_codes(lengths: &[u8], max_len: u8) -> Vec<u32> {
    let max_len = max_len as usize;
    let mut bl_count = vec![0u32; max_len + 1];
    for &l in lengths {
        if l != 0 {
            bl_count[l as usize] += 1;
        }
    }
    let mut next_code = vec![0u32; max_len + 1];
    for bits in 1..=max_len {
        next_code[bits] = (next_code[bits - 1] + bl_count[bits - 1]) << 1;
    }
    let mut codes = vec![0u32; lengths.len()];
    for (sym, &len) in lengths.iter().enumerate() {
        if len != 0 {
            codes[sym] = next_code[len as usize];
            next_code[len as usize] += 1;
        }
    }
    codes
}

/// A minimal LSB-first bit writer, mirroring the decoder's bit-reading
/// convention, used to hand-assemble fixed-Huffman DEFLATE streams.
pub struct BitWriter {
    out: Vec<u8>,
    cur: u8,
    nbits: u32,
}

impl BitWriter {
    pub fn new() -> Self {
        BitWriter { out: Vec::new(), cur: 0, nbits: 0 }
    }

    pub fn write_bit(&mut self, bit: u32) {
        if bit & 1 != 0 {
            self.cur |= 1 << self.nbits;
        }
        self.nbits += 1;
        if self.nbits == 8 {
            self.out.push(self.cur);
            self.cur = 0;
            self.nbits = 0;
        }
    }

    pub fn write_bits_lsb_first(&mut self, value: u32, n: u32) {
        for i in 0..n {
            self.write_bit((value >> i) & 1);
        }
    }

    pub fn write_code_msb_first(&mut self, code: u32, len: u32) {
        for i in (0..len).rev() {
            self.write_bit((code >> i) & 1);
        }
    }

    pub fn finish(mut self) -> Vec<u8> {
        while self.nbits != 0 {
            self.write_bit(0);
        }
        self.out
    }
}
