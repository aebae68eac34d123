mod common;

use common::build_png;
use minipng::{ColorType, PixelFormat, PngDecoder};

#[test]
fn one_by_one_opaque_red_rgb() {
    // filter byte (None) + one RGB pixel
    let scanline = [0u8, 0xFF, 0x00, 0x00];
    let png = build_png(1, 1, 8, 2, &scanline);

    let mut d = PngDecoder::new();
    d.decode(&png).unwrap();

    assert_eq!(d.get_width(), 1);
    assert_eq!(d.get_height(), 1);
    assert_eq!(d.get_bpp(), 24);
    assert_eq!(d.get_format(), PixelFormat::Rgb8);
    assert_eq!(d.get_buffer(), &[0xFF, 0x00, 0x00]);
}

#[test]
fn two_by_two_depth_1_grey_checkerboard() {
    // row0 pixels "1 0", row1 pixels "0 1", each row filter None then
    // packed MSB-first into one byte (2 bits used, 6 bits padding).
    let mut scanlines = Vec::new();
    scanlines.push(0u8); // filter, row0
    scanlines.push(0b1000_0000);
    scanlines.push(0u8); // filter, row1
    scanlines.push(0b0100_0000);

    let png = build_png(2, 2, 1, 0, &scanlines);
    let mut d = PngDecoder::new();
    d.decode(&png).unwrap();

    assert_eq!(d.get_format(), PixelFormat::Grey1);
    assert_eq!(d.get_buffer(), &[0b1001_0000]);
}

#[test]
fn eight_by_one_depth_4_grey_ramp() {
    let scanline = [0u8, 0x01, 0x23, 0x45, 0x67];
    let png = build_png(8, 1, 4, 0, &scanline);

    let mut d = PngDecoder::new();
    d.decode(&png).unwrap();

    assert_eq!(d.get_format(), PixelFormat::Grey4);
    assert_eq!(d.get_buffer(), &[0x01, 0x23, 0x45, 0x67]);
}

#[test]
fn stored_and_fixed_huffman_blocks_decode_identically() {
    use common::{chunk, BitWriter};

    // 6x1 depth-8 grayscale: one filter byte (None) + six 'A' pixel bytes.
    let mut scanline = vec![0u8];
    scanline.extend_from_slice(b"AAAAAA");

    let png_stored = build_png(6, 1, 8, 0, &scanline);

    // Same scanline bytes, but the IDAT is a single fixed-Huffman block
    // encoding literal 0x00, literal 'A', then a length-5/distance-1
    // back-reference for the remaining five 'A's.
    let mut w = BitWriter::new();
    w.write_bit(1); // BFINAL
    w.write_bits_lsb_first(1, 2); // BTYPE = 01 (fixed)
    w.write_code_msb_first(0x30, 8); // literal 0x00
    w.write_code_msb_first(0x30 + u32::from(b'A'), 8); // literal 'A'
    w.write_code_msb_first(259 - 256, 7); // length symbol for length 5
    w.write_code_msb_first(0, 5); // distance symbol for distance 1
    w.write_code_msb_first(0, 7); // end of block
    let mut idat = vec![0x78, 0x01];
    idat.extend_from_slice(&w.finish());

    let mut png_fixed = vec![137, 80, 78, 71, 13, 10, 26, 10];
    let mut ihdr = Vec::new();
    ihdr.extend_from_slice(&6u32.to_be_bytes());
    ihdr.extend_from_slice(&1u32.to_be_bytes());
    ihdr.extend_from_slice(&[8, 0, 0, 0, 0]);
    png_fixed.extend_from_slice(&chunk(b"IHDR", &ihdr));
    png_fixed.extend_from_slice(&chunk(b"IDAT", &idat));
    png_fixed.extend_from_slice(&chunk(b"IEND", &[]));

    let mut d_stored = PngDecoder::new();
    d_stored.decode(&png_stored).unwrap();

    let mut d_fixed = PngDecoder::new();
    d_fixed.decode(&png_fixed).unwrap();

    assert_eq!(d_stored.get_buffer(), d_fixed.get_buffer());
    assert_eq!(d_stored.get_buffer(), b"AAAAAA");
}

#[test]
fn grey_alpha_and_rgba_channel_counts() {
    let ga_scanline = [0u8, 10, 20];
    let ga_png = build_png(1, 1, 8, 4, &ga_scanline);
    let mut d = PngDecoder::new();
    d.decode(&ga_png).unwrap();
    assert_eq!(d.get_bpp(), 16);
    assert_eq!(d.get_format(), PixelFormat::GreyAlpha8);

    let rgba_scanline = [0u8, 1, 2, 3, 4];
    let rgba_png = build_png(1, 1, 8, 6, &rgba_scanline);
    let mut d2 = PngDecoder::new();
    d2.decode(&rgba_png).unwrap();
    assert_eq!(d2.get_bpp(), 32);
    assert_eq!(d2.get_format(), PixelFormat::Rgba8);
    assert_eq!(d2.get_buffer(), &[1, 2, 3, 4]);
}

#[test]
fn inspect_fills_descriptor_without_decoding_pixels() {
    let scanline = [0u8, 0xFF, 0x00, 0x00];
    let png = build_png(1, 1, 8, 2, &scanline);

    let mut d = PngDecoder::new();
    d.inspect(&png).unwrap();

    assert_eq!(d.get_width(), 1);
    assert_eq!(d.get_height(), 1);
    assert_eq!(d.get_format(), PixelFormat::Rgb8);
    assert!(d.get_buffer().is_empty());
}

#[test]
fn inspect_succeeds_on_signature_plus_ihdr_with_no_crc_yet() {
    // Signature (8) + IHDR length/type/data (4 + 4 + 13) = 29 bytes, with
    // the IHDR chunk's trailing CRC not yet present. `inspect` only reads
    // up to the end of the IHDR data, so this should still populate the
    // descriptor even though a full `decode` of the same prefix has no
    // chance of finding an IDAT.
    let full = build_png(1, 1, 8, 2, &[0u8, 0xFF, 0x00, 0x00]);
    let prefix = &full[..29];

    let mut d = PngDecoder::new();
    d.inspect(prefix).unwrap();

    assert_eq!(d.get_width(), 1);
    assert_eq!(d.get_height(), 1);
    assert_eq!(d.get_format(), PixelFormat::Rgb8);
}

#[test]
fn fresh_handle_defaults_to_rgba_depth_8() {
    let d = PngDecoder::new();
    assert_eq!(d.get_format(), PixelFormat::Rgba8);
    let _ = ColorType::Rgba;
}

#[test]
fn decode_file_reads_and_decodes_from_disk() {
    let scanline = [0u8, 0xFF, 0x00, 0x00];
    let png = build_png(1, 1, 8, 2, &scanline);

    let mut path = std::env::temp_dir();
    path.push("minipng_decode_file_reads_and_decodes_from_disk.png");
    std::fs::write(&path, &png).unwrap();

    let mut d = PngDecoder::new();
    d.decode_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(d.get_width(), 1);
    assert_eq!(d.get_format(), PixelFormat::Rgb8);
    assert_eq!(d.get_buffer(), &[0xFF, 0x00, 0x00]);
}

#[test]
fn decode_file_reports_not_found_for_a_missing_path() {
    let mut path = std::env::temp_dir();
    path.push("minipng_decode_file_reports_not_found_for_a_missing_path.png");
    let _ = std::fs::remove_file(&path);

    let mut d = PngDecoder::new();
    let err = d.decode_file(&path).unwrap_err();
    assert_eq!(err.kind(), minipng::ErrorKind::NotFound);
    assert_eq!(d.get_error(), minipng::DecodeStatus::NotFound);
}
