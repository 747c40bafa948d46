//! PRN layout produced through the library API.

mod common;

use cmyk_halftone::{prn, Channel, CmykBuffer, HalftoneMethod, PrnFile, QuantizationLevel};
use pretty_assertions::assert_eq;

#[test]
fn test_three_tone_plane_uses_two_bits() {
    let buffer = CmykBuffer::filled(5, 2, [0, 0, 0, 255]);
    let plane = HalftoneMethod::Ordered
        .dither(&buffer, QuantizationLevel::Three)
        .unwrap();
    let bytes = prn::encode(&plane, 360.0, 180.0).unwrap();

    let prn = common::parse_prn(&bytes);
    assert_eq!(prn.header().bits_code, 2);
    assert_eq!((prn.header().x_dpi, prn.header().y_dpi), (360, 180));
    // 5 px at 2 bits: 2 bytes, padded to 4
    assert_eq!(prn.header().bytes_per_line, 4);
    assert_eq!(prn.pixel(4, 1, Channel::Black), Some(2));
    assert_eq!(prn.pixel(4, 1, Channel::Yellow), Some(0));
}

#[test]
fn test_rows_are_padded_per_block() {
    let buffer = CmykBuffer::filled(9, 3, [255, 0, 0, 0]);
    let plane = HalftoneMethod::ErrorDiffusion
        .dither(&buffer, QuantizationLevel::Two)
        .unwrap();
    let bytes = prn::encode(&plane, 300.0, 300.0).unwrap();

    // 9 px at 1 bit: 2 bytes, padded to 4, four blocks per row
    assert_eq!(bytes.len(), 40 + 3 * 4 * 4);
    let row = &bytes[40..56];
    assert_eq!(&row[0..4], &[0, 0, 0, 0], "K");
    assert_eq!(&row[4..8], &[0xFF, 0x01, 0, 0], "C");
    assert_eq!(&row[8..16], &[0; 8], "M and Y");
}

#[test]
fn test_reader_rejects_truncated_file() {
    let plane = HalftoneMethod::Ordered
        .dither(&CmykBuffer::filled(8, 8, [0; 4]), QuantizationLevel::Two)
        .unwrap();
    let bytes = prn::encode(&plane, 300.0, 300.0).unwrap();
    assert!(PrnFile::parse(&bytes[..bytes.len() - 1]).is_err());
}
