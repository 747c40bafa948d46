//! Assertion helpers for tests.

use cmyk_halftone::{Channel, PrnFile, PrnHeader};
use pretty_assertions::assert_eq;

/// Assert the header fields that every PRN file shares
pub fn assert_valid_header(header: &PrnHeader) {
    assert_eq!(header.color_count, 4, "color count");
    assert_eq!(header.paper_width, 0, "paper width");
    assert_eq!(header.reserved, 0, "reserved field");
    assert_eq!(
        header.bytes_per_line % 4,
        0,
        "bytes per line {} is not a multiple of 4",
        header.bytes_per_line
    );
    assert!(
        header.bits_code == 1 || header.bits_code == 2,
        "unexpected bits code {}",
        header.bits_code
    );
}

/// Assert a PRN image has exactly header + rows of four padded blocks
pub fn assert_file_size(bytes: &[u8], header: &PrnHeader) {
    let expected = PrnHeader::SIZE + header.height as usize * 4 * header.bytes_per_line as usize;
    assert_eq!(bytes.len(), expected, "PRN file size");
}

/// Parse and check a PRN image
pub fn parse_prn(bytes: &[u8]) -> PrnFile {
    let prn = PrnFile::parse(bytes).expect("valid PRN image");
    assert_valid_header(prn.header());
    assert_file_size(bytes, prn.header());
    prn
}

/// Assert no channel carries any ink
pub fn assert_blank(prn: &PrnFile) {
    for channel in Channel::ALL {
        assert_eq!(prn.coverage(channel), 0.0, "{channel:?} should be blank");
    }
}
