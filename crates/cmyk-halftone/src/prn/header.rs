//! The fixed 40-byte PRN header.

use super::PrnError;
use crate::halftone::QuantizationLevel;

/// PRN file header: ten little-endian `i32` fields.
///
/// | offset | field            |
/// |--------|------------------|
/// | 0      | signature 0x5555 |
/// | 4      | X DPI            |
/// | 8      | Y DPI            |
/// | 12     | bytes per line, rounded up to a multiple of 4 |
/// | 16     | height           |
/// | 20     | width            |
/// | 24     | paper width (0)  |
/// | 28     | color count (4)  |
/// | 32     | bits code        |
/// | 36     | reserved (0)     |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrnHeader {
    pub x_dpi: i32,
    pub y_dpi: i32,
    pub bytes_per_line: i32,
    pub height: i32,
    pub width: i32,
    pub paper_width: i32,
    pub color_count: i32,
    pub bits_code: i32,
    pub reserved: i32,
}

impl PrnHeader {
    pub const SIGNATURE: i32 = 0x5555;
    pub const SIZE: usize = 40;
    pub const COLOR_COUNT: i32 = 4;

    /// Header for a packed plane.
    ///
    /// `bytes_per_line` is the unpadded block size; the header stores it
    /// rounded up to a multiple of 4.
    pub fn new(
        width: usize,
        height: usize,
        bytes_per_line: usize,
        x_res: f64,
        y_res: f64,
        level: QuantizationLevel,
    ) -> Result<Self, PrnError> {
        Ok(Self {
            x_dpi: x_res.round() as i32,
            y_dpi: y_res.round() as i32,
            bytes_per_line: to_i32("bytes per line", bytes_per_line.div_ceil(4) * 4)?,
            height: to_i32("height", height)?,
            width: to_i32("width", width)?,
            paper_width: 0,
            color_count: Self::COLOR_COUNT,
            bits_code: level.header_code() as i32,
            reserved: 0,
        })
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let fields = [
            Self::SIGNATURE,
            self.x_dpi,
            self.y_dpi,
            self.bytes_per_line,
            self.height,
            self.width,
            self.paper_width,
            self.color_count,
            self.bits_code,
            self.reserved,
        ];
        let mut out = [0u8; Self::SIZE];
        for (chunk, value) in out.chunks_exact_mut(4).zip(fields) {
            chunk.copy_from_slice(&value.to_le_bytes());
        }
        out
    }

    /// Parse a header from the start of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrnError> {
        let head = bytes.get(..Self::SIZE).ok_or(PrnError::Truncated {
            expected: Self::SIZE,
            actual: bytes.len(),
        })?;
        let mut fields = [0i32; 10];
        for (field, chunk) in fields.iter_mut().zip(head.chunks_exact(4)) {
            *field = i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        if fields[0] != Self::SIGNATURE {
            return Err(PrnError::BadSignature(fields[0]));
        }
        Ok(Self {
            x_dpi: fields[1],
            y_dpi: fields[2],
            bytes_per_line: fields[3],
            height: fields[4],
            width: fields[5],
            paper_width: fields[6],
            color_count: fields[7],
            bits_code: fields[8],
            reserved: fields[9],
        })
    }

    /// Tone count implied by the bits code: 1 bit means two tones, 2 bits four.
    pub fn level(&self) -> Result<QuantizationLevel, PrnError> {
        match self.bits_code {
            1 => Ok(QuantizationLevel::Two),
            2 => Ok(QuantizationLevel::Four),
            other => Err(PrnError::UnsupportedBitsCode(other)),
        }
    }
}

fn to_i32(field: &'static str, value: usize) -> Result<i32, PrnError> {
    i32::try_from(value).map_err(|_| PrnError::FieldOverflow { field, value })
}
