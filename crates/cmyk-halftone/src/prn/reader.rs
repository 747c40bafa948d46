//! PRN decoding, used for inspection and verification.

use std::path::Path;

use super::{padding, PrnError, PrnHeader};
use crate::halftone::{unpack_index, Channel, QuantizationLevel};

/// A parsed PRN image.
#[derive(Debug, Clone)]
pub struct PrnFile {
    header: PrnHeader,
    /// Unpadded block size, derived from the width and bits code.
    bytes_per_line: usize,
    body: Vec<u8>,
}

impl PrnFile {
    pub fn read(path: impl AsRef<Path>) -> Result<Self, PrnError> {
        Self::parse(&std::fs::read(path)?)
    }

    pub fn parse(bytes: &[u8]) -> Result<Self, PrnError> {
        let header = PrnHeader::from_bytes(bytes)?;
        let level = header.level()?;
        let width = non_negative("width", header.width)?;
        let height = non_negative("height", header.height)?;
        if header.color_count != PrnHeader::COLOR_COUNT {
            return Err(PrnError::InvalidField {
                field: "color count",
                value: header.color_count,
            });
        }

        let bytes_per_line = level.bytes_per_line(width);
        let padded = bytes_per_line + padding(bytes_per_line);
        if non_negative("bytes per line", header.bytes_per_line)? != padded {
            return Err(PrnError::InvalidField {
                field: "bytes per line",
                value: header.bytes_per_line,
            });
        }

        let expected = PrnHeader::SIZE + height * Channel::COUNT * padded;
        if bytes.len() < expected {
            return Err(PrnError::Truncated {
                expected,
                actual: bytes.len(),
            });
        }

        Ok(Self {
            header,
            bytes_per_line,
            body: bytes[PrnHeader::SIZE..expected].to_vec(),
        })
    }

    pub fn header(&self) -> &PrnHeader {
        &self.header
    }

    pub fn width(&self) -> usize {
        self.header.width as usize
    }

    pub fn height(&self) -> usize {
        self.header.height as usize
    }

    pub fn bytes_per_line(&self) -> usize {
        self.bytes_per_line
    }

    /// Tones per channel. Files written with three tones read back as four.
    pub fn level(&self) -> QuantizationLevel {
        self.header.level().unwrap_or(QuantizationLevel::Four)
    }

    /// The unpadded block of `channel` in `row`.
    pub fn channel_block(&self, row: usize, channel: Channel) -> Option<&[u8]> {
        if row >= self.height() {
            return None;
        }
        let padded = self.bytes_per_line + padding(self.bytes_per_line);
        let slot = Channel::PRN_ORDER.iter().position(|&c| c == channel)?;
        let start = (row * Channel::COUNT + slot) * padded;
        self.body.get(start..start + self.bytes_per_line)
    }

    /// Quantization index of one pixel.
    pub fn pixel(&self, x: usize, y: usize, channel: Channel) -> Option<u8> {
        if x >= self.width() {
            return None;
        }
        self.channel_block(y, channel)
            .map(|block| unpack_index(block, x, self.level()))
    }

    /// Fraction of pixels in `channel` that carry any ink.
    pub fn coverage(&self, channel: Channel) -> f64 {
        let total = self.width() * self.height();
        if total == 0 {
            return 0.0;
        }
        let inked = (0..self.height())
            .flat_map(|y| (0..self.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| self.pixel(x, y, channel).is_some_and(|v| v > 0))
            .count();
        inked as f64 / total as f64
    }
}

fn non_negative(field: &'static str, value: i32) -> Result<usize, PrnError> {
    usize::try_from(value).map_err(|_| PrnError::InvalidField { field, value })
}
