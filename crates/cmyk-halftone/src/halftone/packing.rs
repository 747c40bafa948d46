//! Sub-byte packing of quantized pixel codes.
//!
//! Each output row holds four contiguous channel blocks in `C, M, Y, K`
//! order, each `bytes_per_line` bytes long. Inside a block, pixel `x`
//! lives in byte `x / pixels_per_byte` at bit offset
//! `(x % pixels_per_byte) * bits_per_pixel`, least significant bits first.

use super::{Channel, HalftoneError, QuantizationLevel};

/// Write `index` for pixel `x` into one channel block of a row.
///
/// Only the bits belonging to `x` are touched. Pixels past the end of
/// `block` are ignored.
#[inline]
pub fn pack_index(block: &mut [u8], x: usize, index: u8, level: QuantizationLevel) {
    let ppb = level.pixels_per_byte();
    let bits = level.bits_per_pixel();
    let mask = (1u8 << bits) - 1;
    let shift = (x % ppb) * bits;
    if let Some(byte) = block.get_mut(x / ppb) {
        *byte = (*byte & !(mask << shift)) | ((index & mask) << shift);
    }
}

/// Read the index stored for pixel `x` in one channel block of a row.
#[inline]
pub fn unpack_index(block: &[u8], x: usize, level: QuantizationLevel) -> u8 {
    let ppb = level.pixels_per_byte();
    let bits = level.bits_per_pixel();
    let mask = (1u8 << bits) - 1;
    let shift = (x % ppb) * bits;
    block.get(x / ppb).map_or(0, |byte| (byte >> shift) & mask)
}

/// Bit-packed halftone output for all four channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedPlane {
    data: Vec<u8>,
    width: usize,
    height: usize,
    bytes_per_line: usize,
    level: QuantizationLevel,
}

impl PackedPlane {
    /// Allocate a zeroed plane.
    pub fn new(
        width: usize,
        height: usize,
        level: QuantizationLevel,
    ) -> Result<Self, HalftoneError> {
        if width == 0 || height == 0 {
            return Err(HalftoneError::InvalidDimensions { width, height });
        }
        let bytes_per_line = level.bytes_per_line(width);
        Ok(Self {
            data: vec![0; bytes_per_line * Channel::COUNT * height],
            width,
            height,
            bytes_per_line,
            level,
        })
    }

    /// Wrap an existing packed buffer, checking its length.
    pub fn from_data(
        width: usize,
        height: usize,
        level: QuantizationLevel,
        data: Vec<u8>,
    ) -> Result<Self, HalftoneError> {
        let mut plane = Self::new(width, height, level)?;
        if data.len() != plane.data.len() {
            return Err(HalftoneError::LengthMismatch {
                expected: plane.data.len(),
                actual: data.len(),
            });
        }
        plane.data = data;
        Ok(plane)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn level(&self) -> QuantizationLevel {
        self.level
    }

    /// Bytes in one channel block of one row.
    #[inline]
    pub fn bytes_per_line(&self) -> usize {
        self.bytes_per_line
    }

    /// Bytes in one full row (all four channel blocks).
    #[inline]
    pub fn row_stride(&self) -> usize {
        self.bytes_per_line * Channel::COUNT
    }

    /// Total size of the packed buffer in bytes.
    #[inline]
    pub fn buffer_size(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// The block of `channel` in `row`, or `None` past the last row.
    pub fn channel_row(&self, row: usize, channel: Channel) -> Option<&[u8]> {
        if row >= self.height {
            return None;
        }
        let start = row * self.row_stride() + channel.index() * self.bytes_per_line;
        self.data.get(start..start + self.bytes_per_line)
    }

    /// Quantization index of one pixel.
    pub fn get(&self, x: usize, y: usize, channel: Channel) -> Option<u8> {
        if x >= self.width {
            return None;
        }
        self.channel_row(y, channel)
            .map(|block| unpack_index(block, x, self.level))
    }

    /// Store the quantization index of one pixel. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, channel: Channel, index: u8) {
        if x >= self.width || y >= self.height {
            return;
        }
        let start = y * self.row_stride() + channel.index() * self.bytes_per_line;
        let block = &mut self.data[start..start + self.bytes_per_line];
        pack_index(block, x, index, self.level);
    }

    /// Full rows, for row-parallel writers.
    pub(crate) fn rows_mut(&mut self) -> std::slice::ChunksMut<'_, u8> {
        let stride = self.row_stride();
        self.data.chunks_mut(stride)
    }

    /// Split the buffer into one lane per channel.
    ///
    /// Lane `c` holds the `c`-th block of every row, top to bottom. The
    /// lanes are disjoint, so each can be handed to a different worker.
    pub(crate) fn channel_lanes_mut(&mut self) -> Vec<Vec<&mut [u8]>> {
        let mut lanes: Vec<Vec<&mut [u8]>> = (0..Channel::COUNT)
            .map(|_| Vec::with_capacity(self.height))
            .collect();
        for (i, block) in self.data.chunks_mut(self.bytes_per_line).enumerate() {
            lanes[i % Channel::COUNT].push(block);
        }
        lanes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn round_trip(level: QuantizationLevel, width: usize) {
        let levels = level.count() as u8;
        let height = 3;
        let mut plane = PackedPlane::new(width, height, level).unwrap();
        let expected = |x: usize, y: usize, c: usize| ((x * 7 + y * 3 + c) % levels as usize) as u8;

        for y in 0..height {
            for channel in Channel::ALL {
                for x in 0..width {
                    plane.set(x, y, channel, expected(x, y, channel.index()));
                }
            }
        }
        for y in 0..height {
            for channel in Channel::ALL {
                for x in 0..width {
                    assert_eq!(
                        plane.get(x, y, channel),
                        Some(expected(x, y, channel.index())),
                        "level {levels}, width {width}, pixel ({x}, {y}) {channel:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_pack_unpack_recovers_indices() {
        for level in [
            QuantizationLevel::Two,
            QuantizationLevel::Three,
            QuantizationLevel::Four,
        ] {
            // multiples of 8 and 4, and ragged widths
            for width in [1, 3, 4, 8, 13, 16] {
                round_trip(level, width);
            }
        }
    }

    #[test]
    fn test_bit_positions_are_lsb_first() {
        let mut block = [0u8; 1];
        pack_index(&mut block, 0, 1, QuantizationLevel::Two);
        pack_index(&mut block, 7, 1, QuantizationLevel::Two);
        assert_eq!(block[0], 0b1000_0001);

        let mut block = [0u8; 1];
        pack_index(&mut block, 1, 3, QuantizationLevel::Four);
        assert_eq!(block[0], 0b0000_1100);
    }

    #[test]
    fn test_pack_clears_previous_value() {
        let mut block = [0xFFu8; 1];
        pack_index(&mut block, 2, 0, QuantizationLevel::Four);
        assert_eq!(block[0], 0b1100_1111);
    }

    #[test]
    fn test_layout_places_channels_contiguously() {
        let mut plane = PackedPlane::new(10, 2, QuantizationLevel::Two).unwrap();
        assert_eq!(plane.bytes_per_line(), 2);
        assert_eq!(plane.buffer_size(), 2 * 4 * 2);

        plane.set(9, 1, Channel::Yellow, 1);
        // row 1, yellow block, second byte, bit 1
        assert_eq!(plane.data()[8 + 2 * 2 + 1], 0b0000_0010);
        assert_eq!(plane.channel_row(1, Channel::Yellow), Some(&[0u8, 2][..]));
    }

    #[test]
    fn test_channel_lanes_are_disjoint_and_ordered() {
        let mut plane = PackedPlane::new(8, 3, QuantizationLevel::Two).unwrap();
        let mut lanes = plane.channel_lanes_mut();
        assert_eq!(lanes.len(), 4);
        for (c, lane) in lanes.iter_mut().enumerate() {
            assert_eq!(lane.len(), 3);
            for block in lane.iter_mut() {
                block[0] = c as u8 + 1;
            }
        }
        drop(lanes);
        assert_eq!(plane.data(), &[1, 2, 3, 4, 1, 2, 3, 4, 1, 2, 3, 4]);
    }

    #[test]
    fn test_zero_width_is_rejected() {
        assert_eq!(
            PackedPlane::new(0, 4, QuantizationLevel::Two),
            Err(HalftoneError::InvalidDimensions {
                width: 0,
                height: 4
            })
        );
    }

    #[test]
    fn test_from_data_checks_length() {
        let err = PackedPlane::from_data(8, 1, QuantizationLevel::Two, vec![0; 3]).unwrap_err();
        assert_eq!(
            err,
            HalftoneError::LengthMismatch {
                expected: 4,
                actual: 3
            }
        );
    }
}
