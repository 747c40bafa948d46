//! Ordered (Bayer matrix) halftoning.
//!
//! Every sample is nudged by a position-dependent offset taken from an
//! 8x8 Bayer matrix and then snapped to the nearest tone. The offset spans
//! one tone step, centered on zero, so flat areas break up into the
//! familiar cross-hatch pattern instead of banding. No state is carried
//! between pixels, so rows are processed in parallel.

use rayon::prelude::*;

use super::packing::{pack_index, PackedPlane};
use super::{Channel, HalftoneError, QuantizationLevel};
use crate::color::CmykBuffer;

/// 8x8 Bayer threshold matrix, values `0..64`.
pub const BAYER_8X8: [[u8; 8]; 8] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// Offset added to the sample at `(x, y)` before quantizing.
#[inline]
pub(crate) fn threshold_offset(x: usize, y: usize, level: QuantizationLevel) -> f32 {
    let normalized = BAYER_8X8[y % 8][x % 8] as f32 * 255.0 / 64.0;
    (normalized / 255.0 - 0.5) * level.step()
}

pub(crate) fn dither(
    buffer: &CmykBuffer,
    level: QuantizationLevel,
) -> Result<PackedPlane, HalftoneError> {
    let width = buffer.width();
    let height = buffer.height();
    let mut plane = PackedPlane::new(width, height, level)?;
    let bytes_per_line = plane.bytes_per_line();
    let source = buffer.data();

    let rows: Vec<&mut [u8]> = plane.rows_mut().collect();
    rows.into_par_iter().enumerate().for_each(|(y, row)| {
        let row_start = y * width;
        for (channel, block) in row.chunks_mut(bytes_per_line).enumerate() {
            for x in 0..width {
                let sample = source[(row_start + x) * Channel::COUNT + channel] as f32;
                let (_, index) = level.quantize(sample + threshold_offset(x, y, level));
                pack_index(block, x, index, level);
            }
        }
    });

    Ok(plane)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bayer_matrix_is_a_permutation() {
        let mut seen = [false; 64];
        for row in BAYER_8X8 {
            for v in row {
                assert!(!seen[v as usize], "{v} appears twice");
                seen[v as usize] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_offset_is_centered_within_one_step() {
        let level = QuantizationLevel::Two;
        assert_eq!(threshold_offset(0, 0, level), -127.5);
        let max = threshold_offset(0, 7, level);
        assert!(max < 127.5 && max > 120.0);

        let mean: f32 = (0..8)
            .flat_map(|y| (0..8).map(move |x| threshold_offset(x, y, level)))
            .sum::<f32>()
            / 64.0;
        assert!(mean.abs() < 2.5, "mean offset {mean}");
    }

    #[test]
    fn test_flat_mid_gray_breaks_into_pattern() {
        let buffer = CmykBuffer::filled(16, 16, [128; 4]);
        let plane = dither(&buffer, QuantizationLevel::Two).unwrap();
        let on = (0..16)
            .flat_map(|y| (0..16).map(move |x| (x, y)))
            .filter(|&(x, y)| plane.get(x, y, Channel::Magenta) == Some(1))
            .count();
        assert_eq!(on, 128);
    }

    #[test]
    fn test_extremes_stay_solid() {
        let buffer = CmykBuffer::filled(8, 8, [0, 255, 0, 255]);
        let plane = dither(&buffer, QuantizationLevel::Four).unwrap();
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(plane.get(x, y, Channel::Cyan), Some(0));
                assert_eq!(plane.get(x, y, Channel::Magenta), Some(3));
                assert_eq!(plane.get(x, y, Channel::Black), Some(3));
            }
        }
    }

    #[test]
    fn test_pattern_repeats_every_eight_pixels() {
        let buffer = CmykBuffer::filled(24, 16, [0, 0, 100, 0]);
        let plane = dither(&buffer, QuantizationLevel::Two).unwrap();
        for y in 0..8 {
            for x in 0..16 {
                assert_eq!(
                    plane.get(x, y, Channel::Yellow),
                    plane.get(x + 8, y + 8, Channel::Yellow)
                );
            }
        }
    }
}
