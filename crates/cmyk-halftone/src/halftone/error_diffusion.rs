//! Error diffusion halftoning.
//!
//! Pixels are visited strictly left to right, top to bottom, every row in
//! the same direction. Each pixel's decision depends on error pushed by
//! pixels before it, so a channel cannot be split across workers. The
//! four channels are independent and run in parallel, each writing into
//! its own lane of the packed plane.

use rayon::prelude::*;

use super::kernel::Kernel;
use super::packing::{pack_index, PackedPlane};
use super::{Channel, HalftoneError, QuantizationLevel};
use crate::color::CmykBuffer;

/// Sliding window of error rows.
///
/// Only the rows the kernel can reach are kept: `rows[0]` is the row being
/// processed, `rows[1]` the next one, and so on.
#[derive(Debug)]
pub(crate) struct ErrorBuffer {
    rows: Vec<Vec<f32>>,
    width: usize,
}

impl ErrorBuffer {
    pub(crate) fn new(width: usize, row_depth: usize) -> Self {
        Self {
            rows: (0..row_depth).map(|_| vec![0.0; width]).collect(),
            width,
        }
    }

    #[inline]
    pub(crate) fn get_accumulated(&self, x: usize) -> f32 {
        self.rows[0][x]
    }

    /// Add error to a pixel `row_offset` rows below the current one.
    ///
    /// Out-of-bounds targets are dropped.
    #[inline]
    pub(crate) fn add_error(&mut self, x: isize, row_offset: usize, error: f32) {
        if x < 0 {
            return;
        }
        let x = x as usize;
        if x < self.width && row_offset < self.rows.len() {
            self.rows[row_offset][x] += error;
        }
    }

    pub(crate) fn advance_row(&mut self) {
        self.rows.rotate_left(1);
        if let Some(last) = self.rows.last_mut() {
            last.fill(0.0);
        }
    }
}

pub(crate) fn dither(
    buffer: &CmykBuffer,
    level: QuantizationLevel,
    kernel: &Kernel,
) -> Result<PackedPlane, HalftoneError> {
    let width = buffer.width();
    let height = buffer.height();
    let mut plane = PackedPlane::new(width, height, level)?;
    let source = buffer.data();

    plane
        .channel_lanes_mut()
        .into_par_iter()
        .enumerate()
        .for_each(|(channel, mut lane)| {
            diffuse_channel(source, width, channel, &mut lane, level, kernel);
        });

    Ok(plane)
}

/// Run the recurrence over one channel.
///
/// `lane` holds that channel's block of every row, top to bottom.
fn diffuse_channel(
    source: &[u8],
    width: usize,
    channel: usize,
    lane: &mut [&mut [u8]],
    level: QuantizationLevel,
    kernel: &Kernel,
) {
    let mut errors = ErrorBuffer::new(width, kernel.max_dy + 1);
    let divisor = kernel.divisor as f32;

    for (y, block) in lane.iter_mut().enumerate() {
        let row_start = y * width;
        for x in 0..width {
            let sample = source[(row_start + x) * Channel::COUNT + channel] as f32;
            let old = sample + errors.get_accumulated(x);
            let (tone, index) = level.quantize(old);
            let error = old - tone;

            for &(dx, dy, weight) in kernel.entries {
                errors.add_error(
                    x as isize + dx as isize,
                    dy as usize,
                    error * weight as f32 / divisor,
                );
            }
            pack_index(block, x, index, level);
        }
        errors.advance_row();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::halftone::{Channel, FLOYD_STEINBERG};

    fn gray(width: usize, height: usize, value: u8) -> CmykBuffer {
        CmykBuffer::filled(width, height, [value; 4])
    }

    fn ones(plane: &PackedPlane, channel: Channel) -> usize {
        (0..plane.height())
            .flat_map(|y| (0..plane.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| plane.get(x, y, channel) == Some(1))
            .count()
    }

    #[test]
    fn test_error_buffer_rolls_rows() {
        let mut buf = ErrorBuffer::new(3, 2);
        buf.add_error(1, 1, 2.5);
        buf.add_error(-1, 0, 9.0);
        buf.add_error(3, 0, 9.0);
        assert_eq!(buf.get_accumulated(1), 0.0);
        buf.advance_row();
        assert_eq!(buf.get_accumulated(1), 2.5);
        buf.advance_row();
        assert_eq!(buf.get_accumulated(1), 0.0);
    }

    #[test]
    fn test_interior_error_is_fully_distributed() {
        let mut buf = ErrorBuffer::new(5, FLOYD_STEINBERG.max_dy + 1);
        let error = 48.0;
        for &(dx, dy, w) in FLOYD_STEINBERG.entries {
            buf.add_error(2 + dx as isize, dy as usize, error * w as f32 / 16.0);
        }
        let current: f32 = (0..5).map(|x| buf.get_accumulated(x)).sum();
        buf.advance_row();
        let next: f32 = (0..5).map(|x| buf.get_accumulated(x)).sum();
        assert_eq!(current + next, error);
    }

    #[test]
    fn test_solid_tones_need_no_diffusion() {
        let plane = dither(&gray(9, 4, 0), QuantizationLevel::Two, &FLOYD_STEINBERG).unwrap();
        assert!(plane.data().iter().all(|&b| b == 0));

        let plane = dither(&gray(9, 4, 255), QuantizationLevel::Four, &FLOYD_STEINBERG).unwrap();
        for channel in Channel::ALL {
            for y in 0..4 {
                for x in 0..9 {
                    assert_eq!(plane.get(x, y, channel), Some(3));
                }
            }
        }
    }

    #[test]
    fn test_mid_gray_gives_half_coverage() {
        let size = 32;
        let plane = dither(&gray(size, size, 128), QuantizationLevel::Two, &FLOYD_STEINBERG)
            .unwrap();
        let ratio = ones(&plane, Channel::Cyan) as f64 / (size * size) as f64;
        assert!((ratio - 0.5).abs() < 0.05, "coverage {ratio}");
    }

    #[test]
    fn test_first_row_matches_hand_computation() {
        // 100 -> 0 (err 100), 143.75 -> 255 (err -111.25), 51.33 -> 0,
        // 122.46 -> 0, 153.57 -> 255
        let buffer = CmykBuffer::filled(5, 1, [100, 0, 0, 0]);
        let plane = dither(&buffer, QuantizationLevel::Two, &FLOYD_STEINBERG).unwrap();
        let row: Vec<u8> = (0..5)
            .map(|x| plane.get(x, 0, Channel::Cyan).unwrap())
            .collect();
        assert_eq!(row, vec![0, 1, 0, 0, 1]);
    }

    #[test]
    fn test_channels_do_not_leak_into_each_other() {
        let buffer = CmykBuffer::filled(16, 8, [255, 0, 128, 0]);
        let plane = dither(&buffer, QuantizationLevel::Two, &FLOYD_STEINBERG).unwrap();
        assert_eq!(ones(&plane, Channel::Cyan), 16 * 8);
        assert_eq!(ones(&plane, Channel::Magenta), 0);
        assert_eq!(ones(&plane, Channel::Black), 0);
        let yellow = ones(&plane, Channel::Yellow);
        assert!(yellow > 0 && yellow < 16 * 8);
    }

    #[test]
    fn test_output_is_deterministic() {
        let pixels: Vec<[u8; 4]> = (0..20 * 10)
            .map(|i| [(i * 7 % 256) as u8, (i * 13 % 256) as u8, (i % 256) as u8, 90])
            .collect();
        let buffer = CmykBuffer::from_pixels(20, 10, &pixels).unwrap();
        let a = dither(&buffer, QuantizationLevel::Four, &FLOYD_STEINBERG).unwrap();
        let b = dither(&buffer, QuantizationLevel::Four, &FLOYD_STEINBERG).unwrap();
        assert_eq!(a, b);
    }
}
