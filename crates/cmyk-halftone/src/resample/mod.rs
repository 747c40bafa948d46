//! Bilinear resampling of 4-channel buffers.
//!
//! Destination pixel `(x, y)` maps back to source coordinates
//! `(x / x_times, y / y_times)`. The four surrounding source pixels are
//! blended per channel; neighbors past the last column or row are clamped
//! to it. Rows are filled in parallel.

use rayon::prelude::*;
use thiserror::Error;

use crate::color::CmykBuffer;

const CHANNELS: usize = CmykBuffer::CHANNELS;

/// Errors raised by the resampling stage.
#[derive(Debug, Error, PartialEq)]
pub enum ResampleError {
    #[error("input buffer is empty")]
    EmptyInput,

    #[error("invalid source dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("scale factors must be positive and finite, got {x}x{y}")]
    InvalidScale { x: f64, y: f64 },

    #[error("scaled dimensions {width}x{height} are empty")]
    InvalidOutputDimensions { width: usize, height: usize },
}

/// Destination size for a source of `width x height` scaled by the factors.
pub fn target_dimensions(
    width: usize,
    height: usize,
    x_times: f64,
    y_times: f64,
) -> Result<(usize, usize), ResampleError> {
    if !(x_times.is_finite() && y_times.is_finite()) || x_times <= 0.0 || y_times <= 0.0 {
        return Err(ResampleError::InvalidScale {
            x: x_times,
            y: y_times,
        });
    }
    let new_width = (width as f64 * x_times).round() as usize;
    let new_height = (height as f64 * y_times).round() as usize;
    if new_width == 0 || new_height == 0 {
        return Err(ResampleError::InvalidOutputDimensions {
            width: new_width,
            height: new_height,
        });
    }
    Ok((new_width, new_height))
}

/// Resize a CMYK buffer by independent horizontal and vertical factors.
pub fn resize(
    buffer: &CmykBuffer,
    x_times: f64,
    y_times: f64,
) -> Result<CmykBuffer, ResampleError> {
    let (data, width, height) = resize_raw(
        buffer.data(),
        buffer.width(),
        buffer.height(),
        x_times,
        y_times,
    )?;
    CmykBuffer::new(width, height, data).map_err(|_| ResampleError::InvalidOutputDimensions {
        width,
        height,
    })
}

/// Resize raw interleaved 4-channel bytes.
///
/// `data` may be shorter than `width * height * 4`. Channels whose
/// neighbors fall outside it are left at zero instead of being read.
///
/// Returns the new bytes and their width and height.
pub fn resize_raw(
    data: &[u8],
    width: usize,
    height: usize,
    x_times: f64,
    y_times: f64,
) -> Result<(Vec<u8>, usize, usize), ResampleError> {
    if data.is_empty() {
        return Err(ResampleError::EmptyInput);
    }
    if width == 0 || height == 0 {
        return Err(ResampleError::InvalidDimensions { width, height });
    }
    let (new_width, new_height) = target_dimensions(width, height, x_times, y_times)?;

    let mut output = vec![0u8; new_width * new_height * CHANNELS];
    let skipped: usize = output
        .par_chunks_mut(new_width * CHANNELS)
        .enumerate()
        .map(|(y, row)| {
            let src_y = y as f64 / y_times;
            fill_row(data, width, height, src_y, x_times, row)
        })
        .sum();

    if skipped > 0 {
        tracing::warn!(
            skipped,
            expected = width * height * CHANNELS,
            actual = data.len(),
            "source buffer shorter than its dimensions, left samples blank"
        );
    }
    tracing::debug!(width, height, new_width, new_height, "resampled");

    Ok((output, new_width, new_height))
}

/// Fill one destination row. Returns how many samples were skipped.
fn fill_row(
    data: &[u8],
    width: usize,
    height: usize,
    src_y: f64,
    x_times: f64,
    row: &mut [u8],
) -> usize {
    let y1 = (src_y.floor() as usize).min(height - 1);
    let y2 = (y1 + 1).min(height - 1);
    let dy = (src_y - y1 as f64) as f32;

    let mut skipped = 0;
    for (x, out) in row.chunks_exact_mut(CHANNELS).enumerate() {
        let src_x = x as f64 / x_times;
        let x1 = (src_x.floor() as usize).min(width - 1);
        let x2 = (x1 + 1).min(width - 1);
        let dx = (src_x - x1 as f64) as f32;

        let p11 = (y1 * width + x1) * CHANNELS;
        let p21 = (y1 * width + x2) * CHANNELS;
        let p12 = (y2 * width + x1) * CHANNELS;
        let p22 = (y2 * width + x2) * CHANNELS;

        for (c, sample) in out.iter_mut().enumerate() {
            let (Some(&a), Some(&b), Some(&d), Some(&e)) = (
                data.get(p11 + c),
                data.get(p21 + c),
                data.get(p12 + c),
                data.get(p22 + c),
            ) else {
                skipped += 1;
                continue;
            };
            let top = a as f32 * (1.0 - dx) + b as f32 * dx;
            let bottom = d as f32 * (1.0 - dx) + e as f32 * dx;
            let value = top * (1.0 - dy) + bottom * dy;
            *sample = value.clamp(0.0, 255.0) as u8;
        }
    }
    skipped
}
