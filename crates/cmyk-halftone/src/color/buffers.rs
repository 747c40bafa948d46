//! Intermediate buffers passed between stages.

use super::ColorError;

/// A CIE L*a*b* color.
///
/// `l` is in `0.0..=100.0`; `a` and `b` are unbounded but typically
/// within `-128.0..=127.0`. The layout matches Little CMS `TYPE_Lab_FLT`
/// so buffers can be handed to the ICC engine without copying.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Lab {
    pub l: f32,
    pub a: f32,
    pub b: f32,
}

impl Lab {
    #[inline]
    pub fn new(l: f32, a: f32, b: f32) -> Self {
        Self { l, a, b }
    }
}

/// Row-major Lab pixels produced by [`RgbToLab`](super::RgbToLab).
#[derive(Debug, Clone, PartialEq)]
pub struct LabBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Lab>,
}

impl LabBuffer {
    pub fn new(width: usize, height: usize, pixels: Vec<Lab>) -> Result<Self, ColorError> {
        let expected = width * height;
        if pixels.len() != expected {
            return Err(ColorError::LengthMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
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
    pub fn pixels(&self) -> &[Lab] {
        &self.pixels
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

/// Interleaved `C, M, Y, K` bytes, four per pixel, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct CmykBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl CmykBuffer {
    /// Bytes per pixel.
    pub const CHANNELS: usize = 4;

    /// Wrap raw CMYK bytes.
    ///
    /// Fails when `data.len()` is not `width * height * 4`.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, ColorError> {
        let expected = width * height * Self::CHANNELS;
        if data.len() != expected {
            return Err(ColorError::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a buffer from `[C, M, Y, K]` pixels.
    pub fn from_pixels(
        width: usize,
        height: usize,
        pixels: &[[u8; 4]],
    ) -> Result<Self, ColorError> {
        Self::new(width, height, pixels.iter().flatten().copied().collect())
    }

    /// A buffer filled with one color.
    pub fn filled(width: usize, height: usize, cmyk: [u8; 4]) -> Self {
        Self {
            width,
            height,
            data: cmyk.repeat(width * height),
        }
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
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer, returning the raw bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Number of pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len() / Self::CHANNELS
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The `[C, M, Y, K]` value at `(x, y)`, or `None` out of bounds.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * Self::CHANNELS;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }
}
