//! Halftoning and bit-packing.
//!
//! Two interchangeable strategies quantize a [`CmykBuffer`] to a few tones
//! per channel and pack the result into a [`PackedPlane`]:
//!
//! - **Error diffusion** (Floyd-Steinberg): raster-order recurrence, one
//!   worker per channel.
//! - **Ordered** (8x8 Bayer): each pixel on its own, one worker per row.
//!
//! # Level selection
//!
//! Jobs carry a numeric dithering selector. The selector picks both the
//! method (`0..=2` error diffusion, anything above ordered) and the tone
//! count through a fixed table keyed on `selector % 3`:
//!
//! | `selector % 3` | level |
//! |----------------|-------|
//! | 0              | 2     |
//! | 1              | 4     |
//! | 2              | 4     |
//!
//! Three-tone output is only reachable by constructing
//! [`QuantizationLevel::Three`] directly.

mod error_diffusion;
mod kernel;
mod ordered;
mod packing;

pub use kernel::{Kernel, FLOYD_STEINBERG};
pub use ordered::BAYER_8X8;
pub use packing::{pack_index, unpack_index, PackedPlane};

use std::fmt;

use thiserror::Error;

use crate::color::CmykBuffer;

/// Errors raised by the halftoning stage.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HalftoneError {
    #[error("input buffer is empty")]
    EmptyInput,

    #[error("invalid plane dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("quantization level {0} is outside 2..=4")]
    InvalidLevel(u32),

    #[error("packed buffer length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Number of distinct tones per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuantizationLevel {
    Two,
    Three,
    Four,
}

impl QuantizationLevel {
    /// Level for a job's dithering selector.
    pub fn from_selector(selector: u32) -> Self {
        match selector % 3 {
            0 => Self::Two,
            _ => Self::Four,
        }
    }

    /// Number of tones: 2, 3 or 4.
    #[inline]
    pub fn count(self) -> u32 {
        match self {
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
        }
    }

    #[inline]
    pub fn bits_per_pixel(self) -> usize {
        match self {
            Self::Two => 1,
            Self::Three | Self::Four => 2,
        }
    }

    #[inline]
    pub fn pixels_per_byte(self) -> usize {
        8 / self.bits_per_pixel()
    }

    /// `ceil(width / pixels_per_byte)`.
    #[inline]
    pub fn bytes_per_line(self, width: usize) -> usize {
        width.div_ceil(self.pixels_per_byte())
    }

    /// Bits-per-pixel code written to the PRN header: `(level + 1) / 2`.
    #[inline]
    pub fn header_code(self) -> u32 {
        (self.count() + 1) / 2
    }

    /// Distance between adjacent output tones on the 0..=255 scale.
    #[inline]
    pub fn step(self) -> f32 {
        255.0 / (self.count() - 1) as f32
    }

    /// Snap `value` to the nearest tone.
    ///
    /// Returns the tone on the 0..=255 scale (clamped) and its index in
    /// `0..count()`.
    #[inline]
    pub fn quantize(self, value: f32) -> (f32, u8) {
        let step = self.step();
        let tone = ((value / step).round() * step).clamp(0.0, 255.0);
        let index = (tone / 255.0 * (self.count() - 1) as f32).round() as u8;
        (tone, index)
    }
}

impl TryFrom<u32> for QuantizationLevel {
    type Error = HalftoneError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            4 => Ok(Self::Four),
            other => Err(HalftoneError::InvalidLevel(other)),
        }
    }
}

impl fmt::Display for QuantizationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.count())
    }
}

/// One ink channel of the packed plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Cyan,
    Magenta,
    Yellow,
    Black,
}

impl Channel {
    pub const COUNT: usize = 4;

    /// Native order of the packed plane and of [`CmykBuffer`] samples.
    pub const ALL: [Channel; 4] = [
        Channel::Cyan,
        Channel::Magenta,
        Channel::Yellow,
        Channel::Black,
    ];

    /// Block order inside a PRN row.
    pub const PRN_ORDER: [Channel; 4] = [
        Channel::Black,
        Channel::Cyan,
        Channel::Magenta,
        Channel::Yellow,
    ];

    /// Position in [`Channel::ALL`].
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Channel::Cyan => 0,
            Channel::Magenta => 1,
            Channel::Yellow => 2,
            Channel::Black => 3,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Channel::Cyan => 'C',
            Channel::Magenta => 'M',
            Channel::Yellow => 'Y',
            Channel::Black => 'K',
        }
    }
}

/// Halftoning strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HalftoneMethod {
    /// Floyd-Steinberg error diffusion.
    #[default]
    ErrorDiffusion,
    /// 8x8 Bayer ordered dither.
    Ordered,
}

impl HalftoneMethod {
    /// Method for a job's dithering selector.
    pub fn from_selector(selector: u32) -> Self {
        if selector <= 2 {
            Self::ErrorDiffusion
        } else {
            Self::Ordered
        }
    }

    /// Quantize and pack `buffer` to `level` tones per channel.
    ///
    /// Blocks until every worker has finished.
    pub fn dither(
        self,
        buffer: &CmykBuffer,
        level: QuantizationLevel,
    ) -> Result<PackedPlane, HalftoneError> {
        if buffer.is_empty() {
            return Err(HalftoneError::EmptyInput);
        }
        let plane = match self {
            Self::ErrorDiffusion => error_diffusion::dither(buffer, level, &FLOYD_STEINBERG)?,
            Self::Ordered => ordered::dither(buffer, level)?,
        };
        tracing::debug!(
            method = %self,
            level = %level,
            width = plane.width(),
            height = plane.height(),
            bytes_per_line = plane.bytes_per_line(),
            "halftoned"
        );
        Ok(plane)
    }
}

impl fmt::Display for HalftoneMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ErrorDiffusion => write!(f, "error-diffusion"),
            Self::Ordered => write!(f, "ordered"),
        }
    }
}
