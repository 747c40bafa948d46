//! Color types and conversion stages
//!
//! This module converts the source raster into device CMYK in two steps,
//! each through a strategy chosen once per job:
//!
//! - [`RgbToLab`]: RGB raster to a [`LabBuffer`]
//! - [`LabToCmyk`]: [`LabBuffer`] to a [`CmykBuffer`]
//!
//! Both strategies have an ICC-managed variant (Little CMS, perceptual
//! intent) and a closed-form variant (sRGB/D65 formulas). An empty profile
//! path or a profile that cannot be opened selects the closed form.
//!
//! # Example
//!
//! ```
//! use cmyk_halftone::{LabToCmyk, Raster, RgbToLab};
//!
//! let raster = Raster::from_rgb(1, 1, 72.0, 72.0, vec![255, 255, 255]).unwrap();
//! let lab = RgbToLab::select("").unwrap().convert(&raster).unwrap();
//! let cmyk = LabToCmyk::select("").unwrap().convert(&lab).unwrap();
//! assert_eq!(cmyk.pixel(0, 0), Some([0, 0, 0, 0]));
//! ```

mod buffers;
pub mod closed_form;
mod icc;
mod raster;
mod strategy;

pub use buffers::{CmykBuffer, Lab, LabBuffer};
pub use raster::Raster;
pub use strategy::{LabToCmyk, RgbToLab};

use thiserror::Error;

/// Errors raised by the color stages.
#[derive(Debug, Error, PartialEq)]
pub enum ColorError {
    #[error("input raster or buffer is empty")]
    EmptyInput,

    #[error("sample count mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("failed to create Lab profile: {0}")]
    LabProfile(String),

    #[error("failed to create color transform: {0}")]
    Transform(String),
}
