#![allow(clippy::excessive_precision, clippy::needless_range_loop)]

//! cmyk-halftone: CMYK separation and halftoning for PRN spool output
//!
//! This library turns a continuous-tone RGB raster into the bit-packed,
//! row-interleaved CMYK bitstream consumed by the printer driver.
//!
//! # Pipeline Overview
//!
//! ```text
//! RGB raster              (decoded by the caller)
//!     |
//!     v
//! LabBuffer               (ICC transform or closed-form sRGB -> Lab, D65)
//!     |
//!     v
//! CmykBuffer              (ICC transform or max-channel black generation)
//!     |
//!     v
//! CmykBuffer              (bilinear resample to the target resolution)
//!     |
//!     v
//! PackedPlane             (error diffusion or Bayer ordered dither,
//!     |                    1 or 2 bits per pixel, C,M,Y,K blocks per row)
//!     v
//! PRN file                (40-byte header, K,C,M,Y blocks, 4-byte padded)
//! ```
//!
//! # Quick Start
//!
//! ```no_run
//! use cmyk_halftone::{
//!     resample, HalftoneMethod, LabToCmyk, QuantizationLevel, Raster, RgbToLab,
//! };
//!
//! let raster = Raster::from_rgb(2, 2, 300.0, 300.0, vec![128; 12]).unwrap();
//! let lab = RgbToLab::select("").unwrap().convert(&raster).unwrap();
//! let cmyk = LabToCmyk::select("").unwrap().convert(&lab).unwrap();
//! let scaled = resample::resize(&cmyk, 2.0, 2.0).unwrap();
//! let plane = HalftoneMethod::ErrorDiffusion
//!     .dither(&scaled, QuantizationLevel::Two)
//!     .unwrap();
//! cmyk_halftone::prn::write_prn_file("out.prn", &plane, 600.0, 600.0).unwrap();
//! ```
//!
//! # Concurrency
//!
//! Stages run on the rayon pool and return only when every task has
//! finished. Error diffusion is sequential inside a channel, so it fans
//! out over the four channels only; resampling and ordered dithering fan
//! out over rows. Every task writes to a disjoint slice of a buffer that
//! is allocated before the fan-out.

pub mod api;
pub mod color;
pub mod halftone;
pub mod prn;
pub mod resample;


pub use api::CoreError;
pub use color::{CmykBuffer, ColorError, Lab, LabBuffer, LabToCmyk, Raster, RgbToLab};
pub use halftone::{Channel, HalftoneError, HalftoneMethod, PackedPlane, QuantizationLevel};
pub use prn::{PrnError, PrnFile, PrnHeader};
pub use resample::ResampleError;
