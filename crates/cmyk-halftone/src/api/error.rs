//! Unified error type for the cmyk-halftone public API.
//!
//! [`CoreError`] wraps the per-stage errors into a single enum for
//! convenient `?` propagation in application code.

use thiserror::Error;

use crate::color::ColorError;
use crate::halftone::HalftoneError;
use crate::prn::PrnError;
use crate::resample::ResampleError;

/// Unified error type for the cmyk-halftone public API.
///
/// # Example
///
/// ```
/// use cmyk_halftone::{CoreError, LabToCmyk, LabBuffer};
///
/// fn separate(lab: &LabBuffer) -> Result<usize, CoreError> {
///     let cmyk = LabToCmyk::select("")?.convert(lab)?;
///     Ok(cmyk.len())
/// }
/// ```
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("color transform failed: {0}")]
    Color(#[from] ColorError),

    #[error("resampling failed: {0}")]
    Resample(#[from] ResampleError),

    #[error("halftoning failed: {0}")]
    Halftone(#[from] HalftoneError),

    #[error("PRN output failed: {0}")]
    Prn(#[from] PrnError),
}
