//! Per-job selection between ICC-managed and closed-form conversion.

use std::path::Path;

use lcms2::ColorSpaceSignature;
use rayon::prelude::*;

use super::buffers::{CmykBuffer, LabBuffer};
use super::icc::{self, IccLabToCmyk, IccRgbToLab};
use super::{closed_form, ColorError, Raster};

/// RGB to Lab conversion strategy.
#[derive(Debug)]
pub enum RgbToLab {
    /// Little CMS transform from the job's RGB profile.
    IccManaged(IccRgbToLab),
    /// sRGB/D65 formulas.
    ClosedForm,
}

impl RgbToLab {
    /// Pick the strategy for a profile path.
    ///
    /// An empty path, or a profile that cannot be opened as RGB, selects
    /// [`RgbToLab::ClosedForm`]. A usable profile whose transform cannot
    /// be built is an error.
    pub fn select(profile_path: impl AsRef<Path>) -> Result<Self, ColorError> {
        let path = profile_path.as_ref();
        if path.as_os_str().is_empty() {
            return Ok(Self::ClosedForm);
        }
        match icc::load_profile(path, ColorSpaceSignature::RgbData) {
            Some(profile) => {
                tracing::debug!(path = %path.display(), "using ICC RGB profile");
                Ok(Self::IccManaged(IccRgbToLab::new(&profile)?))
            }
            None => Ok(Self::ClosedForm),
        }
    }

    pub fn is_icc_managed(&self) -> bool {
        matches!(self, Self::IccManaged(_))
    }

    pub fn convert(&self, raster: &Raster) -> Result<LabBuffer, ColorError> {
        if raster.is_empty() {
            return Err(ColorError::EmptyInput);
        }
        let pixels = match self {
            Self::IccManaged(transform) => transform.convert(raster.pixels()),
            Self::ClosedForm => raster
                .pixels()
                .par_iter()
                .map(|&rgb| closed_form::rgb_to_lab(rgb))
                .collect(),
        };
        LabBuffer::new(raster.width(), raster.height(), pixels)
    }
}

/// Lab to CMYK conversion strategy.
#[derive(Debug)]
pub enum LabToCmyk {
    /// Little CMS transform to the job's CMYK profile.
    IccManaged(IccLabToCmyk),
    /// Inverse sRGB plus max-channel black generation.
    ClosedForm,
}

impl LabToCmyk {
    /// Pick the strategy for a profile path. Same rules as [`RgbToLab::select`].
    pub fn select(profile_path: impl AsRef<Path>) -> Result<Self, ColorError> {
        let path = profile_path.as_ref();
        if path.as_os_str().is_empty() {
            return Ok(Self::ClosedForm);
        }
        match icc::load_profile(path, ColorSpaceSignature::CmykData) {
            Some(profile) => {
                tracing::debug!(path = %path.display(), "using ICC CMYK profile");
                Ok(Self::IccManaged(IccLabToCmyk::new(&profile)?))
            }
            None => Ok(Self::ClosedForm),
        }
    }

    pub fn is_icc_managed(&self) -> bool {
        matches!(self, Self::IccManaged(_))
    }

    pub fn convert(&self, lab: &LabBuffer) -> Result<CmykBuffer, ColorError> {
        if lab.is_empty() {
            return Err(ColorError::EmptyInput);
        }
        let data = match self {
            Self::IccManaged(transform) => transform.convert(lab.pixels()),
            Self::ClosedForm => lab
                .pixels()
                .par_iter()
                .flat_map_iter(|&p| closed_form::lab_to_cmyk(p))
                .collect(),
        };
        CmykBuffer::new(lab.width(), lab.height(), data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Lab;

    #[test]
    fn test_empty_path_selects_closed_form() {
        assert!(!RgbToLab::select("").unwrap().is_icc_managed());
        assert!(!LabToCmyk::select("").unwrap().is_icc_managed());
    }

    #[test]
    fn test_unreadable_profile_selects_closed_form() {
        let strategy = RgbToLab::select("/nonexistent/profile.icc").unwrap();
        assert!(matches!(strategy, RgbToLab::ClosedForm));
    }

    #[test]
    fn test_empty_raster_is_rejected() {
        let raster = Raster::from_pixels(0, 0, 72.0, 72.0, Vec::new()).unwrap();
        assert_eq!(
            RgbToLab::ClosedForm.convert(&raster),
            Err(ColorError::EmptyInput)
        );
        let lab = LabBuffer::new(0, 0, Vec::new()).unwrap();
        assert_eq!(LabToCmyk::ClosedForm.convert(&lab), Err(ColorError::EmptyInput));
    }

    #[test]
    fn test_closed_form_preserves_order_and_shape() {
        let raster = Raster::from_pixels(
            3,
            1,
            300.0,
            300.0,
            vec![[255, 255, 255], [0, 0, 0], [255, 0, 0]],
        )
        .unwrap();
        let lab = RgbToLab::ClosedForm.convert(&raster).unwrap();
        assert_eq!((lab.width(), lab.height(), lab.len()), (3, 1, 3));

        let cmyk = LabToCmyk::ClosedForm.convert(&lab).unwrap();
        assert_eq!(cmyk.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(cmyk.pixel(1, 0), Some([0, 0, 0, 255]));
        let red = cmyk.pixel(2, 0).unwrap();
        assert!(red[0] < 10 && red[1] > 240 && red[2] > 240 && red[3] < 10, "{red:?}");
    }

    #[test]
    fn test_out_of_gamut_lab_does_not_panic() {
        let lab = LabBuffer::new(2, 1, vec![Lab::new(150.0, 300.0, -300.0), Lab::new(-5.0, 0.0, 0.0)])
            .unwrap();
        let cmyk = LabToCmyk::ClosedForm.convert(&lab).unwrap();
        assert_eq!(cmyk.len(), 2);
    }
}
