//! ICC-managed transforms backed by Little CMS.

use std::fmt;
use std::path::Path;

use lcms2::{CIExyY, ColorSpaceSignature, GlobalContext, Intent, PixelFormat, Profile, Transform};

use super::buffers::Lab;
use super::ColorError;

/// D50, the PCS white of the built-in Lab profile.
const D50_XYY: CIExyY = CIExyY {
    x: 0.3457,
    y: 0.3585,
    Y: 1.0,
};

/// Open an ICC profile and check its color space.
///
/// Returns `None` (and logs why) when the file cannot be read, is not a
/// valid profile, or describes a different color space. Callers fall back
/// to the closed-form math in that case.
pub(crate) fn load_profile(path: &Path, expected: ColorSpaceSignature) -> Option<Profile> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot read ICC profile, using closed-form fallback");
            return None;
        }
    };
    let profile = match Profile::new_icc(&bytes) {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "invalid ICC profile, using closed-form fallback");
            return None;
        }
    };
    if profile.color_space() != expected {
        tracing::warn!(
            path = %path.display(),
            found = ?profile.color_space(),
            expected = ?expected,
            "ICC profile has the wrong color space, using closed-form fallback"
        );
        return None;
    }
    Some(profile)
}

fn lab_profile() -> Result<Profile, ColorError> {
    Profile::new_lab4_context(GlobalContext::new(), &D50_XYY)
        .map_err(|e| ColorError::LabProfile(e.to_string()))
}

/// RGB 8-bit to Lab float, perceptual intent.
pub struct IccRgbToLab {
    transform: Transform<[u8; 3], [f32; 3]>,
}

impl IccRgbToLab {
    pub(crate) fn new(rgb_profile: &Profile) -> Result<Self, ColorError> {
        let lab = lab_profile()?;
        let transform = Transform::new(
            rgb_profile,
            PixelFormat::RGB_8,
            &lab,
            PixelFormat::Lab_FLT,
            Intent::Perceptual,
        )
        .map_err(|e| ColorError::Transform(e.to_string()))?;
        Ok(Self { transform })
    }

    pub(crate) fn convert(&self, pixels: &[[u8; 3]]) -> Vec<Lab> {
        let mut out = vec![[0.0f32; 3]; pixels.len()];
        self.transform.transform_pixels(pixels, &mut out);
        out.into_iter()
            .map(|[l, a, b]| Lab::new(l.max(0.0), a, b))
            .collect()
    }
}

impl fmt::Debug for IccRgbToLab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IccRgbToLab").finish_non_exhaustive()
    }
}

/// Lab float to CMYK 8-bit, perceptual intent.
pub struct IccLabToCmyk {
    transform: Transform<[f32; 3], [u8; 4]>,
}

impl IccLabToCmyk {
    pub(crate) fn new(cmyk_profile: &Profile) -> Result<Self, ColorError> {
        let lab = lab_profile()?;
        let transform = Transform::new(
            &lab,
            PixelFormat::Lab_FLT,
            cmyk_profile,
            PixelFormat::CMYK_8,
            Intent::Perceptual,
        )
        .map_err(|e| ColorError::Transform(e.to_string()))?;
        Ok(Self { transform })
    }

    pub(crate) fn convert(&self, pixels: &[Lab]) -> Vec<u8> {
        let input: Vec<[f32; 3]> = pixels.iter().map(|p| [p.l, p.a, p.b]).collect();
        let mut out = vec![[0u8; 4]; input.len()];
        self.transform.transform_pixels(&input, &mut out);
        out.into_iter().flatten().collect()
    }
}

impl fmt::Debug for IccLabToCmyk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IccLabToCmyk").finish_non_exhaustive()
    }
}
