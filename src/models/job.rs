use std::path::PathBuf;

use cmyk_halftone::{HalftoneMethod, QuantizationLevel, Raster};

use super::config::{ChannelFlags, JobConfig};
use crate::error::JobError;

/// Density assumed for rasters that carry none.
pub const FALLBACK_DPI: f64 = 72.0;

/// Fully resolved parameters for one job.
///
/// Derived once from a [`JobConfig`] and the source raster, before any
/// pipeline stage runs.
#[derive(Debug, Clone, PartialEq)]
pub struct JobParameters {
    pub source_width: usize,
    pub source_height: usize,
    pub source_x_dpi: f64,
    pub source_y_dpi: f64,

    /// Target resolution in DPI, also written to the PRN header
    pub x_resolution: f64,
    pub y_resolution: f64,

    pub output_width: usize,
    pub output_height: usize,

    /// Horizontal scale factor, `output_width / source_width`
    pub x_times: f64,
    /// Vertical scale factor, `output_height / source_height`
    pub y_times: f64,

    pub dithering: u32,
    pub method: HalftoneMethod,
    pub level: QuantizationLevel,

    pub rgb_profile: PathBuf,
    pub cmyk_profile: PathBuf,
    pub channels: ChannelFlags,
}

impl JobParameters {
    /// Derive the job record for `raster`.
    ///
    /// The output size keeps the physical size of the source (scaled by the
    /// percentages) at the target resolution:
    /// `round(width * pct / 100 / source_dpi * target_dpi)`.
    pub fn resolve(config: &JobConfig, raster: &Raster) -> Result<Self, JobError> {
        config.validate()?;

        let source_width = raster.width();
        let source_height = raster.height();
        if source_width == 0 || source_height == 0 {
            return Err(JobError::InvalidParameters(format!(
                "source raster is {source_width}x{source_height}"
            )));
        }

        let source_x_dpi = density_or_fallback(raster.x_dpi());
        let source_y_dpi = density_or_fallback(raster.y_dpi());

        let output_width = scaled_dimension(
            source_width,
            config.width_percentage,
            source_x_dpi,
            config.x_resolution,
        );
        let output_height = scaled_dimension(
            source_height,
            config.height_percentage,
            source_y_dpi,
            config.y_resolution,
        );
        if output_width == 0 || output_height == 0 {
            return Err(JobError::InvalidParameters(format!(
                "output size {output_width}x{output_height} is empty"
            )));
        }

        let params = Self {
            source_width,
            source_height,
            source_x_dpi,
            source_y_dpi,
            x_resolution: config.x_resolution,
            y_resolution: config.y_resolution,
            output_width,
            output_height,
            x_times: output_width as f64 / source_width as f64,
            y_times: output_height as f64 / source_height as f64,
            dithering: config.dithering,
            method: HalftoneMethod::from_selector(config.dithering),
            level: QuantizationLevel::from_selector(config.dithering),
            rgb_profile: config.rgb_profile.clone(),
            cmyk_profile: config.cmyk_profile.clone(),
            channels: config.channels,
        };

        tracing::debug!(
            source = %format!("{source_width}x{source_height}"),
            output = %format!("{output_width}x{output_height}"),
            x_times = params.x_times,
            y_times = params.y_times,
            method = %params.method,
            level = %params.level,
            "Resolved job parameters"
        );
        Ok(params)
    }

    /// Unpadded bytes per channel block of one output row
    pub fn bytes_per_line(&self) -> usize {
        self.level.bytes_per_line(self.output_width)
    }
}

fn density_or_fallback(dpi: f32) -> f64 {
    if dpi.is_finite() && dpi > 0.0 {
        dpi as f64
    } else {
        FALLBACK_DPI
    }
}

fn scaled_dimension(pixels: usize, percentage: f64, source_dpi: f64, target_dpi: f64) -> usize {
    (pixels as f64 * percentage / 100.0 / source_dpi * target_dpi).round() as usize
}
