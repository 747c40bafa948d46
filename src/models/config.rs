use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Job settings loaded from a YAML job file
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct JobConfig {
    /// Target horizontal resolution in DPI
    pub x_resolution: f64,

    /// Target vertical resolution in DPI
    pub y_resolution: f64,

    /// Output width as a percentage of the source's physical width
    pub width_percentage: f64,

    /// Output height as a percentage of the source's physical height
    pub height_percentage: f64,

    /// Dithering selector: 0-2 error diffusion, 3+ ordered.
    /// `selector % 3` picks the tone count.
    pub dithering: u32,

    /// RGB ICC profile; empty selects the built-in sRGB math
    pub rgb_profile: PathBuf,

    /// CMYK ICC profile; empty selects the built-in separation
    pub cmyk_profile: PathBuf,

    /// Output channel enable flags (passed through to the job report)
    pub channels: ChannelFlags,

    /// Worker pool size; defaults to the number of CPUs
    pub threads: Option<usize>,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            x_resolution: default_resolution(),
            y_resolution: default_resolution(),
            width_percentage: default_percentage(),
            height_percentage: default_percentage(),
            dithering: 0,
            rgb_profile: PathBuf::new(),
            cmyk_profile: PathBuf::new(),
            channels: ChannelFlags::default(),
            threads: None,
        }
    }
}

fn default_resolution() -> f64 {
    300.0
}

fn default_percentage() -> f64 {
    100.0
}

/// Which printer channels are switched on for a job.
///
/// Only C, M, Y and K are rendered; the light and spot channels are
/// carried along for the downstream driver.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct ChannelFlags {
    pub c: bool,
    pub m: bool,
    pub y: bool,
    pub k: bool,
    pub lc: bool,
    pub lm: bool,
    pub lk: bool,
    pub llk: bool,
    pub s1: bool,
    pub s2: bool,
    pub s3: bool,
    pub s4: bool,
    pub s5: bool,
    pub s6: bool,
}

impl Default for ChannelFlags {
    fn default() -> Self {
        Self {
            c: true,
            m: true,
            y: true,
            k: true,
            lc: false,
            lm: false,
            lk: false,
            llk: false,
            s1: false,
            s2: false,
            s3: false,
            s4: false,
            s5: false,
            s6: false,
        }
    }
}

impl ChannelFlags {
    /// Names of the enabled channels, in printer order
    pub fn enabled(&self) -> Vec<&'static str> {
        [
            ("C", self.c),
            ("M", self.m),
            ("Y", self.y),
            ("K", self.k),
            ("Lc", self.lc),
            ("Lm", self.lm),
            ("Lk", self.lk),
            ("LLk", self.llk),
            ("S1", self.s1),
            ("S2", self.s2),
            ("S3", self.s3),
            ("S4", self.s4),
            ("S5", self.s5),
            ("S6", self.s6),
        ]
        .into_iter()
        .filter_map(|(name, on)| on.then_some(name))
        .collect()
    }
}

impl JobConfig {
    /// Load and validate a job file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::info!(
            path = %path.display(),
            x_resolution = config.x_resolution,
            y_resolution = config.y_resolution,
            dithering = config.dithering,
            "Loaded job configuration"
        );
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("x_resolution", self.x_resolution)?;
        positive("y_resolution", self.y_resolution)?;
        positive("width_percentage", self.width_percentage)?;
        positive("height_percentage", self.height_percentage)?;
        if self.threads == Some(0) {
            return Err(ConfigError::Invalid {
                field: "threads",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be a positive number, got {value}"),
        })
    }
}
