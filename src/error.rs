use std::path::PathBuf;

use cmyk_halftone::{ColorError, CoreError, HalftoneError, PrnError, ResampleError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Raster error: {0}")]
    Raster(#[from] RasterError),

    #[error("Invalid job parameters: {0}")]
    InvalidParameters(String),

    #[error("Pipeline stage failed: {0}")]
    Stage(#[from] CoreError),
}

macro_rules! stage_error_into_job_error {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for JobError {
                fn from(e: $ty) -> Self {
                    JobError::Stage(CoreError::from(e))
                }
            }
        )*
    };
}

stage_error_into_job_error!(ColorError, ResampleError, HalftoneError, PrnError);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("PNG decode error: {0}")]
    Decode(#[from] png::DecodingError),

    #[error("Unsupported PNG layout: {0}")]
    Unsupported(String),

    #[error("Invalid raster: {0}")]
    Invalid(#[from] ColorError),
}
