//! Job runner for integration tests.

use std::path::{Path, PathBuf};

use cmyk_halftone::Raster;
use prn_rip::error::JobError;
use prn_rip::models::{JobConfig, JobParameters};
use prn_rip::services::{load_png, JobReport, PrintPipeline, RenderedJob};
use tempfile::TempDir;

/// A scratch directory plus a job configuration
pub struct TestJob {
    dir: TempDir,
    pub config: JobConfig,
}

impl TestJob {
    pub fn new() -> Self {
        Self::with_config(JobConfig::default())
    }

    pub fn with_config(config: JobConfig) -> Self {
        Self {
            dir: tempfile::tempdir().expect("temp dir"),
            config,
        }
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Resolve and render `raster` in memory
    pub fn render(&self, raster: &Raster) -> Result<RenderedJob, JobError> {
        let params = JobParameters::resolve(&self.config, raster)?;
        PrintPipeline::new(&params)?.render(raster, &params)
    }

    /// Load a PNG from the scratch directory and write `output`
    pub fn convert(&self, input: &str, output: &str) -> Result<JobReport, JobError> {
        let raster = load_png(&self.path(input))?;
        let params = JobParameters::resolve(&self.config, &raster)?;
        PrintPipeline::new(&params)?.run(&raster, &params, &self.path(output))
    }
}
