use std::path::Path;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use cmyk_halftone::{
    prn, resample, HalftoneMethod, LabToCmyk, PackedPlane, QuantizationLevel, Raster, RgbToLab,
};

use crate::error::JobError;
use crate::models::JobParameters;

/// Wall-clock record for one pipeline stage
#[derive(Debug, Clone)]
pub struct StageTiming {
    pub stage: &'static str,
    pub started: DateTime<Local>,
    pub duration: Duration,
}

/// Summary of a finished job
#[derive(Debug, Clone)]
pub struct JobReport {
    pub output_width: usize,
    pub output_height: usize,
    /// Unpadded bytes per channel block
    pub bytes_per_line: usize,
    /// Size of the packed plane before padding and reordering
    pub buffer_size: usize,
    /// Size of the PRN image including the header
    pub file_size: usize,
    pub level: QuantizationLevel,
    pub method: HalftoneMethod,
    pub channels: Vec<&'static str>,
    pub rgb_icc: bool,
    pub cmyk_icc: bool,
    pub timings: Vec<StageTiming>,
}

impl JobReport {
    pub fn total_duration(&self) -> Duration {
        self.timings.iter().map(|t| t.duration).sum()
    }
}

/// A job rendered in memory
pub struct RenderedJob {
    /// Complete PRN image
    pub bytes: Vec<u8>,
    pub report: JobReport,
}

/// Runs color conversion, resampling, halftoning and PRN encoding for a job.
///
/// Color strategies are chosen once when the pipeline is built, so a
/// pipeline can be reused for several rasters with the same profiles.
pub struct PrintPipeline {
    rgb_to_lab: RgbToLab,
    lab_to_cmyk: LabToCmyk,
}

impl PrintPipeline {
    pub fn new(params: &JobParameters) -> Result<Self, JobError> {
        let rgb_to_lab = RgbToLab::select(&params.rgb_profile)?;
        let lab_to_cmyk = LabToCmyk::select(&params.cmyk_profile)?;
        tracing::debug!(
            rgb_icc = rgb_to_lab.is_icc_managed(),
            cmyk_icc = lab_to_cmyk.is_icc_managed(),
            "Color strategies selected"
        );
        Ok(Self {
            rgb_to_lab,
            lab_to_cmyk,
        })
    }

    /// Render `raster` and write the PRN file to `output`.
    ///
    /// A failed write leaves no file behind.
    pub fn run(
        &self,
        raster: &Raster,
        params: &JobParameters,
        output: &Path,
    ) -> Result<JobReport, JobError> {
        let mut timings = Vec::new();
        let plane = self.halftone(raster, params, &mut timings)?;

        let summary = timed(&mut timings, "write", || {
            prn::write_prn_file(output, &plane, params.x_resolution, params.y_resolution)
        })?;

        let report = self.report(&plane, params, summary.file_size, timings);
        log_report(&report);
        Ok(report)
    }

    /// Render `raster` to an in-memory PRN image.
    pub fn render(&self, raster: &Raster, params: &JobParameters) -> Result<RenderedJob, JobError> {
        let mut timings = Vec::new();
        let plane = self.halftone(raster, params, &mut timings)?;

        let bytes = timed(&mut timings, "encode", || {
            prn::encode(&plane, params.x_resolution, params.y_resolution)
        })?;

        let report = self.report(&plane, params, bytes.len(), timings);
        log_report(&report);
        Ok(RenderedJob { bytes, report })
    }

    fn halftone(
        &self,
        raster: &Raster,
        params: &JobParameters,
        timings: &mut Vec<StageTiming>,
    ) -> Result<PackedPlane, JobError> {
        if raster.width() != params.source_width || raster.height() != params.source_height {
            return Err(JobError::InvalidParameters(format!(
                "raster is {}x{} but the job was resolved for {}x{}",
                raster.width(),
                raster.height(),
                params.source_width,
                params.source_height
            )));
        }

        let lab = timed(timings, "rgb_to_lab", || self.rgb_to_lab.convert(raster))?;
        let cmyk = timed(timings, "lab_to_cmyk", || self.lab_to_cmyk.convert(&lab))?;
        drop(lab);

        let scaled = timed(timings, "resample", || {
            resample::resize(&cmyk, params.x_times, params.y_times)
        })?;
        drop(cmyk);
        if scaled.width() != params.output_width || scaled.height() != params.output_height {
            tracing::warn!(
                expected = %format!("{}x{}", params.output_width, params.output_height),
                actual = %format!("{}x{}", scaled.width(), scaled.height()),
                "Resampled size differs from resolved output size"
            );
        }

        let plane = timed(timings, "halftone", || {
            params.method.dither(&scaled, params.level)
        })?;
        Ok(plane)
    }

    fn report(
        &self,
        plane: &PackedPlane,
        params: &JobParameters,
        file_size: usize,
        timings: Vec<StageTiming>,
    ) -> JobReport {
        JobReport {
            output_width: plane.width(),
            output_height: plane.height(),
            bytes_per_line: plane.bytes_per_line(),
            buffer_size: plane.buffer_size(),
            file_size,
            level: plane.level(),
            method: params.method,
            channels: params.channels.enabled(),
            rgb_icc: self.rgb_to_lab.is_icc_managed(),
            cmyk_icc: self.lab_to_cmyk.is_icc_managed(),
            timings,
        }
    }
}

fn timed<T, E>(
    timings: &mut Vec<StageTiming>,
    stage: &'static str,
    f: impl FnOnce() -> Result<T, E>,
) -> Result<T, JobError>
where
    JobError: From<E>,
{
    let started = Local::now();
    let clock = Instant::now();
    let result = f();
    let duration = clock.elapsed();
    tracing::debug!(
        stage,
        started = %started.format("%H:%M:%S%.3f"),
        elapsed_ms = duration.as_secs_f64() * 1000.0,
        ok = result.is_ok(),
        "Stage finished"
    );
    timings.push(StageTiming {
        stage,
        started,
        duration,
    });
    Ok(result?)
}

fn log_report(report: &JobReport) {
    tracing::info!(
        width = report.output_width,
        height = report.output_height,
        bytes_per_line = report.bytes_per_line,
        file_size = report.file_size,
        method = %report.method,
        level = %report.level,
        channels = %report.channels.join(","),
        elapsed_ms = report.total_duration().as_secs_f64() * 1000.0,
        "Job finished"
    );
}
