//! prn-rip - raster image processor for CMYK inkjet spool files
//!
//! Loads a PNG, resolves the job against its physical size and runs it
//! through the `cmyk-halftone` pipeline to produce a PRN file.
//! This library exposes modules for integration testing.

pub mod error;
pub mod models;
pub mod services;
