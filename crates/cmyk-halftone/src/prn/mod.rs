//! PRN spool file encoding and decoding.
//!
//! A PRN file is a [`PrnHeader`] followed by `height` rows. Each row holds
//! the four channel blocks of the packed plane reordered to `K, C, M, Y`,
//! each block zero-padded to a multiple of 4 bytes.

mod header;
mod reader;
mod writer;

pub use header::PrnHeader;
pub use reader::PrnFile;
pub use writer::{encode, padding, write_prn_file, write_to, PrnSummary};

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrnError {
    #[error("failed to create {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{field} value {value} does not fit the header")]
    FieldOverflow { field: &'static str, value: usize },

    #[error("not a PRN file: signature {0:#06x}")]
    BadSignature(i32),

    #[error("PRN data truncated: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("unsupported bits-per-pixel code {0}")]
    UnsupportedBitsCode(i32),

    #[error("invalid header field {field}: {value}")]
    InvalidField { field: &'static str, value: i32 },
}
