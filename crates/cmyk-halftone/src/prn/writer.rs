//! PRN encoding.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use super::{PrnError, PrnHeader};
use crate::halftone::{Channel, PackedPlane};

/// Zero bytes appended after a block of `bytes_per_line` bytes.
#[inline]
pub fn padding(bytes_per_line: usize) -> usize {
    (4 - bytes_per_line % 4) % 4
}

/// What was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrnSummary {
    pub header: PrnHeader,
    pub file_size: usize,
}

/// Encode a packed plane as a complete PRN image in memory.
///
/// `x_res`/`y_res` are rounded to whole DPI for the header.
pub fn encode(plane: &PackedPlane, x_res: f64, y_res: f64) -> Result<Vec<u8>, PrnError> {
    let bytes_per_line = plane.bytes_per_line();
    let header = PrnHeader::new(
        plane.width(),
        plane.height(),
        bytes_per_line,
        x_res,
        y_res,
        plane.level(),
    )?;
    let pad = [0u8; 3];
    let pad = &pad[..padding(bytes_per_line)];

    let row_size = Channel::COUNT * (bytes_per_line + pad.len());
    let mut out = Vec::with_capacity(PrnHeader::SIZE + plane.height() * row_size);
    out.extend_from_slice(&header.to_bytes());

    for row in 0..plane.height() {
        for channel in Channel::PRN_ORDER {
            let block = plane.channel_row(row, channel).unwrap_or_default();
            out.extend_from_slice(block);
            out.extend_from_slice(pad);
        }
    }
    Ok(out)
}

/// Encode and write to any sink. Returns the number of bytes written.
pub fn write_to<W: Write>(
    writer: &mut W,
    plane: &PackedPlane,
    x_res: f64,
    y_res: f64,
) -> Result<usize, PrnError> {
    let bytes = encode(plane, x_res, y_res)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(bytes.len())
}

/// Write a PRN file, replacing any existing file at `path`.
///
/// The whole image is encoded before the file is opened. If writing fails
/// part way, the partial file is removed.
pub fn write_prn_file(
    path: impl AsRef<Path>,
    plane: &PackedPlane,
    x_res: f64,
    y_res: f64,
) -> Result<PrnSummary, PrnError> {
    let path = path.as_ref();
    let bytes = encode(plane, x_res, y_res)?;
    let header = PrnHeader::from_bytes(&bytes)?;

    let mut file = File::create(path).map_err(|source| PrnError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    if let Err(source) = file.write_all(&bytes).and_then(|()| file.sync_all()) {
        drop(file);
        if let Err(e) = fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove partial PRN file");
        }
        return Err(PrnError::Write {
            path: path.to_path_buf(),
            source,
        });
    }

    tracing::info!(
        path = %path.display(),
        bytes = bytes.len(),
        width = plane.width(),
        height = plane.height(),
        "PRN file written"
    );
    Ok(PrnSummary {
        header,
        file_size: bytes.len(),
    })
}
