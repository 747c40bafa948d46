//! PNG decoding into a [`Raster`].

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use cmyk_halftone::Raster;

use crate::error::RasterError;

/// Convert a `pHYs` density in pixels per meter to DPI.
pub fn ppm_to_dpi(ppm: u32) -> f32 {
    (ppm as f64 * 2.54 / 100.0) as f32
}

/// Decode a PNG file.
pub fn load_png(path: &Path) -> Result<Raster, RasterError> {
    let file = File::open(path).map_err(|source| RasterError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let raster = decode_png(BufReader::new(file))?;
    tracing::info!(
        path = %path.display(),
        width = raster.width(),
        height = raster.height(),
        x_dpi = raster.x_dpi(),
        y_dpi = raster.y_dpi(),
        "Loaded source image"
    );
    Ok(raster)
}

/// Decode PNG data from any reader.
///
/// Samples are normalized to 8-bit RGB. Alpha is composited against white
/// paper. Density comes from the `pHYs` chunk when it is given in meters;
/// otherwise it is left at 0 for the job to fill in.
pub fn decode_png<R: Read>(reader: R) -> Result<Raster, RasterError> {
    let mut decoder = png::Decoder::new(reader);
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;

    let (x_dpi, y_dpi) = match reader.info().pixel_dims {
        Some(png::PixelDimensions {
            xppu,
            yppu,
            unit: png::Unit::Meter,
        }) => (ppm_to_dpi(xppu), ppm_to_dpi(yppu)),
        _ => (0.0, 0.0),
    };

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    if info.bit_depth != png::BitDepth::Eight {
        return Err(RasterError::Unsupported(format!(
            "{:?} bit samples after expansion",
            info.bit_depth
        )));
    }

    let width = info.width as usize;
    let height = info.height as usize;
    let channels = info.color_type.samples();
    let pixels: Vec<[u8; 3]> = buf
        .chunks(info.line_size)
        .take(height)
        .flat_map(|line| line[..width * channels].chunks_exact(channels))
        .map(|px| match info.color_type {
            png::ColorType::Grayscale => [px[0]; 3],
            png::ColorType::GrayscaleAlpha => [over_white(px[0], px[1]); 3],
            png::ColorType::Rgba => [
                over_white(px[0], px[3]),
                over_white(px[1], px[3]),
                over_white(px[2], px[3]),
            ],
            _ => [px[0], px[1], px[2]],
        })
        .collect();

    Ok(Raster::from_pixels(width, height, x_dpi, y_dpi, pixels)?)
}

/// Composite a sample with coverage `alpha` over white.
fn over_white(value: u8, alpha: u8) -> u8 {
    let a = alpha as u16;
    ((value as u16 * a + 255 * (255 - a)) / 255) as u8
}
