//! Test fixtures and constants.

use std::path::Path;

use cmyk_halftone::Raster;

/// Densities commonly found in `pHYs` chunks, in pixels per meter
pub mod density {
    pub const DPI_72: u32 = 2835;
    pub const DPI_150: u32 = 5906;
    pub const DPI_300: u32 = 11811;
}

/// A raster filled with one color
pub fn solid_raster(width: usize, height: usize, dpi: f32, rgb: [u8; 3]) -> Raster {
    Raster::from_pixels(width, height, dpi, dpi, vec![rgb; width * height])
        .expect("solid raster")
}

/// A horizontal gray ramp from black to white
pub fn gray_ramp(width: usize, height: usize, dpi: f32) -> Raster {
    let pixels = (0..height)
        .flat_map(|_| {
            (0..width).map(move |x| {
                let v = if width > 1 { (x * 255 / (width - 1)) as u8 } else { 0 };
                [v, v, v]
            })
        })
        .collect();
    Raster::from_pixels(width, height, dpi, dpi, pixels).expect("gray ramp")
}

/// Encode RGB pixels as an 8-bit PNG, optionally with a density chunk.
pub fn png_bytes(width: u32, height: u32, rgb: &[u8], ppm: Option<u32>) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_pixel_dims(ppm.map(|ppm| png::PixelDimensions {
            xppu: ppm,
            yppu: ppm,
            unit: png::Unit::Meter,
        }));
        let mut writer = encoder.write_header().expect("png header");
        writer.write_image_data(rgb).expect("png data");
    }
    out
}

/// Write a solid-color PNG to `path`
pub fn write_solid_png(path: &Path, width: u32, height: u32, rgb: [u8; 3], ppm: Option<u32>) {
    let data: Vec<u8> = (0..width * height).flat_map(|_| rgb).collect();
    std::fs::write(path, png_bytes(width, height, &data, ppm)).expect("write png");
}

/// A job file with every option spelled out
pub const FULL_JOB_YAML: &str = r#"
x_resolution: 600
y_resolution: 300
width_percentage: 50
height_percentage: 100
dithering: 4
rgb_profile: ""
cmyk_profile: ""
channels:
  c: true
  m: true
  y: true
  k: true
  lc: true
threads: 2
"#;
