//! Source raster handed over by the caller.

use super::ColorError;

/// A decoded RGB source image.
///
/// Pixels are stored row-major, top to bottom, as `[R, G, B]` triples.
/// Density is the physical resolution of the source in pixels per inch;
/// it drives the scale factors computed for a job.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    width: usize,
    height: usize,
    x_dpi: f32,
    y_dpi: f32,
    pixels: Vec<[u8; 3]>,
}

impl Raster {
    /// Create a raster from RGB triples.
    ///
    /// Fails when `pixels.len()` is not `width * height`.
    pub fn from_pixels(
        width: usize,
        height: usize,
        x_dpi: f32,
        y_dpi: f32,
        pixels: Vec<[u8; 3]>,
    ) -> Result<Self, ColorError> {
        let expected = width * height;
        if pixels.len() != expected {
            return Err(ColorError::LengthMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            x_dpi,
            y_dpi,
            pixels,
        })
    }

    /// Create a raster from packed `R, G, B` bytes.
    pub fn from_rgb(
        width: usize,
        height: usize,
        x_dpi: f32,
        y_dpi: f32,
        bytes: Vec<u8>,
    ) -> Result<Self, ColorError> {
        let expected = width * height * 3;
        if bytes.len() != expected {
            return Err(ColorError::LengthMismatch {
                expected,
                actual: bytes.len(),
            });
        }
        let pixels = bytes
            .chunks_exact(3)
            .map(|p| [p[0], p[1], p[2]])
            .collect();
        Self::from_pixels(width, height, x_dpi, y_dpi, pixels)
    }

    /// Create a raster from packed `R, G, B, A` bytes. Alpha is ignored.
    pub fn from_rgba(
        width: usize,
        height: usize,
        x_dpi: f32,
        y_dpi: f32,
        bytes: &[u8],
    ) -> Result<Self, ColorError> {
        let expected = width * height * 4;
        if bytes.len() != expected {
            return Err(ColorError::LengthMismatch {
                expected,
                actual: bytes.len(),
            });
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|p| [p[0], p[1], p[2]])
            .collect();
        Self::from_pixels(width, height, x_dpi, y_dpi, pixels)
    }

    /// Create a raster from `0xAARRGGBB` words. Alpha is ignored.
    pub fn from_argb32(
        width: usize,
        height: usize,
        x_dpi: f32,
        y_dpi: f32,
        words: &[u32],
    ) -> Result<Self, ColorError> {
        let pixels = words
            .iter()
            .map(|&argb| {
                [
                    ((argb >> 16) & 0xFF) as u8,
                    ((argb >> 8) & 0xFF) as u8,
                    (argb & 0xFF) as u8,
                ]
            })
            .collect();
        Self::from_pixels(width, height, x_dpi, y_dpi, pixels)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Horizontal density in pixels per inch.
    #[inline]
    pub fn x_dpi(&self) -> f32 {
        self.x_dpi
    }

    /// Vertical density in pixels per inch.
    #[inline]
    pub fn y_dpi(&self) -> f32 {
        self.y_dpi
    }

    #[inline]
    pub fn pixels(&self) -> &[[u8; 3]] {
        &self.pixels
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgb_groups_triples() {
        let raster = Raster::from_rgb(2, 1, 300.0, 300.0, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(raster.pixels(), &[[1, 2, 3], [4, 5, 6]]);
        assert_eq!(raster.width(), 2);
        assert_eq!(raster.height(), 1);
    }

    #[test]
    fn test_from_rgb_rejects_short_buffer() {
        let err = Raster::from_rgb(2, 2, 72.0, 72.0, vec![0; 11]).unwrap_err();
        assert_eq!(
            err,
            ColorError::LengthMismatch {
                expected: 12,
                actual: 11
            }
        );
    }

    #[test]
    fn test_from_rgba_drops_alpha() {
        let raster = Raster::from_rgba(1, 1, 72.0, 72.0, &[10, 20, 30, 0]).unwrap();
        assert_eq!(raster.pixels(), &[[10, 20, 30]]);
    }

    #[test]
    fn test_from_argb32_unpacks_channels() {
        let raster = Raster::from_argb32(2, 1, 72.0, 72.0, &[0xFF11_2233, 0x00AA_BBCC]).unwrap();
        assert_eq!(raster.pixels(), &[[0x11, 0x22, 0x33], [0xAA, 0xBB, 0xCC]]);
    }

    #[test]
    fn test_zero_sized_raster_is_empty() {
        let raster = Raster::from_pixels(0, 5, 72.0, 72.0, Vec::new()).unwrap();
        assert!(raster.is_empty());
    }
}
