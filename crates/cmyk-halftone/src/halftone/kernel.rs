//! Error diffusion kernel definitions.

/// An error diffusion kernel.
///
/// Each entry is an offset `(dx, dy)` to a pixel that has not been visited
/// yet in raster order, plus the numerator of the share of error it
/// receives. The total error propagated is `sum(weights) / divisor`.
///
/// `max_dy` is how many rows ahead the kernel reaches, which sets the
/// error buffer depth to `max_dy + 1` rows.
#[derive(Debug, Clone, Copy)]
pub struct Kernel {
    /// `(dx, dy, weight)` entries.
    pub entries: &'static [(i32, i32, u8)],

    /// Each neighbor receives `error * weight / divisor`.
    pub divisor: u8,

    pub max_dy: usize,
}

impl Kernel {
    /// Fraction of the quantization error this kernel hands to neighbors.
    pub fn propagation(&self) -> f32 {
        let total: u32 = self.entries.iter().map(|&(_, _, w)| w as u32).sum();
        total as f32 / self.divisor as f32
    }
}

/// Floyd-Steinberg dithering kernel.
///
/// ```text
///        X   7
///    3   5   1
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[
        (1, 0, 7),  // right
        (-1, 1, 3), // bottom-left
        (0, 1, 5),  // bottom
        (1, 1, 1),  // bottom-right
    ],
    divisor: 16,
    max_dy: 1,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floyd_steinberg_propagates_all_error() {
        let sum: u8 = FLOYD_STEINBERG.entries.iter().map(|(_, _, w)| w).sum();
        assert_eq!(sum, 16, "Floyd-Steinberg weights should sum to 16");
        assert_eq!(FLOYD_STEINBERG.divisor, 16);
        assert_eq!(FLOYD_STEINBERG.propagation(), 1.0);
    }

    #[test]
    fn test_floyd_steinberg_only_reaches_unvisited_pixels() {
        for &(dx, dy, _) in FLOYD_STEINBERG.entries {
            assert!(
                dy > 0 || dx > 0,
                "entry ({dx}, {dy}) points at an already processed pixel"
            );
        }
        let actual_max_dy = FLOYD_STEINBERG
            .entries
            .iter()
            .map(|(_, dy, _)| *dy as usize)
            .max()
            .unwrap();
        assert_eq!(actual_max_dy, FLOYD_STEINBERG.max_dy);
    }
}
