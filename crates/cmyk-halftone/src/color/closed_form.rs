//! Closed-form color math used when no ICC profile is available.
//!
//! RGB is treated as sRGB with a D65 white point. The CMYK separation is
//! the naive "max channel" black generation: it has no ink limits, no
//! dot gain and no under-color removal tuning, so it is a fallback only.

use super::buffers::Lab;

include!(concat!(env!("OUT_DIR"), "/srgb8_lut.rs"));

/// Linear sRGB to CIE XYZ (D65).
pub const SRGB_TO_XYZ: [[f32; 3]; 3] = [
    [0.4124564, 0.3575761, 0.1804375],
    [0.2126729, 0.7151522, 0.0721750],
    [0.0193339, 0.1191920, 0.9503041],
];

/// CIE XYZ (D65) to linear sRGB.
pub const XYZ_TO_SRGB: [[f32; 3]; 3] = [
    [3.2404542, -1.5371385, -0.4985314],
    [-0.9692660, 1.8760108, 0.0415560],
    [0.0556434, -0.2040259, 1.0572252],
];

/// D65 reference white `[Xn, Yn, Zn]`.
pub const D65_WHITE: [f32; 3] = [0.95047, 1.0, 1.08883];

/// CIE threshold between the linear and cube-root segments.
const LAB_EPSILON: f32 = 0.008856;

/// Slope of the linear segment.
const LAB_SLOPE: f32 = 7.787;

const LAB_OFFSET: f32 = 16.0 / 116.0;

/// Below this, `1 - K` is treated as zero and the pixel is pure black.
const BLACK_EPSILON: f32 = 1e-6;

/// Decode an 8-bit sRGB code value to linear light.
#[inline]
pub fn srgb8_to_linear(value: u8) -> f32 {
    SRGB8_TO_LINEAR[value as usize]
}

#[inline]
fn mul3(m: &[[f32; 3]; 3], v: [f32; 3]) -> [f32; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

#[inline]
fn lab_f(t: f32) -> f32 {
    if t > LAB_EPSILON {
        t.cbrt()
    } else {
        LAB_SLOPE * t + LAB_OFFSET
    }
}

#[inline]
fn lab_f_inv(f: f32) -> f32 {
    let cube = f * f * f;
    if cube > LAB_EPSILON {
        cube
    } else {
        (f - LAB_OFFSET) / LAB_SLOPE
    }
}

/// Convert an 8-bit sRGB pixel to Lab (D65). L is clamped to be non-negative.
pub fn rgb_to_lab(rgb: [u8; 3]) -> Lab {
    let linear = [
        srgb8_to_linear(rgb[0]),
        srgb8_to_linear(rgb[1]),
        srgb8_to_linear(rgb[2]),
    ];
    let [x, y, z] = mul3(&SRGB_TO_XYZ, linear);

    let fx = lab_f(x / D65_WHITE[0]);
    let fy = lab_f(y / D65_WHITE[1]);
    let fz = lab_f(z / D65_WHITE[2]);

    Lab {
        l: (116.0 * fy - 16.0).max(0.0),
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

/// Convert Lab (D65) to linear sRGB clamped to `0.0..=1.0`.
pub fn lab_to_linear_rgb(lab: Lab) -> [f32; 3] {
    let fy = (lab.l + 16.0) / 116.0;
    let fx = lab.a / 500.0 + fy;
    let fz = fy - lab.b / 200.0;

    let xyz = [
        D65_WHITE[0] * lab_f_inv(fx),
        D65_WHITE[1] * lab_f_inv(fy),
        D65_WHITE[2] * lab_f_inv(fz),
    ];
    let rgb = mul3(&XYZ_TO_SRGB, xyz);
    [
        rgb[0].clamp(0.0, 1.0),
        rgb[1].clamp(0.0, 1.0),
        rgb[2].clamp(0.0, 1.0),
    ]
}

/// Max-channel black generation on linear RGB in `0.0..=1.0`.
///
/// Returns `[C, M, Y, K]` in `0.0..=1.0`. When `K` reaches 1 the color
/// components are undefined (division by zero) and are emitted as 0.
pub fn black_generation(rgb: [f32; 3]) -> [f32; 4] {
    let k = 1.0 - rgb[0].max(rgb[1]).max(rgb[2]);
    let remaining = 1.0 - k;
    if remaining <= BLACK_EPSILON {
        return [0.0, 0.0, 0.0, 1.0];
    }
    [
        ((1.0 - rgb[0] - k) / remaining).clamp(0.0, 1.0),
        ((1.0 - rgb[1] - k) / remaining).clamp(0.0, 1.0),
        ((1.0 - rgb[2] - k) / remaining).clamp(0.0, 1.0),
        k.clamp(0.0, 1.0),
    ]
}

/// Convert a Lab pixel to 8-bit `[C, M, Y, K]`.
///
/// Scaling truncates toward zero, so values a hair below a full step
/// land on the lower code.
pub fn lab_to_cmyk(lab: Lab) -> [u8; 4] {
    let [c, m, y, k] = black_generation(lab_to_linear_rgb(lab));
    [
        (c * 255.0) as u8,
        (m * 255.0) as u8,
        (y * 255.0) as u8,
        (k * 255.0) as u8,
    ]
}
