use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// IEC 61966-2-1 decoding curve: sRGB to linear
fn srgb_to_linear_exact(srgb: f64) -> f64 {
    if srgb <= 0.04045 {
        srgb / 12.92
    } else {
        ((srgb + 0.055) / 1.055).powf(2.4)
    }
}

fn main() -> std::io::Result<()> {
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    let dest_path = Path::new(&out_dir).join("srgb8_lut.rs");
    let mut file = BufWriter::new(File::create(&dest_path)?);

    // One entry per 8-bit code value; sources are always 8-bit.
    writeln!(file, "/// Lookup table for 8-bit sRGB to linear conversion")?;
    writeln!(file, "/// Index: 8-bit sRGB code value, Value: linear value")?;
    writeln!(file, "pub static SRGB8_TO_LINEAR: [f32; 256] = [")?;
    for i in 0..256 {
        let linear = srgb_to_linear_exact(i as f64 / 255.0);
        if i > 0 && i % 8 == 0 {
            writeln!(file)?;
        }
        write!(file, "    {:.9},", linear as f32)?;
    }
    writeln!(file, "\n];")?;

    println!("cargo::rerun-if-changed=build.rs");
    Ok(())
}
