use std::path::{Path, PathBuf};

/// Extension of generated spool files
pub const PRN_EXTENSION: &str = "prn";

/// Pick a PRN path in `dir` named after `image` that does not exist yet.
///
/// Tries `name.prn` first, then `name01.prn`, `name02.prn` and so on.
/// Returns `None` once all hundred two-digit suffixes are taken.
pub fn unique_output_path(dir: &Path, image: &Path) -> Option<PathBuf> {
    let stem = image
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "output".to_string());

    let first = dir.join(format!("{stem}.{PRN_EXTENSION}"));
    if !first.exists() {
        return Some(first);
    }
    (1..100)
        .map(|n| dir.join(format!("{stem}{n:02}.{PRN_EXTENSION}")))
        .find(|candidate| !candidate.exists())
}

/// Default output path next to the input image: same stem, `.prn` extension
pub fn sibling_output_path(image: &Path) -> PathBuf {
    image.with_extension(PRN_EXTENSION)
}
