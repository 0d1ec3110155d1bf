use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Create the directory if it doesn’t exist; error if a non-directory exists there.
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if path.exists() {
        if !path.is_dir() {
            anyhow::bail!("Path exists but is not a directory: {}", path.display());
        }
    } else {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {}", path.display()))?;
    }
    Ok(())
}

/// Output file for `input` inside `out_dir`: same stem, `.geojson` extension.
pub fn output_path(out_dir: &Path, input: &Path) -> Result<PathBuf> {
    let stem = input.file_stem()
        .with_context(|| format!("Input path has no file name: {}", input.display()))?;
    let mut name = stem.to_os_string();
    name.push(".geojson");
    Ok(out_dir.join(name))
}
