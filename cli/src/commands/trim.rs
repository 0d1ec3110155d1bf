use std::path::PathBuf;

use anyhow::{Context, Result};
use polytrim::{ensure_dir_exists, output_path, trim_file, Profile, TrimConfig, Trimmer};
use tracing::info;

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::TrimArgs) -> Result<()> {
    let profile = Profile::from(args.profile);
    let config = match &args.config {
        Some(path) => TrimConfig::from_json_file(path)?,
        None => profile.config(),
    };

    let out_dir = args.out.clone()
        .unwrap_or_else(|| PathBuf::from("data/geojson-trimmed").join(profile.name()));
    ensure_dir_exists(&out_dir)?;

    let files = glob::glob(&args.geojson_pattern)
        .with_context(|| format!("Invalid glob pattern: {}", args.geojson_pattern))?
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to expand glob pattern")?;
    if files.is_empty() {
        anyhow::bail!("No files match {}", args.geojson_pattern);
    }

    let trimmer = Trimmer::new(config).context("Invalid trim configuration")?;
    info!(profile = %trimmer.config().name, files = files.len(), out = %out_dir.display(), "trimming");

    for input in &files {
        let output = output_path(&out_dir, input)?;
        trim_file(&trimmer, input, &output)?;
    }

    Ok(())
}
