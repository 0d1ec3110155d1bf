mod geojson;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::trim::{TrimStats, Trimmer};

pub use geojson::{polygon_to_geojson, read_feature_collection, write_feature_collection, FeatureCollection, FeatureError};

/// Trim one GeoJSON file into `output`.
///
/// Nothing is written if the file fails (unreadable, unclassifiable).
pub fn trim_file(trimmer: &Trimmer, input: &Path, output: &Path) -> Result<TrimStats> {
    let bytes = fs::read(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let config = trimmer.config();

    let collection = read_feature_collection(&bytes, &config.source_key)
        .with_context(|| format!("Failed to read features from {}", input.display()))?;
    let dropped = collection.dropped;

    let result = trimmer.run(collection.features)
        .with_context(|| format!("Failed to trim {}", input.display()))?;

    let bytes = write_feature_collection(&collection.members, &result.polygons, &config.output_key)?;
    fs::write(output, bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    let stats = result.stats;
    info!(
        input = %input.display(),
        features = stats.features,
        dropped,
        polygons = stats.polygons,
        merges = stats.merges,
        failed_merges = stats.failed_merges,
        survivors = stats.survivors,
        holes_removed = stats.holes_removed,
        "trimmed"
    );

    Ok(stats)
}
