use tracing::{debug, warn};

use crate::category::CategoryError;
use crate::geom::{remove_small_holes, GeometryKernel, PlanarKernel};
use crate::graph::SlotId;
use crate::trim::decision::{force_merge, select_target};
use crate::trim::{explode, ConfigError, SourceFeature, TrimConfig, TrimmedPolygon, WorkingSet};

/// Counters collected over one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrimStats {
    /// Input features.
    pub features: usize,
    /// Single polygons after splitting multipolygons.
    pub polygons: usize,
    pub merges: usize,
    /// Merges skipped because the union failed.
    pub failed_merges: usize,
    /// Polygons written out.
    pub survivors: usize,
    /// Interior rings dropped as artifacts.
    pub holes_removed: usize,
}

/// Result of one run.
#[derive(Debug, Clone)]
pub struct TrimOutput {
    pub polygons: Vec<TrimmedPolygon>,
    pub stats: TrimStats,
}

/// Consolidates one feature collection at a time under a fixed configuration.
#[derive(Debug, Clone)]
pub struct Trimmer<K = PlanarKernel> {
    config: TrimConfig,
    kernel: K,
}

impl Trimmer<PlanarKernel> {
    /// Construct a trimmer using the planar `geo` kernel.
    pub fn new(config: TrimConfig) -> Result<Self, ConfigError> {
        Self::with_kernel(config, PlanarKernel)
    }
}

impl<K: GeometryKernel> Trimmer<K> {
    /// Construct a trimmer with a custom geometry kernel.
    pub fn with_kernel(config: TrimConfig, kernel: K) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, kernel })
    }

    #[inline] pub fn config(&self) -> &TrimConfig { &self.config }

    /// Explode, merge and clean `features`.
    ///
    /// Fails without output if any feature's code has no category.
    pub fn run(&self, features: Vec<SourceFeature>) -> Result<TrimOutput, CategoryError> {
        let mut stats = TrimStats { features: features.len(), ..TrimStats::default() };

        let polygons = explode(features, self.config.mode)?;
        stats.polygons = polygons.len();

        let mut set = WorkingSet::new(&self.kernel, polygons);
        self.consolidate(&mut set, &mut stats);
        debug_assert!(set.borders().is_symmetric());
        debug!(remaining = set.len(), merges = stats.merges, "consolidated");

        let polygons = set.into_entries()
            .map(|entry| {
                let (polygon, removed) = remove_small_holes(entry.polygon, self.config.area_limit);
                stats.holes_removed += removed;
                TrimmedPolygon { category: entry.category, polygon }
            })
            .collect::<Vec<_>>();
        stats.survivors = polygons.len();

        Ok(TrimOutput { polygons, stats })
    }

    /// Visit every slot from the smallest polygon to the largest, merging each
    /// into its chosen neighbor.
    ///
    /// Only the visited slot is ever retired, so slots below it keep their
    /// positions and the visit order stays smallest-first over the live set.
    fn consolidate(&self, set: &mut WorkingSet, stats: &mut TrimStats) {
        for index in (0..set.capacity()).rev() {
            let slot = SlotId::from(index);
            let Some(entry) = set.get(slot) else { continue };

            let force = force_merge(&self.kernel, &self.config, &entry.polygon, entry.area);
            let Some(target) = select_target(set, slot, self.config.minimum_border_ratio, force) else { continue };

            match set.merge(&self.kernel, target.slot, slot) {
                Ok(()) => {
                    stats.merges += 1;
                    debug!(source = %slot, target = %target.slot, border = target.border, reason = ?target.reason, "merged");
                }
                Err(err) => {
                    stats.failed_merges += 1;
                    warn!(source = %slot, target = %target.slot, error = %err, "skipping merge");
                }
            }
        }
    }
}
