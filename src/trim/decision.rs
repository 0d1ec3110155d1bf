//! Per-polygon merge rules: whether a polygon must go, and where it goes.

use geo::Polygon;

use crate::geom::{ring_length, thinness, GeometryKernel};
use crate::graph::SlotId;
use crate::trim::{TrimConfig, WorkingSet};

/// Why a merge target was chosen.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MergeReason {
    /// Same category with a long enough shared border.
    SameCategory,
    /// Longest border of any category; the polygon was too small or thin to keep.
    Forced,
}

/// A chosen merge target for one polygon.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Target {
    pub slot: SlotId,
    pub border: f64,
    pub reason: MergeReason,
}

/// Returns true if a polygon of `area` must be merged regardless of category:
/// it is below the area limit, or it falls in a thinness tier and its
/// simplified outline is thinner than that tier allows.
pub fn force_merge<K: GeometryKernel>(kernel: &K, config: &TrimConfig, polygon: &Polygon<f64>, area: f64) -> bool {
    if area < config.area_limit { return true }

    let Some(threshold) = config.thinness_threshold(area) else { return false };
    let simplified = kernel.simplify(polygon, config.simplify_tolerance);
    thinness(area, ring_length(simplified.exterior())) < threshold
}

/// Pick the slot that `slot` should merge into, if any.
///
/// A same-category neighbor wins if its shared border, relative to the
/// boundary length of the smaller of the two, exceeds `minimum_border_ratio`;
/// among several, the longest border (then the lowest slot) is taken.
/// Otherwise, when `force` is set, the neighbor with the longest border of any
/// category is taken.
pub fn select_target(set: &WorkingSet, slot: SlotId, minimum_border_ratio: f64, force: bool) -> Option<Target> {
    let entry = set.get(slot)?;

    let mut longest: Option<(SlotId, f64)> = None;
    let mut same: Option<(SlotId, f64)> = None;

    for (other, border) in set.borders().neighbors(slot) {
        let Some(neighbor) = set.get(other) else { continue };

        if border > longest.map_or(0.0, |(_, b)| b) {
            longest = Some((other, border));
        }

        if neighbor.category == entry.category && border > same.map_or(0.0, |(_, b)| b) {
            let reference = if neighbor.area > entry.area { entry.perimeter } else { neighbor.perimeter };
            if border / reference > minimum_border_ratio {
                same = Some((other, border));
            }
        }
    }

    match (same, longest) {
        (Some((slot, border)), _) => Some(Target { slot, border, reason: MergeReason::SameCategory }),
        (None, Some((slot, border))) if force => Some(Target { slot, border, reason: MergeReason::Forced }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::geom::PlanarKernel;
    use geo::polygon;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon<f64> {
        polygon![(x: x0, y: y0), (x: x1, y: y0), (x: x1, y: y1), (x: x0, y: y1)]
    }

    fn config(ratio: f64) -> TrimConfig {
        TrimConfig { minimum_border_ratio: ratio, ..TrimConfig::chu() }
    }

    fn set_of(polygons: Vec<(Category, Polygon<f64>)>) -> WorkingSet {
        WorkingSet::new(&PlanarKernel, polygons)
    }

    /// A 10×10 block (slot 0) and a 1×1.5 tab (slot 1) sharing a side of
    /// length `shared` <= 1.5; the tab's perimeter is 5.
    fn block_and_tab(tab_category: Category, shared: f64) -> WorkingSet {
        let block = polygon![
            (x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: shared),
            (x: 10.0, y: 10.0), (x: 0.0, y: 10.0),
        ];
        let tab = polygon![
            (x: 10.0, y: 0.0), (x: 11.0, y: 0.0), (x: 11.0, y: 1.5),
            (x: 10.0, y: 1.5), (x: 10.0, y: shared),
        ];
        set_of(vec![(1, block), (tab_category, tab)])
    }

    #[test]
    fn below_area_limit_always_forces() {
        let config = TrimConfig::chu();
        let tiny = rect(0.0, 0.0, 1e-4, 1e-4);
        assert!(force_merge(&PlanarKernel, &config, &tiny, 1e-8));

        // Even a perfectly compact shape.
        let shokusei = TrimConfig::shokusei();
        assert!(force_merge(&PlanarKernel, &shokusei, &tiny, shokusei.area_limit / 2.0));
    }

    #[test]
    fn chu_never_forces_by_thinness() {
        let config = TrimConfig::chu();
        let sliver = rect(0.0, 0.0, 1.0, 1e-5);
        assert!(!force_merge(&PlanarKernel, &config, &sliver, 1e-5));
    }

    #[test]
    fn shokusei_forces_thin_polygons_in_a_tier() {
        let config = TrimConfig::shokusei();

        // 0.1 × 0.001 deg strip: area 1e-4 (first tier), thinness ~0.03.
        let sliver = rect(0.0, 0.0, 0.1, 0.001);
        assert!(force_merge(&PlanarKernel, &config, &sliver, 1e-4));

        // Compact square with the same area is kept.
        let square = rect(0.0, 0.0, 0.01, 0.01);
        assert!(!force_merge(&PlanarKernel, &config, &square, 1e-4));
    }

    #[test]
    fn large_polygons_are_never_forced() {
        let config = TrimConfig::shokusei();
        let strip = rect(0.0, 0.0, 10.0, 0.01);
        assert!(!force_merge(&PlanarKernel, &config, &strip, 0.1));
    }

    #[test]
    fn same_category_merges_above_ratio() {
        // shared 1.0 / tab perimeter 5.0 = 0.20 > 0.15
        let set = block_and_tab(1, 1.0);
        let target = select_target(&set, SlotId(1), config(0.15).minimum_border_ratio, false);
        assert_eq!(target.map(|t| (t.slot, t.reason)), Some((SlotId(0), MergeReason::SameCategory)));
    }

    #[test]
    fn same_category_below_ratio_needs_force() {
        // shared 0.25 / 5.0 = 0.05 < 0.15
        let set = block_and_tab(1, 0.25);
        assert_eq!(select_target(&set, SlotId(1), 0.15, false), None);

        let forced = select_target(&set, SlotId(1), 0.15, true).unwrap();
        assert_eq!(forced.slot, SlotId(0));
        assert_eq!(forced.reason, MergeReason::Forced);
        assert!((forced.border - 0.25).abs() < 1e-12);
    }

    #[test]
    fn other_category_merges_only_when_forced() {
        let set = block_and_tab(2, 1.0);
        assert_eq!(select_target(&set, SlotId(1), 0.15, false), None);
        assert_eq!(select_target(&set, SlotId(1), 0.15, true).map(|t| t.slot), Some(SlotId(0)));
    }

    #[test]
    fn ratio_uses_smaller_polygon_perimeter_from_either_side() {
        // Visiting the big block: the neighbor tab is smaller, so its
        // perimeter is the reference.
        let set = block_and_tab(1, 1.0);
        assert_eq!(select_target(&set, SlotId(0), 0.15, false).map(|t| t.slot), Some(SlotId(1)));
    }

    #[test]
    fn isolated_polygon_has_no_target() {
        let set = set_of(vec![(1, rect(0.0, 0.0, 1.0, 1.0)), (1, rect(5.0, 5.0, 6.0, 6.0))]);
        assert_eq!(select_target(&set, SlotId(1), 0.0, true), None);
    }

    #[test]
    fn same_category_beats_longer_foreign_border() {
        // Tab at slot 2 (perimeter 8) borders a foreign block along 2.0 and a
        // same-category block along 1.0.
        let tab = polygon![
            (x: 10.0, y: 8.0), (x: 10.0, y: 10.0), (x: 10.0, y: 11.0),
            (x: 11.0, y: 11.0), (x: 11.0, y: 8.0),
        ];
        let foreign = polygon![
            (x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 8.0),
            (x: 10.0, y: 10.0), (x: 0.0, y: 10.0),
        ];
        let same = polygon![
            (x: 0.0, y: 10.0), (x: 10.0, y: 10.0), (x: 10.0, y: 11.0),
            (x: 10.0, y: 19.0), (x: 0.0, y: 19.0),
        ];
        let set = set_of(vec![(1, foreign), (2, same), (2, tab)]);

        let longest = set.borders().get(SlotId(2), SlotId(0));
        assert!((longest - 2.0).abs() < 1e-12);

        let target = select_target(&set, SlotId(2), 0.1, true).unwrap();
        assert_eq!(target.slot, SlotId(1));
        assert_eq!(target.reason, MergeReason::SameCategory);
    }

    #[test]
    fn ties_go_to_lowest_slot() {
        // Two equal blocks on either side of a small square.
        let left = polygon![(x: 0.0, y: 0.0), (x: 5.0, y: 0.0), (x: 5.0, y: 1.0), (x: 5.0, y: 2.0), (x: 0.0, y: 2.0)];
        let right = polygon![(x: 6.0, y: 0.0), (x: 11.0, y: 0.0), (x: 11.0, y: 2.0), (x: 6.0, y: 2.0), (x: 6.0, y: 1.0)];
        let middle = rect(5.0, 0.0, 6.0, 1.0);
        let set = set_of(vec![(1, left), (2, right), (3, middle)]);

        let target = select_target(&set, SlotId(2), 0.15, true).unwrap();
        assert_eq!(target.slot, SlotId(0));
    }
}
