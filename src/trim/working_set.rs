use geo::Polygon;

use crate::category::Category;
use crate::geom::{GeometryKernel, UnionError};
use crate::graph::{build_border_matrix, BorderMatrix, SlotId};

/// One polygon of the working set with its cached measurements.
#[derive(Debug, Clone)]
pub struct Entry {
    pub category: Category,
    pub polygon: Polygon<f64>,
    /// Accumulated area: measured once, then summed across merges.
    pub area: f64,
    /// Boundary length of `polygon`, all rings included.
    pub perimeter: f64,
}

/// The polygons of one run and their shared borders, kept in lockstep.
///
/// Slots are numbered in descending order of initial area.  A merge replaces
/// the surviving slot's polygon and retires the absorbed slot in both the
/// polygon list and the border matrix.
#[derive(Debug, Clone)]
pub struct WorkingSet {
    entries: Vec<Option<Entry>>,
    borders: BorderMatrix,
}

impl WorkingSet {
    /// Measure, sort (largest first) and index `polygons`.
    pub fn new<K: GeometryKernel>(kernel: &K, polygons: Vec<(Category, Polygon<f64>)>) -> Self {
        let mut entries = polygons.into_iter()
            .map(|(category, polygon)| Entry {
                category,
                area: kernel.area(&polygon),
                perimeter: kernel.perimeter(&polygon),
                polygon,
            })
            .collect::<Vec<_>>();

        // Stable: equal areas keep their input order.
        entries.sort_by(|a, b| b.area.total_cmp(&a.area));

        let borders = build_border_matrix(&entries.iter().map(|e| &e.polygon).collect::<Vec<_>>());

        Self { entries: entries.into_iter().map(Some).collect(), borders }
    }

    /// Number of slots the set was created with.
    #[inline] pub fn capacity(&self) -> usize { self.entries.len() }

    /// Number of polygons still present.
    #[inline] pub fn len(&self) -> usize { self.borders.len() }

    #[inline] pub fn borders(&self) -> &BorderMatrix { &self.borders }

    /// The entry in `slot`, or `None` if it was merged away.
    #[inline]
    pub fn get(&self, slot: SlotId) -> Option<&Entry> {
        self.entries.get(slot.index()).and_then(Option::as_ref)
    }

    /// Iterate over live slots in ascending slot order.
    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &Entry)> + '_ {
        self.entries.iter().enumerate()
            .filter_map(|(i, entry)| entry.as_ref().map(|e| (SlotId::from(i), e)))
    }

    /// Sum of the accumulated areas of all live entries.
    #[cfg(test)]
    pub fn total_area(&self) -> f64 {
        self.iter().map(|(_, e)| e.area).sum()
    }

    /// Merge `source` into `target`.
    ///
    /// On success `target` holds the union, keeps its category, gains
    /// `source`'s area, and inherits `source`'s borders; `source` is retired.
    /// On failure nothing changes.
    pub fn merge<K: GeometryKernel>(&mut self, kernel: &K, target: SlotId, source: SlotId) -> Result<(), UnionError> {
        assert!(target != source, "cannot merge {source} into itself");
        let (Some(t), Some(s)) = (self.get(target), self.get(source)) else {
            panic!("merge of retired slot ({target} <- {source})");
        };

        let merged = kernel.union(&t.polygon, &s.polygon)?;
        let perimeter = kernel.perimeter(&merged);

        let absorbed_area = self.entries[source.index()].take().map_or(0.0, |e| e.area);
        if let Some(entry) = self.entries[target.index()].as_mut() {
            entry.polygon = merged;
            entry.perimeter = perimeter;
            entry.area += absorbed_area;
        }
        self.borders.absorb(target, source);

        Ok(())
    }

    /// Consume the set, yielding live entries in slot order.
    pub fn into_entries(self) -> impl Iterator<Item = Entry> {
        self.entries.into_iter().flatten()
    }
}
