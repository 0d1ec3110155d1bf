//! Shared-border lengths between the polygons of a working set.
//!
//! Borders are measured by vertex coincidence: a segment of polygon `i`
//! counts towards its border with `j` when both of the segment's endpoints
//! are also vertices of `j`.  This is exact for planar partitions that share
//! vertices along common edges, and undercounts borders whose vertices were
//! perturbed (e.g. by reprojection).  Merge thresholds are tuned against this
//! measure, so it must not be replaced by a true intersection length.

use std::borrow::Borrow;
use std::collections::BTreeMap;

use ahash::AHashMap;
use geo::{Coord, Polygon};
use smallvec::SmallVec;

use crate::geom::{rings, segment_length};
use crate::graph::SlotId;

/// Symmetric matrix of shared-border lengths, indexed by `SlotId`.
///
/// Rows are stored sparsely and ordered by slot, so scans visit neighbors in
/// ascending slot order.  Absorbing a slot folds its row into another slot and
/// retires it; the remaining slots keep their ids.
#[derive(Debug, Clone, Default)]
pub struct BorderMatrix {
    rows: Vec<BTreeMap<u32, f64>>,
    active: Vec<bool>,
    live: usize,
}

impl BorderMatrix {
    /// Create an all-zero matrix over `size` active slots.
    pub fn new(size: usize) -> Self {
        Self {
            rows: vec![BTreeMap::new(); size],
            active: vec![true; size],
            live: size,
        }
    }

    /// Number of slots the matrix was created with, including retired ones.
    #[cfg(test)]
    #[inline] pub fn capacity(&self) -> usize { self.rows.len() }

    /// Number of active slots (the current matrix dimension).
    #[inline] pub fn len(&self) -> usize { self.live }

    #[inline] pub fn is_active(&self, slot: SlotId) -> bool { self.active.get(slot.index()).copied().unwrap_or(false) }

    /// Shared-border length between `a` and `b` (zero on the diagonal and for retired slots).
    #[cfg(test)]
    pub fn get(&self, a: SlotId, b: SlotId) -> f64 {
        self.rows.get(a.index())
            .and_then(|row| row.get(&b.0))
            .copied()
            .unwrap_or(0.0)
    }

    /// Iterate over the neighbors of `slot` with a nonzero border, in ascending slot order.
    #[inline]
    pub fn neighbors(&self, slot: SlotId) -> impl Iterator<Item = (SlotId, f64)> + '_ {
        self.rows[slot.index()].iter().map(|(&j, &length)| (SlotId(j), length))
    }

    /// Add `length` to the border between `a` and `b`, on both sides.
    pub(crate) fn add(&mut self, a: SlotId, b: SlotId, length: f64) {
        if a == b || length == 0.0 { return }
        *self.rows[a.index()].entry(b.0).or_insert(0.0) += length;
        *self.rows[b.index()].entry(a.0).or_insert(0.0) += length;
    }

    /// Fold the row and column of `source` into `target`, then retire `source`.
    ///
    /// Afterwards `target` borders every former neighbor of `source` by the sum
    /// of both borders, and the border between the two is gone.
    pub(crate) fn absorb(&mut self, target: SlotId, source: SlotId) {
        assert!(target != source, "cannot absorb {source} into itself");
        assert!(self.is_active(target) && self.is_active(source),
            "both {target} and {source} must be active");

        let row = std::mem::take(&mut self.rows[source.index()]);
        for (k, length) in row {
            let k = SlotId(k);
            self.rows[k.index()].remove(&source.0);
            if k != target {
                self.add(target, k, length);
            }
        }

        self.active[source.index()] = false;
        self.live -= 1;
    }

    /// Returns true if every stored border has an identical mirror entry and no
    /// slot borders itself or a retired slot.
    pub fn is_symmetric(&self) -> bool {
        self.rows.iter().enumerate().all(|(i, row)| {
            row.iter().all(|(&j, &length)| {
                j as usize != i
                    && self.active[j as usize]
                    && self.rows[j as usize].get(&(i as u32)) == Some(&length)
            })
        })
    }

    /// Dense copy of the matrix restricted to active slots, in slot order.
    #[cfg(test)]
    pub fn to_dense(&self) -> Vec<Vec<f64>> {
        let slots = (0..self.capacity())
            .map(SlotId::from)
            .filter(|&s| self.is_active(s))
            .collect::<Vec<_>>();

        slots.iter()
            .map(|&a| slots.iter().map(|&b| self.get(a, b)).collect())
            .collect()
    }
}

/// Key for exact coordinate comparison (`-0.0` and `0.0` compare equal).
#[inline]
fn coord_key(coord: Coord<f64>) -> (u64, u64) {
    ((coord.x + 0.0).to_bits(), (coord.y + 0.0).to_bits())
}

/// Compute the shared-border matrix for `polygons`, slot `i` being `polygons[i]`.
///
/// Each polygon's rings are walked in order; every segment whose endpoints are
/// both vertices of another polygon `j` adds its length to the `(i, j)` border.
/// The walks from both sides are averaged so that the result is symmetric even
/// where the two boundaries are not vertex-for-vertex identical.
pub fn build_border_matrix<P: Borrow<Polygon<f64>>>(polygons: &[P]) -> BorderMatrix {
    // Map each distinct vertex to the (sorted) polygons whose boundary contains it.
    let mut touching: AHashMap<(u64, u64), SmallVec<[u32; 4]>> = AHashMap::new();
    for (i, polygon) in polygons.iter().enumerate() {
        let polygon: &Polygon<f64> = polygon.borrow();
        for coord in rings(polygon).flat_map(|ring| ring.0.iter()) {
            let owners = touching.entry(coord_key(*coord)).or_default();
            if owners.last() != Some(&(i as u32)) {
                owners.push(i as u32);
            }
        }
    }

    let mut matrix = BorderMatrix::new(polygons.len());
    let empty = SmallVec::<[u32; 4]>::new();

    for (i, polygon) in polygons.iter().enumerate() {
        let polygon: &Polygon<f64> = polygon.borrow();
        let slot = SlotId::from(i);
        for ring in rings(polygon) {
            let mut previous: Option<(Coord<f64>, &SmallVec<[u32; 4]>)> = None;
            for &coord in ring.0.iter() {
                let owners = touching.get(&coord_key(coord)).unwrap_or(&empty);
                if let Some((prev, prev_owners)) = previous {
                    let length = segment_length(prev, coord);
                    for &j in prev_owners.iter().filter(|&&j| j as usize != i) {
                        if owners.binary_search(&j).is_ok() {
                            matrix.add(slot, SlotId(j), length / 2.0);
                        }
                    }
                }
                previous = Some((coord, owners));
            }
        }
    }

    matrix
}
