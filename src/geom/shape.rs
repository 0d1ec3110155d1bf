use std::f64::consts::PI;

use geo::{Area, Coord, LineString, Polygon};

/// Euclidean length of the segment `a -> b`, in coordinate units.
#[inline]
pub fn segment_length(a: Coord<f64>, b: Coord<f64>) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Length of a ring (or any line string), summed segment by segment.
pub fn ring_length(ring: &LineString<f64>) -> f64 {
    ring.0.windows(2).map(|w| segment_length(w[0], w[1])).sum()
}

/// Iterate over the rings of a polygon: exterior first, then interiors in order.
#[inline]
pub fn rings(polygon: &Polygon<f64>) -> impl Iterator<Item = &LineString<f64>> {
    std::iter::once(polygon.exterior()).chain(polygon.interiors())
}

/// Isoperimetric compactness `4πA / P²`.
///
/// A circle scores 1.0 and a sliver tends to 0.  A boundary of zero length is
/// treated as maximally thin.
pub fn thinness(area: f64, perimeter: f64) -> f64 {
    if perimeter > 0.0 { 4.0 * PI * area / (perimeter * perimeter) } else { 0.0 }
}

/// Drop interior rings whose enclosed area is below `min_area`.
/// Returns the rebuilt polygon and the number of holes removed.
pub fn remove_small_holes(polygon: Polygon<f64>, min_area: f64) -> (Polygon<f64>, usize) {
    let (exterior, interiors) = polygon.into_inner();
    let before = interiors.len();

    let kept = interiors.into_iter()
        .filter(|ring| Polygon::new(ring.clone(), Vec::new()).unsigned_area() >= min_area)
        .collect::<Vec<_>>();
    let removed = before - kept.len();

    (Polygon::new(exterior, kept), removed)
}
