use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use geo::{Area, BooleanOps, MultiPolygon, Polygon, Simplify};
use thiserror::Error;

use crate::geom::{ring_length, rings};

/// Why a union of two polygons could not be used as a merge result.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UnionError {
    /// The boolean-ops backend panicked on degenerate input.
    #[error("union panicked: {0}")]
    Panicked(String),
    /// The union produced no polygon at all.
    #[error("union produced an empty geometry")]
    Empty,
    /// The inputs do not form one connected polygon.
    #[error("union produced {parts} disjoint polygons")]
    Disconnected { parts: usize },
}

/// The geometric primitives the trimmer needs.
///
/// Implementations work in whatever planar units the input coordinates use;
/// thresholds in `TrimConfig` are expressed in the same units.
pub trait GeometryKernel {
    /// Enclosed area (holes subtracted), always non-negative.
    fn area(&self, polygon: &Polygon<f64>) -> f64;

    /// Total boundary length: exterior plus all interior rings.
    fn perimeter(&self, polygon: &Polygon<f64>) -> f64 {
        rings(polygon).map(ring_length).sum()
    }

    /// Simplify the boundary with the given tolerance.
    fn simplify(&self, polygon: &Polygon<f64>, tolerance: f64) -> Polygon<f64>;

    /// Union of two polygons. Must not panic; failures are reported as errors.
    fn union(&self, a: &Polygon<f64>, b: &Polygon<f64>) -> Result<Polygon<f64>, UnionError>;
}

/// `geo`-backed kernel on planar coordinates.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanarKernel;

impl GeometryKernel for PlanarKernel {
    #[inline]
    fn area(&self, polygon: &Polygon<f64>) -> f64 { polygon.unsigned_area() }

    #[inline]
    fn simplify(&self, polygon: &Polygon<f64>, tolerance: f64) -> Polygon<f64> {
        polygon.simplify(&tolerance)
    }

    fn union(&self, a: &Polygon<f64>, b: &Polygon<f64>) -> Result<Polygon<f64>, UnionError> {
        let MultiPolygon(mut parts) = catch_quietly(|| a.union(b))?;

        match (parts.pop(), parts.len()) {
            (Some(polygon), 0) => Ok(polygon),
            (Some(_), rest) => Err(UnionError::Disconnected { parts: rest + 1 }),
            (None, _) => Err(UnionError::Empty),
        }
    }
}

thread_local! {
    static QUIET: Cell<bool> = const { Cell::new(false) };
}

static QUIET_HOOK: Once = Once::new();

/// Run `f`, turning a panic into `UnionError::Panicked`.
///
/// The panic hook is wrapped once so that panics caught here are not printed;
/// panics on other threads, or outside this call, still reach the previous hook.
fn catch_quietly<R>(f: impl FnOnce() -> R) -> Result<R, UnionError> {
    QUIET_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !QUIET.with(Cell::get) { previous(info) }
        }));
    });

    QUIET.with(|quiet| quiet.set(true));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    QUIET.with(|quiet| quiet.set(false));

    result.map_err(|payload| UnionError::Panicked(panic_message(payload.as_ref())))
}

/// Best-effort text of a caught panic payload.
fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload.downcast_ref::<&str>().map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
