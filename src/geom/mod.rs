mod kernel;
mod shape;

pub use kernel::{GeometryKernel, PlanarKernel, UnionError};
pub(crate) use shape::{remove_small_holes, ring_length, rings, segment_length, thinness};
