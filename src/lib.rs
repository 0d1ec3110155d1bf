#![doc = "Polytrim: consolidation of undersized and sliver land-cover polygons"]
mod category;
mod common;
mod geom;
mod graph;
mod io;
mod trim;

#[doc(inline)]
pub use category::{Category, CategoryError, CategoryMode};

#[doc(inline)]
pub use common::fs::{ensure_dir_exists, output_path};

#[doc(inline)]
pub use geom::{GeometryKernel, PlanarKernel, UnionError};

#[doc(inline)]
pub use io::{polygon_to_geojson, read_feature_collection, trim_file, write_feature_collection, FeatureCollection, FeatureError};

#[doc(inline)]
pub use trim::{ConfigError, Profile, Shape, SourceFeature, TrimConfig, TrimOutput, TrimStats, TrimmedPolygon, Trimmer};
