mod config;
pub(crate) mod decision;
mod feature;
mod pipeline;
mod working_set;

pub use config::{ConfigError, Profile, TrimConfig};
pub(crate) use feature::explode;
pub use feature::{Shape, SourceFeature, TrimmedPolygon};
pub use pipeline::{TrimOutput, TrimStats, Trimmer};
pub(crate) use working_set::WorkingSet;
