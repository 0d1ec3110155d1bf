use geo::{MultiPolygon, Polygon};

use crate::category::{Category, CategoryError, CategoryMode};

/// Areal geometry of an input feature.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
}

impl Shape {
    /// Split into single polygons.
    pub fn into_polygons(self) -> Vec<Polygon<f64>> {
        match self {
            Self::Polygon(polygon) => vec![polygon],
            Self::MultiPolygon(MultiPolygon(polygons)) => polygons,
        }
    }
}

/// An input feature: a classification code and its geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFeature {
    pub code: i64,
    pub shape: Shape,
}

/// A surviving polygon and the category it is written with.
#[derive(Debug, Clone, PartialEq)]
pub struct TrimmedPolygon {
    pub category: Category,
    pub polygon: Polygon<f64>,
}

/// Classify every feature and split multipolygons, so that each member
/// polygon carries its feature's category.
pub fn explode(features: Vec<SourceFeature>, mode: CategoryMode) -> Result<Vec<(Category, Polygon<f64>)>, CategoryError> {
    let mut polygons = Vec::with_capacity(features.len());
    for feature in features {
        let category = mode.classify(feature.code)?;
        polygons.extend(feature.shape.into_polygons().into_iter().map(|p| (category, p)));
    }
    Ok(polygons)
}
