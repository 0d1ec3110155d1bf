//! Mapping of fine classification codes to the coarse categories polygons are
//! merged by.
//!
//! Vegetation codes are six digits: the leading one or two digits (`code / 10000`)
//! name the vegetation class, which is grouped into a physiognomic category.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A coarse category code attached to every polygon.
pub type Category = i64;

/// Open water, exempt from the class table.
const OPEN_WATER_CODE: i64 = 580600;
const OPEN_WATER: Category = 11;

/// Paddy fields, split out of their class when `paddy_field` is enabled.
const PADDY_FIELD_CODE: i64 = 570400;
const PADDY_FIELD: Category = 19;

/// Half-open vegetation class ranges `[start, end)` and their category,
/// sorted and non-overlapping.
const VEGETATION_CLASSES: [(i64, i64, Category); 11] = [
    (0, 1, 0), // unknown (9999)
    (1, 4, 1),
    (4, 8, 2),
    (8, 11, 3),
    (11, 22, 4),
    (22, 27, 5),
    (27, 40, 6),
    (40, 47, 7),
    (47, 54, 8),
    (54, 58, 9),
    (58, 59, 10),
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CategoryError {
    /// The code's vegetation class is not covered by the table.
    #[error("classification code {code} (class {class}) has no category")]
    UnknownCategory { code: i64, class: i64 },
}

/// How classification codes are reduced to categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CategoryMode {
    /// `code / 100`.
    Hundred,
    /// Vegetation class table with the open-water override, plus the
    /// paddy-field override when `paddy_field` is set.
    Vegetation { paddy_field: bool },
}

impl CategoryMode {
    /// Map a classification code to its category.
    pub fn classify(self, code: i64) -> Result<Category, CategoryError> {
        match self {
            Self::Hundred => Ok(code.div_euclid(100)),
            Self::Vegetation { paddy_field } => {
                if code == OPEN_WATER_CODE { return Ok(OPEN_WATER) }
                if paddy_field && code == PADDY_FIELD_CODE { return Ok(PADDY_FIELD) }
                vegetation_category(code)
            }
        }
    }
}

/// Look up the category of `code`'s vegetation class.
fn vegetation_category(code: i64) -> Result<Category, CategoryError> {
    let class = code.div_euclid(10_000);
    let pos = VEGETATION_CLASSES.partition_point(|&(_, end, _)| end <= class);

    match VEGETATION_CLASSES.get(pos) {
        Some(&(start, _, category)) if start <= class => Ok(category),
        _ => Err(CategoryError::UnknownCategory { code, class }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VEGETATION: CategoryMode = CategoryMode::Vegetation { paddy_field: true };

    #[test]
    fn table_is_sorted_and_contiguous() {
        assert_eq!(VEGETATION_CLASSES[0].0, 0);
        for pair in VEGETATION_CLASSES.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
        assert_eq!(VEGETATION_CLASSES.last().map(|r| r.1), Some(59));
    }

    #[test]
    fn hundred_mode_floors() {
        assert_eq!(CategoryMode::Hundred.classify(42301), Ok(423));
        assert_eq!(CategoryMode::Hundred.classify(99), Ok(0));
        assert_eq!(CategoryMode::Hundred.classify(-1), Ok(-1));
    }

    #[test]
    fn vegetation_classes_map_through_ranges() {
        assert_eq!(VEGETATION.classify(9999), Ok(0));
        assert_eq!(VEGETATION.classify(10100), Ok(1));
        assert_eq!(VEGETATION.classify(42301), Ok(2));
        assert_eq!(VEGETATION.classify(110000), Ok(4));
        assert_eq!(VEGETATION.classify(152301), Ok(4));
        assert_eq!(VEGETATION.classify(219999), Ok(4));
        assert_eq!(VEGETATION.classify(220000), Ok(5));
        assert_eq!(VEGETATION.classify(580100), Ok(10));
    }

    #[test]
    fn open_water_override() {
        assert_eq!(VEGETATION.classify(580600), Ok(11));
        assert_eq!(CategoryMode::Vegetation { paddy_field: false }.classify(580600), Ok(11));
    }

    #[test]
    fn paddy_field_override_is_optional() {
        assert_eq!(VEGETATION.classify(570400), Ok(19));
        assert_eq!(CategoryMode::Vegetation { paddy_field: false }.classify(570400), Ok(9));
    }

    #[test]
    fn classes_outside_table_are_unknown() {
        assert_eq!(
            VEGETATION.classify(590000),
            Err(CategoryError::UnknownCategory { code: 590000, class: 59 })
        );
        assert!(VEGETATION.classify(999999).is_err());
        assert!(VEGETATION.classify(-5).is_err());
    }

    #[test]
    fn mode_round_trips_through_json() {
        let json = serde_json::to_string(&VEGETATION).unwrap();
        assert_eq!(json, r#"{"kind":"vegetation","paddy_field":true}"#);
        assert_eq!(serde_json::from_str::<CategoryMode>(r#"{"kind":"hundred"}"#).unwrap(), CategoryMode::Hundred);
    }
}
