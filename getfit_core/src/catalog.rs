//! Category table: which subcategories belong to which exercise category.
//!
//! Fresh entries are validated against the subcategory set of their declared
//! category. Persisted data is matched by name against every category's set,
//! through a lookup index that is built once and reused.

use crate::types::{ExerciseCategory, ExerciseSubCategory};
use once_cell::sync::Lazy;
use std::collections::HashMap;

const STRENGTH_SUBCATEGORIES: &[ExerciseSubCategory] = &[
    ExerciseSubCategory::Push,
    ExerciseSubCategory::Pull,
    ExerciseSubCategory::Legs,
];

const ENDURANCE_SUBCATEGORIES: &[ExerciseSubCategory] = &[
    ExerciseSubCategory::Short,
    ExerciseSubCategory::Long,
    ExerciseSubCategory::HighIntensity,
    ExerciseSubCategory::LowIntensity,
];

/// Upper-cased subcategory name -> subcategory, across all categories
static SUBCATEGORY_INDEX: Lazy<HashMap<&'static str, ExerciseSubCategory>> =
    Lazy::new(build_subcategory_index);

/// The closed set of subcategories allowed under a category
pub fn subcategories(category: ExerciseCategory) -> &'static [ExerciseSubCategory] {
    match category {
        ExerciseCategory::Strength => STRENGTH_SUBCATEGORIES,
        ExerciseCategory::Running | ExerciseCategory::Cycling | ExerciseCategory::Swimming => {
            ENDURANCE_SUBCATEGORIES
        }
    }
}

/// Check whether `sub` is a valid subcategory of `category`
pub fn is_member(category: ExerciseCategory, sub: ExerciseSubCategory) -> bool {
    subcategories(category).contains(&sub)
}

/// Find a subcategory by name in any category's set (case-insensitive)
pub fn lookup_subcategory(name: &str) -> Option<ExerciseSubCategory> {
    let key = name.trim().to_ascii_uppercase();
    SUBCATEGORY_INDEX.get(key.as_str()).copied()
}

fn build_subcategory_index() -> HashMap<&'static str, ExerciseSubCategory> {
    let mut index = HashMap::new();
    for category in ExerciseCategory::ALL {
        for sub in subcategories(category) {
            index.insert(sub.as_str(), *sub);
        }
    }
    tracing::debug!("Built subcategory index with {} names", index.len());
    index
}
