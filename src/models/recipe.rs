use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::catalog::Catalog;

/// Serving multiplier used when a diet profile is missing from every map.
pub const DEFAULT_SERVING_MULTIPLIER: f64 = 1.0;

/// One ingredient line of a recipe, sized for a single base portion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub category: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Per-profile multipliers that win over the recipe-level ones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_servings_override: Option<BTreeMap<String, f64>>,
}

/// A preparation step done some days before cooking (soaking, marinating...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepStep {
    pub description: String,
    pub days_before: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub meal_id: String,
    pub name: String,

    /// Diet profile → portion multiplier.
    #[serde(default)]
    pub base_servings: BTreeMap<String, f64>,

    pub ingredients: Vec<RecipeIngredient>,

    #[serde(default)]
    pub prep_tasks: Vec<PrepStep>,

    #[serde(default)]
    pub steps: Vec<String>,

    /// Comma-separated list, e.g. "salt, pepper, basil".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_seasonings: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Recipe {
    /// Multiplier for `ingredient` under `profile`.
    ///
    /// Ingredient override first, then recipe default, then 1.0.
    pub fn serving_multiplier(&self, ingredient: &RecipeIngredient, profile: &str) -> f64 {
        ingredient
            .base_servings_override
            .as_ref()
            .and_then(|overrides| overrides.get(profile))
            .or_else(|| self.base_servings.get(profile))
            .copied()
            .unwrap_or(DEFAULT_SERVING_MULTIPLIER)
    }
}

/// Split a comma-separated seasoning list into trimmed, non-empty names.
pub(crate) fn split_seasonings(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// The recipe collection together with its ingredient catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MealsDatabase {
    pub meals: Vec<Recipe>,

    #[serde(default)]
    pub ingredient_details: Catalog,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe() -> Recipe {
        let mut base_servings = BTreeMap::new();
        base_servings.insert("high_calorie".to_string(), 1.67);
        base_servings.insert("low_calorie".to_string(), 1.0);

        let mut overrides = BTreeMap::new();
        overrides.insert("high_calorie".to_string(), 2.0);

        Recipe {
            meal_id: "spaghetti".to_string(),
            name: "Spaghetti".to_string(),
            base_servings,
            ingredients: vec![
                RecipeIngredient {
                    name: "spaghetti".to_string(),
                    quantity: 100.0,
                    unit: "g".to_string(),
                    category: "pantry".to_string(),
                    notes: None,
                    base_servings_override: None,
                },
                RecipeIngredient {
                    name: "bacon".to_string(),
                    quantity: 50.0,
                    unit: "g".to_string(),
                    category: "meat".to_string(),
                    notes: None,
                    base_servings_override: Some(overrides),
                },
            ],
            prep_tasks: vec![],
            steps: vec![],
            suggested_seasonings: Some("salt, pepper , ,basil".to_string()),
            notes: None,
        }
    }

    #[test]
    fn test_serving_multiplier_prefers_override() {
        let r = recipe();
        assert_eq!(r.serving_multiplier(&r.ingredients[1], "high_calorie"), 2.0);
        assert_eq!(r.serving_multiplier(&r.ingredients[1], "low_calorie"), 1.0);
        assert_eq!(r.serving_multiplier(&r.ingredients[0], "high_calorie"), 1.67);
    }

    #[test]
    fn test_serving_multiplier_defaults_to_one() {
        let r = recipe();
        assert_eq!(r.serving_multiplier(&r.ingredients[0], "athlete"), 1.0);
    }

    #[test]
    fn test_seasonings_are_trimmed() {
        let recipe = recipe();
        let seasonings = split_seasonings(recipe.suggested_seasonings.as_deref());
        assert_eq!(seasonings, vec!["salt", "pepper", "basil"]);
        assert!(split_seasonings(None).is_empty());
    }
}
