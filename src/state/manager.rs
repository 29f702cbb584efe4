use std::collections::HashMap;

use strsim::jaro_winkler;

use crate::error::{PlannerError, Result};
use crate::models::{Catalog, MealsDatabase, Recipe};

/// Minimum similarity for a "did you mean" suggestion.
const SUGGESTION_MIN_SIMILARITY: f64 = 0.8;

/// Read-only access to recipes and the ingredient catalog.
pub struct RecipeBook {
    /// Recipes keyed by recipe id.
    recipes: HashMap<String, Recipe>,
    catalog: Catalog,
}

impl RecipeBook {
    /// Build a recipe book from a meals database.
    ///
    /// Duplicate recipe ids: last occurrence wins.
    pub fn new(database: MealsDatabase) -> Self {
        let mut recipes = HashMap::new();
        for recipe in database.meals {
            recipes.insert(recipe.meal_id.clone(), recipe);
        }
        Self {
            recipes,
            catalog: database.ingredient_details,
        }
    }

    /// Get a recipe by id.
    pub fn get_recipe(&self, id: &str) -> Option<&Recipe> {
        self.recipes.get(id)
    }

    /// Get a recipe by id, failing with a suggestion for near misses.
    pub fn recipe(&self, id: &str) -> Result<&Recipe> {
        self.get_recipe(id)
            .ok_or_else(|| PlannerError::RecipeNotFound {
                id: id.to_string(),
                suggestion: self.closest_recipe_id(id),
            })
    }

    /// Closest known recipe id by Jaro-Winkler similarity.
    pub fn closest_recipe_id(&self, id: &str) -> Option<String> {
        let needle = id.to_lowercase();
        self.recipes
            .keys()
            .map(|candidate| (candidate, jaro_winkler(&candidate.to_lowercase(), &needle)))
            .filter(|(_, score)| *score >= SUGGESTION_MIN_SIMILARITY)
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(candidate, _)| candidate.clone())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Recipe ingredients that have no catalog entry, sorted and deduplicated.
    pub fn uncatalogued_ingredients(&self) -> Vec<&str> {
        let mut missing: Vec<&str> = self
            .recipes
            .values()
            .flat_map(|r| r.ingredients.iter())
            .map(|i| i.name.as_str())
            .filter(|name| !self.catalog.contains_key(*name))
            .collect();
        missing.sort_unstable();
        missing.dedup();
        missing
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}
