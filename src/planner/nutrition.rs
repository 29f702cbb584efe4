use std::collections::BTreeMap;
use std::ops::AddAssign;

use serde::Serialize;

use crate::config::DietProfiles;
use crate::error::{PlannerError, Result};
use crate::models::{Catalog, ExpandedMeal, ExpandedPlan, IngredientDetails};

/// Nutrition totals for one diet profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NutritionTotals {
    pub calories: f64,
    pub fat: f64,
    pub protein: f64,
    pub carbs: f64,
}

impl NutritionTotals {
    fn of(details: &IngredientDetails, quantity: f64) -> Self {
        let per_100 = quantity / 100.0;
        Self {
            calories: details.calories_per_100 * per_100,
            fat: details.fat_per_100 * per_100,
            protein: details.protein_per_100 * per_100,
            carbs: details.carbs_per_100 * per_100,
        }
    }
}

impl AddAssign for NutritionTotals {
    fn add_assign(&mut self, other: Self) {
        self.calories += other.calories;
        self.fat += other.fat;
        self.protein += other.protein;
        self.carbs += other.carbs;
    }
}

/// Diet profile → totals.
pub type ProfileNutrition = BTreeMap<String, NutritionTotals>;

fn accumulate(
    totals: &mut ProfileNutrition,
    meal: &ExpandedMeal,
    catalog: &Catalog,
    profiles: &DietProfiles,
) -> Result<()> {
    for ingredient in &meal.ingredients {
        let details = catalog
            .get(&ingredient.name)
            .ok_or_else(|| PlannerError::CatalogEntryMissing(ingredient.name.clone()))?;

        for (person, portion) in ingredient.per_person() {
            let profile = profiles.require(person, &meal.name)?;
            *totals.entry(profile.to_string()).or_default() +=
                NutritionTotals::of(details, portion.quantity);
        }
    }
    Ok(())
}

/// Nutrition of one meal, summed per diet profile.
pub fn meal_nutrition(
    meal: &ExpandedMeal,
    catalog: &Catalog,
    profiles: &DietProfiles,
) -> Result<ProfileNutrition> {
    let mut totals = ProfileNutrition::new();
    accumulate(&mut totals, meal, catalog, profiles)?;
    Ok(totals)
}

/// Nutrition of one scheduled meal per diet profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealNutrition {
    /// Scheduled meal id.
    pub id: String,
    pub name: String,
    pub per_profile: ProfileNutrition,
}

/// Nutrition of each scheduled meal, in plan order.
pub fn nutrition_by_meal(
    plan: &ExpandedPlan,
    catalog: &Catalog,
    profiles: &DietProfiles,
) -> Result<Vec<MealNutrition>> {
    plan.meals
        .iter()
        .map(|meal| {
            Ok(MealNutrition {
                id: meal.id.clone(),
                name: meal.name.clone(),
                per_profile: meal_nutrition(meal, catalog, profiles)?,
            })
        })
        .collect()
}

/// Nutrition of every meal in the plan, summed per diet profile.
pub fn plan_nutrition(
    plan: &ExpandedPlan,
    catalog: &Catalog,
    profiles: &DietProfiles,
) -> Result<ProfileNutrition> {
    let mut totals = ProfileNutrition::new();
    for meal in &plan.meals {
        accumulate(&mut totals, meal, catalog, profiles)?;
    }
    Ok(totals)
}
