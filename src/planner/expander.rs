use tracing::debug;

use crate::config::DietProfiles;
use crate::error::Result;
use crate::models::{
    ExpandedIngredient, ExpandedMeal, ExpandedPlan, MealPlan, PrepStep, Recipe, ScheduledMeal,
};
use crate::state::RecipeBook;

/// Expand one scheduled meal against its recipe.
///
/// Each person with portions gets
/// `round(base_quantity * serving_multiplier(profile) * portions)`; the
/// ingredient total is the sum of those per-person quantities.
pub fn expand_meal(
    scheduled: &ScheduledMeal,
    recipe: &Recipe,
    profiles: &DietProfiles,
) -> Result<ExpandedMeal> {
    // Every listed person must be known, even with zero portions.
    let mut eaters = Vec::with_capacity(scheduled.eating_dates_per_person.len());
    for (person, dates) in &scheduled.eating_dates_per_person {
        let profile = profiles.require(person, &recipe.name)?;
        if !dates.is_empty() {
            eaters.push((person.as_str(), profile, dates.len() as u32));
        }
    }

    let ingredients = recipe
        .ingredients
        .iter()
        .map(|base| {
            let mut ingredient = ExpandedIngredient::new(&base.name, &base.unit, &base.category)
                .with_notes(base.notes.clone());

            for &(person, profile, portions) in &eaters {
                let multiplier = recipe.serving_multiplier(base, profile);
                // halves round away from zero: 0.5 g becomes 1 g
                let quantity = (base.quantity * multiplier * portions as f64).round();
                ingredient.set_person(person, quantity, portions);
            }

            ingredient
        })
        .collect();

    let prep_assignee = scheduled
        .prep_assigned_to
        .clone()
        .unwrap_or_else(|| scheduled.assigned_cook.clone());

    let prep_tasks = recipe
        .prep_tasks
        .iter()
        .map(|step| PrepStep {
            assigned_to: Some(step.assigned_to.clone().unwrap_or_else(|| prep_assignee.clone())),
            ..step.clone()
        })
        .collect();

    let mut cooking_dates = scheduled.cooking_dates.clone();
    cooking_dates.sort();

    Ok(ExpandedMeal {
        id: scheduled.id.clone(),
        meal_id: scheduled.meal_id.clone(),
        name: recipe.name.clone(),
        cooking_dates,
        eating_dates_per_person: scheduled.eating_dates_per_person.clone(),
        meal_type: scheduled.meal_type.clone(),
        assigned_cook: scheduled.assigned_cook.clone(),
        ingredients,
        prep_tasks,
        steps: recipe.steps.clone(),
        suggested_seasonings: recipe.suggested_seasonings.clone(),
        notes: recipe.notes.clone(),
    })
}

/// Expand every scheduled meal of a plan.
///
/// Fails on the first unknown recipe or unknown person; no partial result.
pub fn expand_meal_plan(
    plan: &MealPlan,
    book: &RecipeBook,
    profiles: &DietProfiles,
) -> Result<ExpandedPlan> {
    let meals = plan
        .scheduled_meals
        .iter()
        .map(|scheduled| {
            let recipe = book.recipe(&scheduled.meal_id)?;
            expand_meal(scheduled, recipe, profiles)
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(meals = meals.len(), "expanded meal plan");

    Ok(ExpandedPlan {
        meals,
        shopping_trips: plan.shopping_trips.clone(),
    })
}
