use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::config::DietProfiles;
use crate::error::{PlannerError, Result};
use crate::models::{MealPlan, ScheduledMeal};
use crate::state::RecipeBook;

fn check_people(plan: &MealPlan, profiles: &DietProfiles, problems: &mut Vec<String>) {
    let unknown: BTreeSet<&str> = plan
        .scheduled_meals
        .iter()
        .flat_map(|meal| meal.eating_dates_per_person.keys())
        .map(String::as_str)
        .filter(|person| profiles.profile_of(person).is_none())
        .collect();
    if unknown.is_empty() {
        return;
    }

    let known: Vec<&str> = profiles.people().collect();
    problems.push(format!(
        "Unknown people: {} (diet profiles exist for: {})",
        unknown.into_iter().collect::<Vec<_>>().join(", "),
        if known.is_empty() { "nobody".to_string() } else { known.join(", ") }
    ));
}

fn check_recipe(label: &str, meal: &ScheduledMeal, book: &RecipeBook, problems: &mut Vec<String>) {
    if book.get_recipe(&meal.meal_id).is_some() {
        return;
    }
    let mut problem = format!("{label}: recipe '{}' not found", meal.meal_id);
    if let Some(suggestion) = book.closest_recipe_id(&meal.meal_id) {
        problem.push_str(&format!(" (did you mean '{suggestion}'?)"));
    }
    problems.push(problem);
}

fn check_meal(label: &str, meal: &ScheduledMeal, problems: &mut Vec<String>) {
    let Some(first_cooking) = meal.cooking_dates.iter().min().copied() else {
        problems.push(format!("{label}: no cooking dates"));
        return;
    };

    if meal.eating_dates_per_person.is_empty() {
        problems.push(format!("{label}: nobody eats this meal"));
    }

    let cooking: BTreeSet<_> = meal.cooking_dates.iter().copied().collect();
    for (person, dates) in &meal.eating_dates_per_person {
        if dates.is_empty() {
            problems.push(format!("{label}: {person} has no eating dates"));
        }
        for date in dates {
            if meal.is_meal_prep() {
                if *date < first_cooking {
                    problems.push(format!(
                        "{label}: {person} eats on {date}, before it is cooked on {first_cooking}"
                    ));
                }
            } else if !cooking.contains(date) {
                problems.push(format!(
                    "{label}: {person} eats on {date}, which is not a cooking date"
                ));
            }
        }
    }
}

/// Checks a meal plan against the recipe book and the diet profiles.
///
/// Collects every problem before failing, so one run reports them all.
pub fn validate_meal_plan(
    plan: &MealPlan,
    book: &RecipeBook,
    profiles: &DietProfiles,
) -> Result<()> {
    let mut problems = Vec::new();
    let mut seen_ids = BTreeSet::new();

    check_people(plan, profiles, &mut problems);

    for (idx, meal) in plan.scheduled_meals.iter().enumerate() {
        let label = format!("Meal {} ({})", idx + 1, meal.meal_id);
        if !seen_ids.insert(meal.id.as_str()) {
            problems.push(format!("{label}: duplicate scheduled meal id '{}'", meal.id));
        }
        check_recipe(&label, meal, book, &mut problems);
        check_meal(&label, meal, &mut problems);
    }

    let mut bought_on: BTreeMap<&str, usize> = BTreeMap::new();
    for (idx, trip) in plan.shopping_trips.iter().enumerate() {
        let label = format!("Shopping trip {} ({})", idx + 1, trip.shopping_date);
        for id in &trip.scheduled_meal_ids {
            if !seen_ids.contains(id.as_str()) {
                problems.push(format!("{label}: unknown scheduled meal '{id}'"));
                continue;
            }
            match bought_on.get(id.as_str()) {
                Some(&first) if first != idx + 1 => problems.push(format!(
                    "{label}: scheduled meal '{id}' is already bought on trip {first}"
                )),
                Some(_) => {}
                None => {
                    bought_on.insert(id.as_str(), idx + 1);
                }
            }
        }
    }

    if problems.is_empty() {
        debug!(meals = plan.scheduled_meals.len(), "meal plan is valid");
        Ok(())
    } else {
        Err(PlannerError::Validation(problems))
    }
}
