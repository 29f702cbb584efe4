use std::collections::BTreeSet;

use tracing::info;

use crate::config::WarningLimits;
use crate::models::{ExpandedPlan, MealSuggestion, RoundingWarning};
use crate::planner::rounding::{RoundedIngredient, RoundingOutcome};

/// One meal's use of a rounded ingredient.
#[derive(Debug, Clone, Copy)]
struct MealUsage {
    portions: u32,
    per_portion: f64,
}

/// Relative error of rounding `quantity` to the nearest package multiple.
///
/// Unlike the shopping rounding there is no one-package floor here.
fn rounding_error(quantity: f64, unit_size: f64) -> Option<f64> {
    (quantity > 0.0).then(|| {
        let rounded = (quantity / unit_size).round() * unit_size;
        (rounded - quantity).abs() / quantity
    })
}

fn smallest_increase<F>(max: u32, tolerance: f64, unit_size: f64, total_for: F) -> u32
where
    F: Fn(u32) -> f64,
{
    (1..=max)
        .find(|&extra| {
            rounding_error(total_for(extra), unit_size).is_some_and(|err| err <= tolerance)
        })
        .unwrap_or(0)
}

fn warning_for(
    rounded: &RoundedIngredient,
    plan: &ExpandedPlan,
    meals_in_scope: &BTreeSet<String>,
    limits: &WarningLimits,
) -> Option<RoundingWarning> {
    let change = rounded.relative_change()?;
    if change <= limits.change_threshold {
        return None;
    }

    let unit_size = rounded.unit_size;
    let mut usages = Vec::new();
    let mut meals = Vec::new();

    for meal in plan.meals.iter().filter(|m| meals_in_scope.contains(&m.id)) {
        let Some(ingredient) = meal.ingredient(&rounded.name) else {
            continue;
        };

        let portions = meal.total_portions();
        let per_portion = if portions > 0 {
            ingredient.quantity() / portions as f64
        } else {
            ingredient.quantity()
        };
        usages.push(MealUsage { portions, per_portion });

        let suggested = smallest_increase(
            limits.max_meal_increase,
            limits.meal_tolerance,
            unit_size,
            |extra| (portions + extra) as f64 * per_portion,
        );
        if suggested <= limits.max_practical_increase {
            meals.push(MealSuggestion {
                meal_name: meal.name.clone(),
                current_portions: portions,
                suggested_additional_portions: suggested,
            });
        }
    }

    let combined_increase = smallest_increase(
        limits.max_combined_increase,
        limits.change_threshold,
        unit_size,
        |extra| {
            usages
                .iter()
                .map(|u| (u.portions + extra) as f64 * u.per_portion)
                .sum()
        },
    );

    info!(
        ingredient = %rounded.name,
        original = rounded.original,
        rounded = rounded.rounded,
        change,
        "rounding changes ingredient heavily"
    );

    Some(RoundingWarning {
        ingredient_name: rounded.name.clone(),
        original_quantity: rounded.original,
        rounded_quantity: rounded.rounded,
        percent_change: change,
        unit_size,
        meals,
        combined_increase,
    })
}

/// Warn about every ingredient whose plan-wide total rounding changes by more
/// than `limits.change_threshold`, with portion suggestions that would soften it.
///
/// `plan` must be the plan as expanded, before any rounding was written back.
pub fn generate_rounding_warnings(
    outcome: &RoundingOutcome,
    plan: &ExpandedPlan,
    meals_in_scope: &BTreeSet<String>,
    limits: &WarningLimits,
) -> Vec<RoundingWarning> {
    outcome
        .ingredients
        .values()
        .filter_map(|rounded| warning_for(rounded, plan, meals_in_scope, limits))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpandedIngredient, ExpandedMeal};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, n).unwrap()
    }

    fn meal(
        id: &str,
        name: &str,
        ingredient: &str,
        per_portion: f64,
        portions: u32,
    ) -> ExpandedMeal {
        let dates: Vec<NaiveDate> = (1..=portions).map(day).collect();
        let mut ing = ExpandedIngredient::new(ingredient, "g", "pantry");
        ing.set_person("John", per_portion * portions as f64, portions);
        ExpandedMeal {
            id: id.to_string(),
            meal_id: id.to_string(),
            name: name.to_string(),
            cooking_dates: vec![day(1)],
            eating_dates_per_person: [("John".to_string(), dates)].into_iter().collect(),
            meal_type: "dinner".to_string(),
            assigned_cook: "John".to_string(),
            ingredients: vec![ing],
            prep_tasks: vec![],
            steps: vec![],
            suggested_seasonings: None,
            notes: None,
        }
    }

    fn outcome(name: &str, original: f64, rounded: f64, unit_size: f64) -> RoundingOutcome {
        let mut ingredients = BTreeMap::new();
        ingredients.insert(
            name.to_string(),
            RoundedIngredient {
                name: name.to_string(),
                unit: "g".to_string(),
                original,
                rounded,
                unit_size,
            },
        );
        RoundingOutcome {
            ingredients,
            calorie_deltas: BTreeMap::new(),
        }
    }

    fn scope(plan: &ExpandedPlan) -> BTreeSet<String> {
        plan.meals.iter().map(|m| m.id.clone()).collect()
    }

    #[test]
    fn test_heavy_rounding_warns() {
        let plan = ExpandedPlan {
            meals: vec![meal("sm_1", "Pudding", "pudding", 25.0, 1)],
            shopping_trips: vec![],
        };
        let warnings = generate_rounding_warnings(
            &outcome("pudding", 25.0, 40.0, 40.0),
            &plan,
            &scope(&plan),
            &WarningLimits::default(),
        );

        assert_eq!(warnings.len(), 1);
        let warning = &warnings[0];
        assert!(warning.percent_change > 0.5);
        assert_eq!(warning.meals.len(), 1);
        assert_eq!(warning.meals[0].current_portions, 1);
        // 2 × 25 = 50 rounds to 40, 20% off
        assert_eq!(warning.meals[0].suggested_additional_portions, 1);
        assert_eq!(warning.combined_increase, 1);
    }

    #[test]
    fn test_moderate_rounding_is_silent() {
        let plan = ExpandedPlan {
            meals: vec![meal("sm_1", "Pudding", "pudding", 30.0, 1)],
            shopping_trips: vec![],
        };
        let warnings = generate_rounding_warnings(
            &outcome("pudding", 30.0, 40.0, 40.0),
            &plan,
            &scope(&plan),
            &WarningLimits::default(),
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_zero_original_never_warns() {
        let plan = ExpandedPlan {
            meals: vec![],
            shopping_trips: vec![],
        };
        let warnings = generate_rounding_warnings(
            &outcome("pudding", 0.0, 40.0, 40.0),
            &plan,
            &BTreeSet::new(),
            &WarningLimits::default(),
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_impractical_suggestions_are_dropped() {
        // 10 g per portion against 1000 g packs: no increase within 9 helps,
        // so the meal stays with a 0 suggestion.
        let plan = ExpandedPlan {
            meals: vec![meal("sm_1", "Milk Soup", "milk", 10.0, 1)],
            shopping_trips: vec![],
        };
        let limits = WarningLimits::default();
        let rounded = outcome("milk", 10.0, 1000.0, 1000.0);
        let warnings = generate_rounding_warnings(&rounded, &plan, &scope(&plan), &limits);
        assert_eq!(warnings[0].meals[0].suggested_additional_portions, 0);
        assert_eq!(warnings[0].combined_increase, 0);

        // 100 g per portion: 1 + 7 portions = 800 g, the first within 30% of 1000.
        let plan = ExpandedPlan {
            meals: vec![meal("sm_1", "Milk Soup", "milk", 100.0, 1)],
            shopping_trips: vec![],
        };
        let rounded = outcome("milk", 100.0, 1000.0, 1000.0);
        let warnings = generate_rounding_warnings(&rounded, &plan, &scope(&plan), &limits);
        assert!(warnings[0].meals.is_empty());

        let relaxed = WarningLimits {
            max_practical_increase: 9,
            ..limits
        };
        let warnings = generate_rounding_warnings(&rounded, &plan, &scope(&plan), &relaxed);
        assert_eq!(warnings[0].meals[0].suggested_additional_portions, 7);
    }

    #[test]
    fn test_combined_increase_spans_every_meal() {
        // Two meals at 10 g per portion against 100 g packs: 20 g rounds up to 100 g.
        // Adding k portions to both gives 20 (1 + k) g; k = 3 reaches 80 g, 20% off.
        let plan = ExpandedPlan {
            meals: vec![
                meal("sm_1", "Pudding", "pudding", 10.0, 1),
                meal("sm_2", "Pudding Bowl", "pudding", 10.0, 1),
            ],
            shopping_trips: vec![],
        };
        let warnings = generate_rounding_warnings(
            &outcome("pudding", 20.0, 100.0, 100.0),
            &plan,
            &scope(&plan),
            &WarningLimits::default(),
        );

        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].combined_increase, 3);
        // Alone, each meal needs 7 more portions: past the practical cap.
        assert!(warnings[0].meals.is_empty());

        let relaxed = WarningLimits {
            max_practical_increase: 9,
            ..WarningLimits::default()
        };
        let warnings = generate_rounding_warnings(
            &outcome("pudding", 20.0, 100.0, 100.0),
            &plan,
            &scope(&plan),
            &relaxed,
        );
        let suggested: Vec<u32> = warnings[0]
            .meals
            .iter()
            .map(|m| m.suggested_additional_portions)
            .collect();
        assert_eq!(suggested, vec![7, 7]);
    }

    #[test]
    fn test_combined_increase_without_solution() {
        // 2 (1 + k) g never gets near a 1000 g pack within 5 extra portions.
        let plan = ExpandedPlan {
            meals: vec![
                meal("sm_1", "Pudding", "pudding", 1.0, 1),
                meal("sm_2", "Pudding Bowl", "pudding", 1.0, 1),
            ],
            shopping_trips: vec![],
        };
        let warnings = generate_rounding_warnings(
            &outcome("pudding", 2.0, 1000.0, 1000.0),
            &plan,
            &scope(&plan),
            &WarningLimits::default(),
        );

        assert_eq!(warnings[0].combined_increase, 0);
        assert_eq!(warnings[0].meals.len(), 2);
        assert!(warnings[0].meals.iter().all(|m| m.suggested_additional_portions == 0));
    }

    #[test]
    fn test_meals_outside_trips_are_ignored() {
        let plan = ExpandedPlan {
            meals: vec![
                meal("sm_1", "Pudding", "pudding", 25.0, 1),
                meal("sm_2", "Late Pudding", "pudding", 25.0, 1),
            ],
            shopping_trips: vec![],
        };
        let only_first: BTreeSet<String> = ["sm_1".to_string()].into_iter().collect();
        let warnings = generate_rounding_warnings(
            &outcome("pudding", 25.0, 40.0, 40.0),
            &plan,
            &only_first,
            &WarningLimits::default(),
        );
        assert_eq!(warnings[0].meals.len(), 1);
        assert_eq!(warnings[0].meals[0].meal_name, "Pudding");
    }
}
