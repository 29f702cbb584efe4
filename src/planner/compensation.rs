use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::DietProfiles;
use crate::models::ExpandedPlan;
use crate::planner::aggregator::PlanAggregate;
use crate::planner::constants::COMPENSATION_EPSILON_KCAL;

/// What calorie compensation did per diet profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompensationReport {
    /// Profile → factor applied to its adjustable ingredients.
    pub factors: BTreeMap<String, f64>,
    /// Profile → calories that adjustable ingredients could not absorb.
    pub unresolved: BTreeMap<String, f64>,
    /// True when every delta was negligible and nothing was touched.
    pub skipped: bool,
}

/// Calories each diet profile gets from adjustable, unpackaged ingredients.
pub fn adjustable_calories(
    aggregate: &PlanAggregate,
    profiles: &DietProfiles,
) -> BTreeMap<String, f64> {
    let mut calories: BTreeMap<String, f64> = BTreeMap::new();

    for ingredient in aggregate.ingredients.values() {
        let Some(details) = ingredient.details.as_ref().filter(|d| d.is_compensable()) else {
            continue;
        };
        for (person, quantity) in &ingredient.per_person {
            let Some(profile) = profiles.profile_of(person) else {
                continue;
            };
            *calories.entry(profile.to_string()).or_insert(0.0) += details.calories_for(*quantity);
        }
    }

    calories
}

/// Scale adjustable ingredients so each profile's calories return to their
/// pre-rounding level.
///
/// `factor = (adjustable - delta) / adjustable`; a profile without adjustable
/// calories keeps factor 1.0 and its delta is reported as unresolved. A delta
/// larger than the adjustable calories clamps the factor at 0.0.
pub fn compensate_calories(
    mut plan: ExpandedPlan,
    aggregate: &PlanAggregate,
    calorie_deltas: &BTreeMap<String, f64>,
    profiles: &DietProfiles,
) -> (ExpandedPlan, CompensationReport) {
    if calorie_deltas
        .values()
        .all(|delta| delta.abs() <= COMPENSATION_EPSILON_KCAL)
    {
        debug!("calorie drift negligible, skipping compensation");
        return (
            plan,
            CompensationReport {
                skipped: true,
                ..Default::default()
            },
        );
    }

    let available = adjustable_calories(aggregate, profiles);
    let mut report = CompensationReport::default();

    for (profile, &delta) in calorie_deltas {
        let adjustable = available.get(profile).copied().unwrap_or(0.0);
        if adjustable <= 0.0 {
            warn!(profile = %profile, delta, "no adjustable ingredients to compensate calories");
            report.factors.insert(profile.clone(), 1.0);
            report.unresolved.insert(profile.clone(), delta);
            continue;
        }

        let mut factor = (adjustable - delta) / adjustable;
        if factor < 0.0 {
            report.unresolved.insert(profile.clone(), delta - adjustable);
            factor = 0.0;
        }
        info!(profile = %profile, delta, factor, "compensating calories");
        report.factors.insert(profile.clone(), factor);
    }

    let compensable: BTreeSet<&str> = aggregate
        .ingredients
        .values()
        .filter(|i| i.details.as_ref().is_some_and(|d| d.is_compensable()))
        .map(|i| i.name.as_str())
        .collect();

    for meal in plan
        .meals
        .iter_mut()
        .filter(|m| aggregate.meals_in_scope.contains(&m.id))
    {
        for ingredient in meal
            .ingredients
            .iter_mut()
            .filter(|i| compensable.contains(i.name.as_str()))
        {
            ingredient.scale_people(|person| {
                profiles
                    .profile_of(person)
                    .and_then(|profile| report.factors.get(profile))
                    .copied()
            });
        }
    }

    (plan, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Catalog, ExpandedIngredient, ExpandedMeal, IngredientDetails};
    use crate::planner::aggregator::aggregate_plan;
    use chrono::NaiveDate;

    fn details(calories: f64, unit_size: Option<f64>, adjustable: bool) -> IngredientDetails {
        IngredientDetails {
            calories_per_100: calories,
            fat_per_100: 0.0,
            protein_per_100: 0.0,
            carbs_per_100: 0.0,
            unit_size,
            adjustable,
            display_unit: None,
        }
    }

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.insert("pudding".to_string(), details(90.0, Some(40.0), false));
        catalog.insert("milk".to_string(), details(49.0, None, true));
        catalog.insert("salt".to_string(), details(0.0, None, false));
        catalog
    }

    fn plan() -> ExpandedPlan {
        let day: NaiveDate = "2026-01-06".parse().unwrap();
        let mut pudding = ExpandedIngredient::new("pudding", "g", "pantry");
        pudding.set_person("John", 40.0, 1);
        let mut milk = ExpandedIngredient::new("milk", "ml", "dairy");
        milk.set_person("John", 200.0, 1);
        milk.set_person("Jane", 100.0, 1);
        let mut salt = ExpandedIngredient::new("salt", "g", "spices");
        salt.set_person("John", 2.0, 1);

        ExpandedPlan {
            meals: vec![ExpandedMeal {
                id: "sm_1".to_string(),
                meal_id: "pudding".to_string(),
                name: "Pudding".to_string(),
                cooking_dates: vec![day],
                eating_dates_per_person: [
                    ("John".to_string(), vec![day]),
                    ("Jane".to_string(), vec![day]),
                ]
                .into_iter()
                .collect(),
                meal_type: "breakfast".to_string(),
                assigned_cook: "John".to_string(),
                ingredients: vec![pudding, milk, salt],
                prep_tasks: vec![],
                steps: vec![],
                suggested_seasonings: None,
                notes: None,
            }],
            shopping_trips: vec![],
        }
    }

    fn profiles() -> DietProfiles {
        DietProfiles::new()
            .with("John", "high_calorie")
            .with("Jane", "low_calorie")
    }

    fn deltas(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(p, d)| (p.to_string(), *d)).collect()
    }

    #[test]
    fn test_adjustable_calories_only_counts_loose_adjustable() {
        let aggregate = aggregate_plan(&plan(), &catalog()).unwrap();
        let calories = adjustable_calories(&aggregate, &profiles());
        assert!((calories["high_calorie"] - 98.0).abs() < 1e-9);
        assert!((calories["low_calorie"] - 49.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_delta_scales_up() {
        let aggregate = aggregate_plan(&plan(), &catalog()).unwrap();
        let (compensated, report) = compensate_calories(
            plan(),
            &aggregate,
            &deltas(&[("high_calorie", -4.5)]),
            &profiles(),
        );

        assert!(!report.skipped);
        assert!((report.factors["high_calorie"] - 102.5 / 98.0).abs() < 1e-9);

        let meal = &compensated.meals[0];
        let milk = meal.ingredient("milk").unwrap();
        assert_eq!(milk.person("John").unwrap().quantity, 209.0);
        assert_eq!(milk.person("Jane").unwrap().quantity, 100.0);
        assert_eq!(milk.quantity(), 309.0);
        assert_eq!(meal.ingredient("pudding").unwrap().quantity(), 40.0);
        assert_eq!(meal.ingredient("salt").unwrap().quantity(), 2.0);
    }

    #[test]
    fn test_negligible_delta_is_skipped() {
        let aggregate = aggregate_plan(&plan(), &catalog()).unwrap();
        let (compensated, report) = compensate_calories(
            plan(),
            &aggregate,
            &deltas(&[("high_calorie", 0.05)]),
            &profiles(),
        );
        assert!(report.skipped);
        assert!(report.factors.is_empty());
        assert_eq!(compensated.meals[0].ingredient("milk").unwrap().quantity(), 300.0);
    }

    #[test]
    fn test_profile_without_adjustables_is_unresolved() {
        let aggregate = aggregate_plan(&plan(), &catalog()).unwrap();
        let (_, report) = compensate_calories(
            plan(),
            &aggregate,
            &deltas(&[("athlete", 12.0)]),
            &profiles(),
        );
        assert_eq!(report.factors["athlete"], 1.0);
        assert_eq!(report.unresolved["athlete"], 12.0);
    }

    #[test]
    fn test_oversized_delta_clamps_to_zero() {
        let aggregate = aggregate_plan(&plan(), &catalog()).unwrap();
        let (compensated, report) = compensate_calories(
            plan(),
            &aggregate,
            &deltas(&[("low_calorie", 60.0)]),
            &profiles(),
        );
        assert_eq!(report.factors["low_calorie"], 0.0);
        assert!((report.unresolved["low_calorie"] - 11.0).abs() < 1e-9);
        let milk = compensated.meals[0].ingredient("milk").unwrap();
        assert_eq!(milk.person("Jane").unwrap().quantity, 0.0);
        assert_eq!(milk.quantity(), 200.0);
    }

    #[test]
    fn test_reaggregation_matches_compensated_plan() {
        let aggregate = aggregate_plan(&plan(), &catalog()).unwrap();
        let (compensated, _) = compensate_calories(
            plan(),
            &aggregate,
            &deltas(&[("high_calorie", -4.5)]),
            &profiles(),
        );

        let after = aggregate_plan(&compensated, &catalog()).unwrap();
        let milk = &after.ingredients["milk"];
        assert_eq!(milk.total, compensated.meals[0].ingredient("milk").unwrap().quantity());
        assert_eq!(milk.total, milk.per_person.values().sum::<f64>());
    }
}
