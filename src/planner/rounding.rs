use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::config::DietProfiles;
use crate::planner::aggregator::PlanAggregate;

/// A packaged ingredient's plan-wide total before and after rounding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundedIngredient {
    pub name: String,
    pub unit: String,
    pub original: f64,
    pub rounded: f64,
    pub unit_size: f64,
}

impl RoundedIngredient {
    /// Quantity added (positive) or removed (negative) by rounding.
    #[inline]
    pub fn delta(&self) -> f64 {
        self.rounded - self.original
    }

    /// `|delta| / original`, or `None` when nothing was originally needed.
    pub fn relative_change(&self) -> Option<f64> {
        (self.original > 0.0).then(|| self.delta().abs() / self.original)
    }

    /// Factor that turns the original consumption into the rounded one.
    pub fn scale(&self) -> Option<f64> {
        (self.original > 0.0).then(|| self.rounded / self.original)
    }
}

/// Result of rounding every packaged ingredient of a plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoundingOutcome {
    pub ingredients: BTreeMap<String, RoundedIngredient>,
    /// Diet profile → calories added by rounding (negative when removed).
    pub calorie_deltas: BTreeMap<String, f64>,
}

impl RoundingOutcome {
    pub fn get(&self, name: &str) -> Option<&RoundedIngredient> {
        self.ingredients.get(name)
    }
}

/// Round `quantity` to the nearest multiple of `unit_size`, never below one unit.
///
/// Exact halves round up (away from zero), so 100 with packs of 40 buys 120.
#[inline]
pub fn round_to_package(quantity: f64, unit_size: f64) -> f64 {
    ((quantity / unit_size).round() * unit_size).max(unit_size)
}

/// Round each packaged ingredient's plan-wide total and attribute the calorie
/// change to diet profiles in proportion to each person's share.
///
/// Ingredients without a package size (or without a catalog entry) pass through.
/// People without a diet profile carry no calorie delta.
pub fn round_to_packages(aggregate: &PlanAggregate, profiles: &DietProfiles) -> RoundingOutcome {
    let mut outcome = RoundingOutcome::default();

    for (name, ingredient) in &aggregate.ingredients {
        let (Some(details), Some(unit_size)) = (&ingredient.details, ingredient.package_size())
        else {
            continue;
        };

        let original = ingredient.total;
        let rounded = round_to_package(original, unit_size);
        let delta = rounded - original;

        for (person, quantity) in &ingredient.per_person {
            let Some(profile) = profiles.profile_of(person) else {
                continue;
            };
            let share = if original > 0.0 { quantity / original } else { 0.0 };
            let calories = details.calories_for(delta * share);
            *outcome.calorie_deltas.entry(profile.to_string()).or_insert(0.0) += calories;
        }

        debug!(
            ingredient = %name,
            original,
            rounded,
            unit_size,
            "rounded to whole packages"
        );

        outcome.ingredients.insert(
            name.clone(),
            RoundedIngredient {
                name: name.clone(),
                unit: ingredient.unit.clone(),
                original,
                rounded,
                unit_size,
            },
        );
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IngredientDetails;
    use crate::planner::aggregator::IngredientAggregate;
    use std::collections::BTreeSet;

    fn details(calories: f64, unit_size: Option<f64>) -> IngredientDetails {
        IngredientDetails {
            calories_per_100: calories,
            fat_per_100: 0.0,
            protein_per_100: 0.0,
            carbs_per_100: 0.0,
            unit_size,
            adjustable: unit_size.is_none(),
            display_unit: None,
        }
    }

    fn aggregate(lines: &[(&str, Option<IngredientDetails>, &[(&str, f64)])]) -> PlanAggregate {
        let ingredients = lines
            .iter()
            .map(|(name, details, people)| {
                let per_person: BTreeMap<String, f64> =
                    people.iter().map(|(p, q)| (p.to_string(), *q)).collect();
                (
                    name.to_string(),
                    IngredientAggregate {
                        name: name.to_string(),
                        unit: "g".to_string(),
                        category: "pantry".to_string(),
                        total: per_person.values().sum(),
                        per_person,
                        notes: None,
                        details: details.clone(),
                    },
                )
            })
            .collect();
        PlanAggregate {
            ingredients,
            trip_needs: BTreeMap::new(),
            trips: vec![],
            meals_in_scope: BTreeSet::new(),
        }
    }

    fn profiles() -> DietProfiles {
        DietProfiles::new()
            .with("John", "high_calorie")
            .with("Jane", "low_calorie")
    }

    #[test]
    fn test_round_to_package() {
        assert_eq!(round_to_package(150.0, 40.0), 160.0);
        assert_eq!(round_to_package(380.0, 60.0), 360.0);
        assert_eq!(round_to_package(1600.0, 1000.0), 2000.0);
    }

    #[test]
    fn test_halves_round_up() {
        assert_eq!(round_to_package(100.0, 40.0), 120.0);
        assert_eq!(round_to_package(300.0, 200.0), 400.0);
    }

    #[test]
    fn test_rounding_floor_is_one_unit() {
        assert_eq!(round_to_package(15.0, 40.0), 40.0);
        assert_eq!(round_to_package(0.0, 40.0), 40.0);
    }

    #[test]
    fn test_calorie_delta_split_by_share() {
        // 150 g rounds up to 4 units of 40 g, +10 g split 2:1.
        let agg = aggregate(&[(
            "pudding",
            Some(details(90.0, Some(40.0))),
            &[("John", 100.0), ("Jane", 50.0)],
        )]);
        let outcome = round_to_packages(&agg, &profiles());

        let pudding = outcome.get("pudding").unwrap();
        assert_eq!(pudding.rounded, 160.0);
        assert!((outcome.calorie_deltas["high_calorie"] - 6.0).abs() < 1e-9);
        assert!((outcome.calorie_deltas["low_calorie"] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_loose_and_uncatalogued_pass_through() {
        let agg = aggregate(&[
            ("lettuce", Some(details(15.0, None)), &[("John", 130.0)]),
            ("mystery", None, &[("John", 13.0)]),
        ]);
        let outcome = round_to_packages(&agg, &profiles());
        assert!(outcome.ingredients.is_empty());
        assert!(outcome.calorie_deltas.is_empty());
    }

    #[test]
    fn test_deltas_accumulate_per_profile() {
        let agg = aggregate(&[
            ("pudding", Some(details(90.0, Some(40.0))), &[("John", 45.0)]),
            ("milk", Some(details(49.0, Some(1000.0))), &[("John", 600.0)]),
        ]);
        let outcome = round_to_packages(&agg, &profiles());
        // pudding: -5 g * 0.9 = -4.5 kcal; milk: +400 ml * 0.49 = +196 kcal
        assert!((outcome.calorie_deltas["high_calorie"] - 191.5).abs() < 1e-9);
    }

    #[test]
    fn test_person_without_profile_carries_no_delta() {
        let agg = aggregate(&[(
            "pudding",
            Some(details(90.0, Some(40.0))),
            &[("John", 100.0), ("Guest", 50.0)],
        )]);
        let outcome = round_to_packages(&agg, &profiles());

        assert_eq!(outcome.get("pudding").unwrap().rounded, 160.0);
        assert_eq!(outcome.calorie_deltas.len(), 1);
        assert!((outcome.calorie_deltas["high_calorie"] - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_relative_change() {
        let rounded = RoundedIngredient {
            name: "x".to_string(),
            unit: "g".to_string(),
            original: 25.0,
            rounded: 40.0,
            unit_size: 40.0,
        };
        assert!((rounded.relative_change().unwrap() - 0.6).abs() < 1e-9);

        let nothing = RoundedIngredient { original: 0.0, ..rounded };
        assert_eq!(nothing.relative_change(), None);
        assert_eq!(nothing.scale(), None);
    }
}
