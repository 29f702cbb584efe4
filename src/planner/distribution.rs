use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::debug;

use crate::models::ExpandedPlan;
use crate::planner::aggregator::PlanAggregate;
use crate::planner::constants::UNIT_EPSILON;
use crate::planner::rounding::RoundingOutcome;

/// What one trip needs of a packaged ingredient and what it buys.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TripAllocation {
    pub trip_index: usize,
    pub needed: f64,
    pub purchased: f64,
}

/// Spread `rounded_total` over trips as whole packages.
///
/// Walks the trips in order carrying leftover from earlier purchases; a trip
/// buys only what its leftover does not cover. The last trip takes every
/// remaining unit, so allocations always sum to `rounded_total`. An earlier
/// trip never buys more units than remain unallocated, which keeps the last
/// trip non-negative when the plan-wide total was rounded down.
pub fn distribute_packages(rounded_total: f64, unit_size: f64, needs: &[f64]) -> Vec<f64> {
    let Some((_, earlier)) = needs.split_last() else {
        return Vec::new();
    };

    let total_units = (rounded_total / unit_size).round() as i64;
    let mut allocated_units: i64 = 0;
    let mut leftover = 0.0;
    let mut allocations = Vec::with_capacity(needs.len());

    for &need in earlier {
        if leftover >= need {
            leftover -= need;
            allocations.push(0.0);
            continue;
        }

        let deficit = need - leftover;
        let wanted = (deficit / unit_size - UNIT_EPSILON).ceil().max(0.0) as i64;
        let units = wanted.min(total_units - allocated_units);
        let bought = units as f64 * unit_size;

        leftover += bought - need;
        allocated_units += units;
        allocations.push(bought);
    }

    let remaining = total_units - allocated_units;
    debug_assert!(remaining >= 0, "earlier trips are clamped to the unallocated units");
    allocations.push(remaining as f64 * unit_size);
    allocations
}

/// Allocate every rounded ingredient across the trips that need it.
pub fn distribute_plan(
    aggregate: &PlanAggregate,
    outcome: &RoundingOutcome,
) -> BTreeMap<String, Vec<TripAllocation>> {
    outcome
        .ingredients
        .iter()
        .filter_map(|(name, rounded)| {
            let needs = aggregate.trip_needs.get(name)?;
            let quantities: Vec<f64> = needs.iter().map(|n| n.quantity).collect();
            let purchases = distribute_packages(rounded.rounded, rounded.unit_size, &quantities);

            debug!(ingredient = %name, ?purchases, "distributed packages across trips");

            let allocations = needs
                .iter()
                .zip(purchases)
                .map(|(need, purchased)| TripAllocation {
                    trip_index: need.trip_index,
                    needed: need.quantity,
                    purchased,
                })
                .collect();
            Some((name.clone(), allocations))
        })
        .collect()
}

/// One person's scaled quantity of a rounded ingredient in one meal.
struct Share {
    meal: usize,
    ingredient: usize,
    person: String,
    quantity: f64,
    remainder: f64,
}

/// Rescale rounded ingredients in the bought meals so the plan eats what it buys.
///
/// Each person's quantity is multiplied by `rounded / original` and floored;
/// the units lost to flooring go one each to the largest fractional
/// remainders, so the in-scope meals consume exactly the rounded total.
/// Ties keep plan order (meal, then person by name).
pub fn apply_rounding(
    mut plan: ExpandedPlan,
    outcome: &RoundingOutcome,
    meals_in_scope: &BTreeSet<String>,
) -> ExpandedPlan {
    for rounded in outcome.ingredients.values() {
        let Some(scale) = rounded.scale() else {
            continue;
        };

        let mut shares = Vec::new();
        for (m, meal) in plan.meals.iter().enumerate() {
            if !meals_in_scope.contains(&meal.id) {
                continue;
            }
            for (i, ingredient) in meal.ingredients.iter().enumerate() {
                if ingredient.name != rounded.name {
                    continue;
                }
                for (person, portion) in ingredient.per_person() {
                    let exact = portion.quantity * scale;
                    let floored = (exact + UNIT_EPSILON).floor();
                    shares.push(Share {
                        meal: m,
                        ingredient: i,
                        person: person.clone(),
                        quantity: floored,
                        remainder: exact - floored,
                    });
                }
            }
        }

        let floored_total: f64 = shares.iter().map(|s| s.quantity).sum();
        let missing = (rounded.rounded - floored_total).round().max(0.0) as usize;

        let mut order: Vec<usize> = (0..shares.len()).collect();
        order.sort_by(|&a, &b| shares[b].remainder.total_cmp(&shares[a].remainder));
        for &idx in order.iter().take(missing) {
            shares[idx].quantity += 1.0;
        }

        debug!(
            ingredient = %rounded.name,
            people = shares.len(),
            missing,
            "wrote rounded quantities back into meals"
        );

        for share in shares {
            plan.meals[share.meal].ingredients[share.ingredient]
                .set_quantity(&share.person, share.quantity);
        }
    }
    plan
}
