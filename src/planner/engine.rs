//! Engine entry point: the strict pipeline from a meal plan to shopping lists.
//!
//! expand → aggregate → round → distribute → compensate → re-aggregate.
//! Warnings are computed from the plan as expanded, before any rounding is
//! written back.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::PlannerConfig;
use crate::error::Result;
use crate::models::{ExpandedPlan, MealPlan, RoundingWarning};
use crate::planner::aggregator::{aggregate_plan, PlanAggregate};
use crate::planner::compensation::{compensate_calories, CompensationReport};
use crate::planner::distribution::{apply_rounding, distribute_plan, TripAllocation};
use crate::planner::expander::expand_meal_plan;
use crate::planner::rounding::round_to_packages;
use crate::planner::warnings::generate_rounding_warnings;
use crate::state::RecipeBook;

/// One line of a trip's shopping list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShoppingItem {
    pub name: String,
    /// Quantity to buy on this trip.
    pub quantity: f64,
    /// Quantity the trip's meals consume.
    pub needed: f64,
    pub unit: String,
    pub category: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_size: Option<f64>,

    /// Quantity in the catalog's display unit, e.g. "3 pcs".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl ShoppingItem {
    /// Whole packages to buy, for packaged items.
    pub fn packages(&self) -> Option<i64> {
        self.package_size.map(|size| (self.quantity / size).round() as i64)
    }
}

/// Everything bought on one shopping trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripShoppingList {
    pub index: usize,
    /// `None` for the implicit trip of a plan without declared trips.
    pub date: Option<NaiveDate>,
    pub meal_ids: Vec<String>,
    pub items: Vec<ShoppingItem>,
}

impl TripShoppingList {
    pub fn item(&self, name: &str) -> Option<&ShoppingItem> {
        self.items.iter().find(|i| i.name == name)
    }
}

/// Output of [`plan_meal_plan`].
#[derive(Debug, Clone, Serialize)]
pub struct PlanningResult {
    /// The plan after rounding and compensation were written back.
    pub plan: ExpandedPlan,
    pub trips: Vec<TripShoppingList>,
    pub warnings: Vec<RoundingWarning>,
    /// Diet profile → calories added by rounding, before compensation.
    pub calorie_adjustments: BTreeMap<String, f64>,
    pub compensation: CompensationReport,
    pub rounding_applied: bool,
}

impl PlanningResult {
    /// Total purchased across trips for an ingredient.
    pub fn purchased(&self, name: &str) -> f64 {
        self.trips
            .iter()
            .filter_map(|t| t.item(name))
            .map(|i| i.quantity)
            .sum()
    }
}

fn shopping_lists(
    aggregate: &PlanAggregate,
    allocations: &BTreeMap<String, Vec<TripAllocation>>,
) -> Vec<TripShoppingList> {
    aggregate
        .trips
        .iter()
        .map(|trip| {
            let items = trip
                .ingredients
                .values()
                .filter_map(|ingredient| {
                    let quantity = match allocations.get(&ingredient.name) {
                        Some(allocs) => allocs
                            .iter()
                            .find(|a| a.trip_index == trip.scope.index)
                            .map(|a| a.purchased)
                            .unwrap_or(0.0),
                        None => ingredient.total,
                    };
                    if quantity <= 0.0 && ingredient.package_size().is_some() {
                        debug!(
                            ingredient = %ingredient.name,
                            trip = trip.scope.index,
                            "covered by packages bought earlier"
                        );
                        return None;
                    }
                    Some(ShoppingItem {
                        name: ingredient.name.clone(),
                        quantity,
                        needed: ingredient.total,
                        unit: ingredient.unit.clone(),
                        category: ingredient.category.clone(),
                        notes: ingredient.notes.clone(),
                        package_size: ingredient.package_size(),
                        display: ingredient
                            .details
                            .as_ref()
                            .and_then(|d| d.display_quantity(quantity)),
                    })
                })
                .collect();

            TripShoppingList {
                index: trip.scope.index,
                date: trip.scope.date,
                meal_ids: trip.scope.meal_ids.clone(),
                items,
            }
        })
        .collect()
}

/// Run the whole pipeline for a meal plan.
///
/// With rounding disabled the plan is only expanded and aggregated; shopping
/// lists then carry the raw needs.
pub fn plan_meal_plan(
    plan: &MealPlan,
    book: &RecipeBook,
    config: &PlannerConfig,
) -> Result<PlanningResult> {
    let profiles = &config.diet_profiles;
    let catalog = book.catalog();

    let expanded = expand_meal_plan(plan, book, profiles)?;
    let aggregate = aggregate_plan(&expanded, catalog)?;

    if !config.enable_ingredient_rounding {
        info!("ingredient rounding disabled");
        return Ok(PlanningResult {
            trips: shopping_lists(&aggregate, &BTreeMap::new()),
            plan: expanded,
            warnings: Vec::new(),
            calorie_adjustments: BTreeMap::new(),
            compensation: CompensationReport {
                skipped: true,
                ..Default::default()
            },
            rounding_applied: false,
        });
    }

    let outcome = round_to_packages(&aggregate, profiles);
    let warnings = generate_rounding_warnings(
        &outcome,
        &expanded,
        &aggregate.meals_in_scope,
        &config.warning_limits,
    );
    let allocations = distribute_plan(&aggregate, &outcome);

    let rounded = apply_rounding(expanded, &outcome, &aggregate.meals_in_scope);
    let rounded_aggregate = aggregate_plan(&rounded, catalog)?;
    let (compensated, compensation) =
        compensate_calories(rounded, &rounded_aggregate, &outcome.calorie_deltas, profiles);
    let final_aggregate = aggregate_plan(&compensated, catalog)?;

    info!(
        meals = compensated.meals.len(),
        trips = final_aggregate.trip_count(),
        rounded = outcome.ingredients.len(),
        warnings = warnings.len(),
        "meal plan ready"
    );

    Ok(PlanningResult {
        trips: shopping_lists(&final_aggregate, &allocations),
        plan: compensated,
        warnings,
        calorie_adjustments: outcome.calorie_deltas,
        compensation,
        rounding_applied: true,
    })
}

/// Rounding warnings for a plan, regardless of the rounding toggle.
pub fn check_rounding_warnings(
    plan: &MealPlan,
    book: &RecipeBook,
    config: &PlannerConfig,
) -> Result<Vec<RoundingWarning>> {
    let expanded = expand_meal_plan(plan, book, &config.diet_profiles)?;
    let aggregate = aggregate_plan(&expanded, book.catalog())?;
    let outcome = round_to_packages(&aggregate, &config.diet_profiles);
    Ok(generate_rounding_warnings(
        &outcome,
        &expanded,
        &aggregate.meals_in_scope,
        &config.warning_limits,
    ))
}
