use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::error::{PlannerError, Result};
use crate::models::{Catalog, ExpandedIngredient, ExpandedPlan, IngredientDetails};

/// Meals bought together on one shopping trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripScope {
    pub index: usize,
    /// `None` for the implicit trip of a plan without declared trips.
    pub date: Option<NaiveDate>,
    pub meal_ids: Vec<String>,
}

/// An ingredient summed over a set of meals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientAggregate {
    pub name: String,
    pub unit: String,
    pub category: String,
    pub total: f64,
    pub per_person: BTreeMap<String, f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(skip)]
    pub details: Option<IngredientDetails>,
}

impl IngredientAggregate {
    fn empty(ingredient: &ExpandedIngredient, catalog: &Catalog) -> Self {
        Self {
            name: ingredient.name.clone(),
            unit: ingredient.unit.clone(),
            category: ingredient.category.clone(),
            total: 0.0,
            per_person: BTreeMap::new(),
            notes: None,
            details: catalog.get(&ingredient.name).cloned(),
        }
    }

    fn absorb(&mut self, ingredient: &ExpandedIngredient) {
        self.total += ingredient.quantity();
        for (person, portion) in ingredient.per_person() {
            *self.per_person.entry(person.clone()).or_insert(0.0) += portion.quantity;
        }
        if self.notes.is_none() {
            self.notes = ingredient.notes.clone();
        }
    }

    /// Package size from the catalog, if packaged.
    pub fn package_size(&self) -> Option<f64> {
        self.details.as_ref().and_then(IngredientDetails::package_size)
    }
}

/// How much of an ingredient one trip needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TripNeed {
    pub trip_index: usize,
    pub quantity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripAggregate {
    pub scope: TripScope,
    pub ingredients: BTreeMap<String, IngredientAggregate>,
}

/// Plan-wide and per-trip ingredient totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanAggregate {
    /// Plan-wide totals keyed by ingredient name.
    pub ingredients: BTreeMap<String, IngredientAggregate>,
    /// Ingredient name → needs in trip order; trips without the ingredient are absent.
    pub trip_needs: BTreeMap<String, Vec<TripNeed>>,
    pub trips: Vec<TripAggregate>,
    /// Scheduled meal ids bought on some trip.
    pub meals_in_scope: BTreeSet<String>,
}

impl PlanAggregate {
    pub fn trip_count(&self) -> usize {
        self.trips.len()
    }
}

/// Resolve declared trips, or one implicit trip over every meal.
pub fn resolve_trips(plan: &ExpandedPlan) -> Result<Vec<TripScope>> {
    if plan.shopping_trips.is_empty() {
        return Ok(vec![TripScope {
            index: 0,
            date: None,
            meal_ids: plan.meals.iter().map(|m| m.id.clone()).collect(),
        }]);
    }

    plan.shopping_trips
        .iter()
        .enumerate()
        .map(|(index, trip)| {
            if let Some(unknown) = trip
                .scheduled_meal_ids
                .iter()
                .find(|id| plan.meal(id).is_none())
            {
                return Err(PlannerError::UnknownScheduledMeal {
                    id: unknown.clone(),
                    trip: trip.shopping_date.to_string(),
                });
            }
            Ok(TripScope {
                index,
                date: Some(trip.shopping_date),
                meal_ids: trip.scheduled_meal_ids.clone(),
            })
        })
        .collect()
}

/// Sum ingredient quantities per trip and across the plan.
///
/// Pure: calling it twice on the same plan yields equal aggregates.
pub fn aggregate_plan(plan: &ExpandedPlan, catalog: &Catalog) -> Result<PlanAggregate> {
    let scopes = resolve_trips(plan)?;

    let mut ingredients: BTreeMap<String, IngredientAggregate> = BTreeMap::new();
    let mut trip_needs: BTreeMap<String, Vec<TripNeed>> = BTreeMap::new();
    let mut trips = Vec::with_capacity(scopes.len());
    let mut meals_in_scope = BTreeSet::new();

    for scope in scopes {
        let mut trip_ingredients: BTreeMap<String, IngredientAggregate> = BTreeMap::new();

        for meal in scope.meal_ids.iter().filter_map(|id| plan.meal(id)) {
            meals_in_scope.insert(meal.id.clone());
            for ingredient in &meal.ingredients {
                trip_ingredients
                    .entry(ingredient.name.clone())
                    .or_insert_with(|| IngredientAggregate::empty(ingredient, catalog))
                    .absorb(ingredient);
                ingredients
                    .entry(ingredient.name.clone())
                    .or_insert_with(|| IngredientAggregate::empty(ingredient, catalog))
                    .absorb(ingredient);
            }
        }

        for (name, aggregate) in &trip_ingredients {
            trip_needs.entry(name.clone()).or_default().push(TripNeed {
                trip_index: scope.index,
                quantity: aggregate.total,
            });
        }

        trips.push(TripAggregate {
            scope,
            ingredients: trip_ingredients,
        });
    }

    debug!(
        ingredients = ingredients.len(),
        trips = trips.len(),
        "aggregated meal plan"
    );

    Ok(PlanAggregate {
        ingredients,
        trip_needs,
        trips,
        meals_in_scope,
    })
}
