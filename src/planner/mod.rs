pub mod aggregator;
pub mod compensation;
pub mod constants;
pub mod distribution;
pub mod engine;
pub mod expander;
pub mod nutrition;
pub mod rounding;
pub mod validation;
pub mod warnings;

pub use aggregator::{aggregate_plan, resolve_trips, IngredientAggregate, PlanAggregate, TripScope};
pub use compensation::{adjustable_calories, compensate_calories, CompensationReport};
pub use constants::*;
pub use distribution::{apply_rounding, distribute_packages, distribute_plan, TripAllocation};
pub use engine::{
    check_rounding_warnings, plan_meal_plan, PlanningResult, ShoppingItem, TripShoppingList,
};
pub use expander::{expand_meal, expand_meal_plan};
pub use nutrition::{
    meal_nutrition, nutrition_by_meal, plan_nutrition, MealNutrition, NutritionTotals,
    ProfileNutrition,
};
pub use rounding::{round_to_package, round_to_packages, RoundedIngredient, RoundingOutcome};
pub use validation::validate_meal_plan;
pub use warnings::generate_rounding_warnings;
