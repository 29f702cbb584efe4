pub mod catalog;
pub mod expanded;
pub mod plan;
pub mod recipe;
pub mod warning;

pub use catalog::{Catalog, DisplayUnit, IngredientDetails};
pub use expanded::{ExpandedIngredient, ExpandedMeal, ExpandedPlan, PersonPortion};
pub use plan::{MealPlan, ScheduledMeal, ShoppingTrip};
pub use recipe::{MealsDatabase, PrepStep, Recipe, RecipeIngredient};
pub use warning::{MealSuggestion, RoundingWarning};
