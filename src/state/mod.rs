mod manager;
mod persistence;

pub use manager::RecipeBook;
pub use persistence::{load_meal_plan, load_meals_database, save_json, write_shopping_csv};
