use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::models::{MealPlan, MealsDatabase};
use crate::planner::TripShoppingList;

/// Load the recipes and ingredient catalog from a JSON file.
pub fn load_meals_database<P: AsRef<Path>>(path: P) -> Result<MealsDatabase> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let database: MealsDatabase = serde_json::from_str(&content)?;
    info!(
        recipes = database.meals.len(),
        ingredients = database.ingredient_details.len(),
        "loaded meals database from {}",
        path.display()
    );
    Ok(database)
}

/// Load a meal plan from a JSON file.
pub fn load_meal_plan<P: AsRef<Path>>(path: P) -> Result<MealPlan> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let plan: MealPlan = serde_json::from_str(&content)?;
    info!(
        meals = plan.scheduled_meals.len(),
        trips = plan.shopping_trips.len(),
        "loaded meal plan from {}",
        path.display()
    );
    Ok(plan)
}

/// Write any serializable value as pretty-printed JSON.
pub fn save_json<P: AsRef<Path>, T: Serialize + ?Sized>(path: P, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path.as_ref(), json)?;
    debug!("wrote {}", path.as_ref().display());
    Ok(())
}

#[derive(Serialize)]
struct ShoppingRow<'a> {
    trip: usize,
    date: String,
    category: &'a str,
    name: &'a str,
    quantity: f64,
    unit: &'a str,
    packages: Option<i64>,
    needed: f64,
    notes: Option<&'a str>,
}

/// Export every trip's shopping list as one CSV table.
pub fn write_shopping_csv<P: AsRef<Path>>(path: P, trips: &[TripShoppingList]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;
    let mut rows = 0;

    for trip in trips {
        let date = trip.date.map(|d| d.to_string()).unwrap_or_default();
        for item in &trip.items {
            writer.serialize(ShoppingRow {
                trip: trip.index + 1,
                date: date.clone(),
                category: &item.category,
                name: &item.name,
                quantity: item.quantity,
                unit: &item.unit,
                packages: item.packages(),
                needed: item.needed,
                notes: item.notes.as_deref(),
            })?;
            rows += 1;
        }
    }

    writer.flush()?;
    info!(rows, "exported shopping lists to {}", path.as_ref().display());
    Ok(())
}
