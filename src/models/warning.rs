use serde::Serialize;

/// A meal that uses a heavily rounded ingredient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealSuggestion {
    pub meal_name: String,
    pub current_portions: u32,
    /// Extra portions of this meal alone that would make rounding tolerable; 0 if none found.
    pub suggested_additional_portions: u32,
}

/// Raised when package rounding changes an ingredient's plan-wide quantity too much.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundingWarning {
    pub ingredient_name: String,
    pub original_quantity: f64,
    pub rounded_quantity: f64,
    pub percent_change: f64,
    pub unit_size: f64,
    pub meals: Vec<MealSuggestion>,
    /// Extra portions added to every listed meal at once; 0 if none found.
    pub combined_increase: u32,
}
