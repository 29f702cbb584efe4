use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Nutrition and purchasing data for one ingredient.
///
/// Nutrition values are per 100 units of the ingredient's recipe unit
/// (grams, millilitres, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientDetails {
    #[serde(alias = "calories_per_100g")]
    pub calories_per_100: f64,

    #[serde(default, alias = "fat_per_100g")]
    pub fat_per_100: f64,

    #[serde(default, alias = "protein_per_100g")]
    pub protein_per_100: f64,

    #[serde(default, alias = "carbs_per_100g")]
    pub carbs_per_100: f64,

    /// Quantity per purchasable package. `None` means bought loose.
    #[serde(default)]
    pub unit_size: Option<f64>,

    /// Whether the quantity may be scaled to compensate calorie drift.
    #[serde(default = "default_adjustable")]
    pub adjustable: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_unit: Option<DisplayUnit>,
}

fn default_adjustable() -> bool {
    true
}

/// Conversion from the recipe unit to a friendlier shopping unit,
/// e.g. 60 g per tortilla.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayUnit {
    pub unit: String,
    pub quantity_per_unit: f64,
}

impl IngredientDetails {
    /// Package size, if the ingredient is sold in packages of a positive size.
    #[inline]
    pub fn package_size(&self) -> Option<f64> {
        self.unit_size.filter(|size| *size > 0.0)
    }

    /// Whether this ingredient can absorb calorie compensation.
    ///
    /// Packaged ingredients never compensate: their quantity is fixed by rounding.
    #[inline]
    pub fn is_compensable(&self) -> bool {
        self.adjustable && self.package_size().is_none()
    }

    /// Calories contained in `quantity` units.
    #[inline]
    pub fn calories_for(&self, quantity: f64) -> f64 {
        quantity / 100.0 * self.calories_per_100
    }

    /// Render a quantity in the display unit, if one is configured.
    pub fn display_quantity(&self, quantity: f64) -> Option<String> {
        let display = self.display_unit.as_ref()?;
        if display.quantity_per_unit <= 0.0 {
            return None;
        }
        let count = quantity / display.quantity_per_unit;
        Some(format!("{:.1} {}", count, display.unit).replace(".0 ", " "))
    }
}

/// Ingredient name → details.
pub type Catalog = BTreeMap<String, IngredientDetails>;
