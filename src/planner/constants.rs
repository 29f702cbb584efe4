// ─────────────────────────────────────────────────────────────────────────────
// Rounding and compensation
// ─────────────────────────────────────────────────────────────────────────────

/// Calorie delta (per diet profile) below which compensation is skipped.
pub const COMPENSATION_EPSILON_KCAL: f64 = 0.1;

/// Slack when converting a quantity to package units, absorbs float noise
/// such as 240 / 60 = 4.000000001.
pub const UNIT_EPSILON: f64 = 1e-9;

// ─────────────────────────────────────────────────────────────────────────────
// Rounding warnings
// ─────────────────────────────────────────────────────────────────────────────

/// Plan-wide relative change above which a rounding warning is raised.
pub const ROUNDING_WARNING_THRESHOLD: f64 = 0.5;

/// Relative error a single meal must reach for its suggestion to count.
pub const MEAL_SUGGESTION_TOLERANCE: f64 = 0.3;

/// Extra portions tried per meal (1..=N).
pub const MAX_MEAL_SUGGESTION: u32 = 9;

/// Extra portions tried for all meals at once (1..=N).
pub const MAX_COMBINED_INCREASE: u32 = 5;

/// Per-meal suggestions above this are not shown.
pub const MAX_PRACTICAL_SUGGESTION: u32 = 5;

// ─────────────────────────────────────────────────────────────────────────────
// Shopping
// ─────────────────────────────────────────────────────────────────────────────

/// Default shopping list category order.
pub const DEFAULT_SHOPPING_CATEGORIES: &[&str] = &[
    "produce",
    "meat",
    "dairy",
    "pantry",
    "frozen",
    "bakery",
    "beverages",
    "spices",
    "other",
];

/// Category given to suggested seasonings on shopping lists.
pub const SEASONING_CATEGORY: &str = "spices";
