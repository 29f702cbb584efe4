use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A recipe scheduled for cooking on one or more dates.
///
/// One cooking date means meal prep (cook once, eat over several days);
/// more than one means a separate cooking session per date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledMeal {
    /// Unique instance id, referenced by shopping trips.
    pub id: String,

    /// Recipe reference.
    pub meal_id: String,

    pub cooking_dates: Vec<NaiveDate>,

    /// Person → dates they eat this meal. One date is one portion.
    pub eating_dates_per_person: BTreeMap<String, Vec<NaiveDate>>,

    #[serde(default = "default_meal_type")]
    pub meal_type: String,

    #[serde(default)]
    pub assigned_cook: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_assigned_to: Option<String>,
}

fn default_meal_type() -> String {
    "dinner".to_string()
}

impl ScheduledMeal {
    #[inline]
    pub fn is_meal_prep(&self) -> bool {
        self.cooking_dates.len() == 1
    }

    /// Portions across everybody.
    pub fn total_portions(&self) -> u32 {
        self.eating_dates_per_person
            .values()
            .map(|dates| dates.len() as u32)
            .sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingTrip {
    pub shopping_date: NaiveDate,
    pub scheduled_meal_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MealPlan {
    pub scheduled_meals: Vec<ScheduledMeal>,

    /// Empty means a single implicit trip covering every meal.
    #[serde(default)]
    pub shopping_trips: Vec<ShoppingTrip>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_scheduled_meal() {
        let json = r#"{
            "id": "sm_1",
            "meal_id": "pinsa",
            "cooking_dates": ["2026-01-15"],
            "eating_dates_per_person": {
                "John": ["2026-01-15", "2026-01-16"],
                "Jane": ["2026-01-15"]
            },
            "meal_type": "dinner",
            "assigned_cook": "John"
        }"#;
        let meal: ScheduledMeal = serde_json::from_str(json).unwrap();
        assert!(meal.is_meal_prep());
        assert_eq!(meal.eating_dates_per_person["John"].len(), 2);
        assert_eq!(meal.total_portions(), 3);
        assert_eq!(meal.prep_assigned_to, None);
    }

    #[test]
    fn test_shopping_trips_default_to_empty() {
        let plan: MealPlan = serde_json::from_str(r#"{"scheduled_meals": []}"#).unwrap();
        assert!(plan.shopping_trips.is_empty());
    }
}
