use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::plan::ShoppingTrip;
use super::recipe::{split_seasonings, PrepStep};

/// One person's share of an expanded ingredient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonPortion {
    pub quantity: f64,
    pub unit: String,
    pub portions: u32,
}

/// A recipe ingredient sized for the actual eaters of a scheduled meal.
///
/// The total is always the sum of the per-person quantities; every mutating
/// method recomputes it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpandedIngredient {
    pub name: String,
    quantity: f64,
    pub unit: String,
    pub category: String,
    per_person: BTreeMap<String, PersonPortion>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ExpandedIngredient {
    pub fn new(
        name: impl Into<String>,
        unit: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            quantity: 0.0,
            unit: unit.into(),
            category: category.into(),
            per_person: BTreeMap::new(),
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes;
        self
    }

    /// Total quantity for the meal.
    #[inline]
    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn per_person(&self) -> &BTreeMap<String, PersonPortion> {
        &self.per_person
    }

    pub fn person(&self, person: &str) -> Option<&PersonPortion> {
        self.per_person.get(person)
    }

    /// Set (or replace) a person's quantity and portion count.
    pub fn set_person(&mut self, person: impl Into<String>, quantity: f64, portions: u32) {
        self.per_person.insert(
            person.into(),
            PersonPortion {
                quantity,
                unit: self.unit.clone(),
                portions,
            },
        );
        self.refresh_total();
    }

    /// Replace a person's quantity, keeping their portion count. Unknown
    /// people are ignored.
    pub fn set_quantity(&mut self, person: &str, quantity: f64) {
        if let Some(portion) = self.per_person.get_mut(person) {
            portion.quantity = quantity;
            self.refresh_total();
        }
    }

    /// Rescale every person selected by `factor_for`, rounding to whole units.
    ///
    /// `factor_for` returns `None` to leave a person untouched.
    pub fn scale_people<F>(&mut self, mut factor_for: F)
    where
        F: FnMut(&str) -> Option<f64>,
    {
        for (person, portion) in self.per_person.iter_mut() {
            if let Some(factor) = factor_for(person) {
                portion.quantity = (portion.quantity * factor).round();
            }
        }
        self.refresh_total();
    }

    /// Quantity one portion of this ingredient holds for `person`.
    pub fn quantity_per_portion(&self, person: &str) -> Option<f64> {
        self.per_person
            .get(person)
            .filter(|p| p.portions > 0)
            .map(|p| p.quantity / p.portions as f64)
    }

    fn refresh_total(&mut self) {
        self.quantity = self.per_person.values().map(|p| p.quantity).sum::<f64>().round();
    }
}

/// A scheduled meal joined with its recipe and sized for its eaters.
#[derive(Debug, Clone, Serialize)]
pub struct ExpandedMeal {
    pub id: String,
    pub meal_id: String,
    pub name: String,
    pub cooking_dates: Vec<NaiveDate>,
    pub eating_dates_per_person: BTreeMap<String, Vec<NaiveDate>>,
    pub meal_type: String,
    pub assigned_cook: String,
    pub ingredients: Vec<ExpandedIngredient>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub prep_tasks: Vec<PrepStep>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_seasonings: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ExpandedMeal {
    #[inline]
    pub fn is_meal_prep(&self) -> bool {
        self.cooking_dates.len() == 1
    }

    /// Sum of eating-date counts across people.
    pub fn total_portions(&self) -> u32 {
        self.eating_dates_per_person
            .values()
            .map(|dates| dates.len() as u32)
            .sum()
    }

    pub fn ingredient(&self, name: &str) -> Option<&ExpandedIngredient> {
        self.ingredients.iter().find(|i| i.name == name)
    }

    pub fn seasonings(&self) -> Vec<String> {
        split_seasonings(self.suggested_seasonings.as_deref())
    }

    /// People who eat on `date`, sorted by name.
    pub fn eaters_on(&self, date: NaiveDate) -> Vec<&str> {
        self.eating_dates_per_person
            .iter()
            .filter(|(_, dates)| dates.contains(&date))
            .map(|(person, _)| person.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpandedPlan {
    pub meals: Vec<ExpandedMeal>,
    pub shopping_trips: Vec<ShoppingTrip>,
}

impl ExpandedPlan {
    pub fn meal(&self, id: &str) -> Option<&ExpandedMeal> {
        self.meals.iter().find(|m| m.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_tracks_per_person() {
        let mut ing = ExpandedIngredient::new("spaghetti", "g", "pantry");
        ing.set_person("John", 334.0, 2);
        ing.set_person("Jane", 100.0, 1);
        assert_eq!(ing.quantity(), 434.0);

        ing.set_person("Jane", 120.0, 1);
        assert_eq!(ing.quantity(), 454.0);
    }

    #[test]
    fn test_scale_people_selected_only() {
        let mut ing = ExpandedIngredient::new("milk", "ml", "dairy");
        ing.set_person("John", 200.0, 1);
        ing.set_person("Jane", 100.0, 1);

        ing.scale_people(|person| (person == "John").then_some(1.046));

        assert_eq!(ing.person("John").unwrap().quantity, 209.0);
        assert_eq!(ing.person("Jane").unwrap().quantity, 100.0);
        assert_eq!(ing.quantity(), 309.0);
    }

    #[test]
    fn test_set_quantity_keeps_portions() {
        let mut ing = ExpandedIngredient::new("pudding", "g", "pantry");
        ing.set_person("Jane", 66.0, 2);
        ing.set_quantity("Jane", 65.0);
        ing.set_quantity("Ghost", 10.0);

        assert_eq!(ing.person("Jane").unwrap().portions, 2);
        assert_eq!(ing.quantity(), 65.0);
        assert!(ing.person("Ghost").is_none());
    }

    #[test]
    fn test_quantity_per_portion() {
        let mut ing = ExpandedIngredient::new("rice", "g", "pantry");
        ing.set_person("John", 300.0, 3);
        ing.set_person("Jane", 0.0, 0);
        assert_eq!(ing.quantity_per_portion("John"), Some(100.0));
        assert_eq!(ing.quantity_per_portion("Jane"), None);
        assert_eq!(ing.quantity_per_portion("Ghost"), None);
    }
}
