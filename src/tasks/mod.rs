//! Task synthesis: turns a planning result into shopping, prep, cooking and
//! serving tasks with English text.

mod cooking;
mod shopping;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::{DietProfiles, PlannerConfig};
use crate::models::{ExpandedIngredient, ExpandedMeal};
use crate::planner::PlanningResult;

pub use cooking::{create_cooking_tasks, create_eating_tasks, create_prep_tasks};
pub use shopping::create_shopping_tasks;

/// Priority of every subtask (1 = urgent, 4 = low).
pub const SUBTASK_PRIORITY: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Shopping,
    Prep,
    Cooking,
    Eating,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    pub title: String,
    pub description: String,
    pub priority: u8,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<Task>,

    /// Recipe id the task belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal_id: Option<String>,

    pub kind: TaskKind,
}

impl Task {
    fn subtask(kind: TaskKind, title: String, description: String, labels: Vec<String>) -> Self {
        Self {
            title,
            description,
            priority: SUBTASK_PRIORITY,
            assigned_to: None,
            due_date: None,
            labels,
            subtasks: Vec::new(),
            meal_id: None,
            kind,
        }
    }
}

/// Every task for a planning result: shopping, then prep, cooking and serving.
pub fn generate_all_tasks(result: &PlanningResult, config: &PlannerConfig) -> Vec<Task> {
    let mut tasks = create_shopping_tasks(result, config);
    tasks.extend(create_prep_tasks(&result.plan, config));
    tasks.extend(create_cooking_tasks(&result.plan, config));
    tasks.extend(create_eating_tasks(&result.plan, config));
    tasks
}

/// Whole numbers without a fraction, anything else to one decimal.
pub(crate) fn format_quantity(quantity: f64) -> String {
    if (quantity - quantity.round()).abs() < 1e-9 {
        format!("{}", quantity.round() as i64)
    } else {
        format!("{:.1}", quantity)
    }
}

pub(crate) fn meal_type_label(meal_type: &str) -> String {
    match meal_type {
        "breakfast" => "Breakfast".to_string(),
        "second_breakfast" => "2nd Breakfast".to_string(),
        "dinner" => "Dinner".to_string(),
        "supper" => "Supper".to_string(),
        other => {
            let mut chars = other.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

fn portion_word(count: u32) -> &'static str {
    if count == 1 { "portion" } else { "portions" }
}

/// `• Spaghetti: 2 high_calorie, 1 low_calorie`
fn diet_breakdown(meal: &ExpandedMeal, profiles: &DietProfiles) -> String {
    let mut counts: BTreeMap<&str, u32> = BTreeMap::new();
    for (person, dates) in &meal.eating_dates_per_person {
        let profile = profiles.profile_of(person).unwrap_or(person);
        *counts.entry(profile).or_insert(0) += dates.len() as u32;
    }
    let parts: Vec<String> = counts
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(profile, count)| format!("{} {}", count, profile))
        .collect();
    format!("• {}: {}", meal.name, parts.join(", "))
}

/// Ingredients in shopping-category order, then by name.
fn in_category_order<'a>(
    ingredients: &'a [ExpandedIngredient],
    config: &PlannerConfig,
) -> Vec<&'a ExpandedIngredient> {
    let mut sorted: Vec<&ExpandedIngredient> = ingredients.iter().collect();
    sorted.sort_by(|a, b| {
        config
            .category_rank(&a.category)
            .cmp(&config.category_rank(&b.category))
            .then_with(|| a.name.cmp(&b.name))
    });
    sorted
}

/// One "Portion for <person>" subtask per person with portions.
///
/// `portions_of` gives how many portions each person gets from this task;
/// quantities scale from the person's per-portion quantity.
fn portion_subtasks<F>(
    meal: &ExpandedMeal,
    config: &PlannerConfig,
    kind: TaskKind,
    label_person: bool,
    portions_of: F,
) -> Vec<Task>
where
    F: Fn(&str) -> u32,
{
    let ingredients = in_category_order(&meal.ingredients, config);

    meal.eating_dates_per_person
        .keys()
        .filter_map(|person| {
            let portions = portions_of(person);
            if portions == 0 {
                return None;
            }

            let lines: Vec<String> = ingredients
                .iter()
                .filter_map(|ingredient| {
                    let share = ingredient.person(person)?;
                    let quantity = if share.portions == portions {
                        share.quantity
                    } else {
                        (ingredient.quantity_per_portion(person)? * portions as f64).round()
                    };
                    Some(format!(
                        "- {}{} {}",
                        format_quantity(quantity),
                        share.unit,
                        ingredient.name
                    ))
                })
                .collect();
            if lines.is_empty() {
                return None;
            }

            let labels = if label_person { vec![person.clone()] } else { Vec::new() };
            Some(Task::subtask(
                kind,
                format!("Portion for {}", person),
                lines.join("\n"),
                labels,
            ))
        })
        .collect()
}
