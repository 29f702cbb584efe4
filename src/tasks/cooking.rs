use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};

use super::{diet_breakdown, meal_type_label, portion_subtasks, portion_word, Task, TaskKind};
use crate::config::PlannerConfig;
use crate::models::{ExpandedMeal, ExpandedPlan};

/// Portions `person` gets from the session cooked on `date`.
///
/// Meal prep cooks every portion at once; a multi-session meal cooks the
/// portions eaten that day.
fn session_portions(meal: &ExpandedMeal, person: &str, date: NaiveDate) -> u32 {
    let Some(dates) = meal.eating_dates_per_person.get(person) else {
        return 0;
    };
    if meal.is_meal_prep() {
        dates.len() as u32
    } else {
        dates.iter().filter(|d| **d == date).count() as u32
    }
}

/// One prep task per prep step per cooking date, due `days_before` the cooking.
pub fn create_prep_tasks(plan: &ExpandedPlan, config: &PlannerConfig) -> Vec<Task> {
    let mut tasks = Vec::new();

    for meal in plan.meals.iter().filter(|m| !m.prep_tasks.is_empty()) {
        for &cooking_date in &meal.cooking_dates {
            for step in &meal.prep_tasks {
                let due = cooking_date
                    .checked_sub_signed(Duration::days(step.days_before))
                    .unwrap_or(cooking_date);

                tasks.push(Task {
                    title: format!("Prep for {}", meal.name),
                    description: format!(
                        "{}\n\nCooking date: {}\n{}",
                        step.description,
                        cooking_date,
                        diet_breakdown(meal, &config.diet_profiles)
                    ),
                    priority: config.prep_priority,
                    assigned_to: step.assigned_to.clone(),
                    due_date: Some(due),
                    labels: Vec::new(),
                    subtasks: portion_subtasks(meal, config, TaskKind::Prep, true, |person| {
                        session_portions(meal, person, cooking_date)
                    }),
                    meal_id: Some(meal.meal_id.clone()),
                    kind: TaskKind::Prep,
                });
            }
        }
    }

    tasks
}

fn cooking_description(meal: &ExpandedMeal, date: NaiveDate, session: usize) -> String {
    let sessions = meal.cooking_dates.len();
    let mut lines = vec![format!("**{}** for {}", meal_type_label(&meal.meal_type), date)];

    let portions: Vec<String> = meal
        .eating_dates_per_person
        .keys()
        .map(|person| (person, session_portions(meal, person, date)))
        .filter(|(_, count)| *count > 0)
        .map(|(person, count)| format!("{}: {} {}", person, count, portion_word(count)))
        .collect();
    if !portions.is_empty() {
        lines.push(format!("Portions: {}", portions.join(", ")));
    }

    if !meal.is_meal_prep() {
        lines.push(format!("Cooking session {} of {}", session + 1, sessions));
    }

    let eaters = meal.eaters_on(date);
    if !eaters.is_empty() {
        lines.push(format!("Eating today: {}", eaters.join(", ")));
    } else if meal.is_meal_prep() {
        lines.push("Meal prep - serving on other days".to_string());
    }

    if let Some(notes) = &meal.notes {
        lines.push(format!("\n{}", notes));
    }

    if !meal.steps.is_empty() {
        lines.push("\nCooking Steps:".to_string());
        lines.extend(
            meal.steps
                .iter()
                .enumerate()
                .map(|(i, step)| format!("{}. {}", i + 1, step)),
        );
    }

    let seasonings = meal.seasonings();
    if !seasonings.is_empty() {
        lines.push(format!(
            "\nSuggested Seasonings: {} (check if you have)",
            seasonings.join(", ")
        ));
    }

    lines.join("\n")
}

/// One cooking task per cooking date, assigned to the cook.
pub fn create_cooking_tasks(plan: &ExpandedPlan, config: &PlannerConfig) -> Vec<Task> {
    let mut tasks = Vec::new();

    for meal in &plan.meals {
        for (session, &date) in meal.cooking_dates.iter().enumerate() {
            let mut title = format!("Cook: {}", meal.name);
            if !meal.is_meal_prep() {
                title.push_str(&format!(" ({})", date));
            }

            tasks.push(Task {
                title,
                description: cooking_description(meal, date, session),
                priority: config.cooking_priority,
                assigned_to: Some(meal.assigned_cook.clone()).filter(|cook| !cook.is_empty()),
                due_date: Some(date),
                labels: Vec::new(),
                subtasks: portion_subtasks(meal, config, TaskKind::Cooking, false, |person| {
                    session_portions(meal, person, date)
                }),
                meal_id: Some(meal.meal_id.clone()),
                kind: TaskKind::Cooking,
            });
        }
    }

    tasks
}

/// Serving tasks for meal-prep meals: one per day someone eats it without
/// it being cooked that day.
pub fn create_eating_tasks(plan: &ExpandedPlan, config: &PlannerConfig) -> Vec<Task> {
    let mut tasks = Vec::new();

    for meal in plan.meals.iter().filter(|m| m.is_meal_prep()) {
        let cooked: BTreeSet<NaiveDate> = meal.cooking_dates.iter().copied().collect();
        let serving_dates: BTreeSet<NaiveDate> = meal
            .eating_dates_per_person
            .values()
            .flatten()
            .copied()
            .filter(|d| !cooked.contains(d))
            .collect();

        for date in serving_dates {
            let eaters = meal.eaters_on(date);
            tasks.push(Task {
                title: format!("Serve: {}", meal.name),
                description: format!(
                    "{}\nPeople: {}",
                    meal_type_label(&meal.meal_type),
                    eaters.join(", ")
                ),
                priority: config.eating_priority,
                assigned_to: None,
                due_date: Some(date),
                labels: Vec::new(),
                subtasks: portion_subtasks(meal, config, TaskKind::Eating, false, |person| {
                    meal.eating_dates_per_person
                        .get(person)
                        .map(|dates| dates.iter().filter(|d| **d == date).count() as u32)
                        .unwrap_or(0)
                }),
                meal_id: Some(meal.meal_id.clone()),
                kind: TaskKind::Eating,
            });
        }
    }

    tasks
}
