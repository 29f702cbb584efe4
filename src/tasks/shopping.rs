use std::collections::BTreeSet;

use super::{diet_breakdown, format_quantity, Task, TaskKind};
use crate::config::PlannerConfig;
use crate::models::ExpandedMeal;
use crate::planner::{PlanningResult, ShoppingItem, TripShoppingList, SEASONING_CATEGORY};

fn item_title(item: &ShoppingItem) -> String {
    let mut title = format!("{}{} {}", format_quantity(item.quantity), item.unit, item.name);
    if let Some(display) = &item.display {
        title.push_str(&format!(" [{}]", display));
    }
    if let Some(notes) = &item.notes {
        title.push_str(&format!(" ({})", notes));
    }
    title
}

/// `Spaghetti x2, Pudding`: counts cooking sessions per recipe name.
fn meal_summary(meals: &[&ExpandedMeal]) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for meal in meals {
        let sessions = meal.cooking_dates.len();
        match counts.iter_mut().find(|(name, _)| *name == meal.name) {
            Some((_, count)) => *count += sessions,
            None => counts.push((meal.name.as_str(), sessions)),
        }
    }
    counts
        .iter()
        .map(|(name, count)| {
            if *count > 1 {
                format!("{} x{}", name, count)
            } else {
                name.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn labels_for(category: &str, config: &PlannerConfig) -> Vec<String> {
    if config.use_category_labels {
        vec![category.to_string()]
    } else {
        Vec::new()
    }
}

fn trip_subtasks(
    trip: &TripShoppingList,
    meals: &[&ExpandedMeal],
    config: &PlannerConfig,
) -> Vec<Task> {
    // (category rank, seasoning after bought items, name)
    let mut keyed: Vec<((usize, bool, String), Task)> = trip
        .items
        .iter()
        .map(|item| {
            let key = (config.category_rank(&item.category), false, item.name.clone());
            let task = Task::subtask(
                TaskKind::Shopping,
                item_title(item),
                String::new(),
                labels_for(&item.category, config),
            );
            (key, task)
        })
        .collect();

    let mut seen: BTreeSet<String> = trip.items.iter().map(|i| i.name.to_lowercase()).collect();
    for seasoning in meals.iter().flat_map(|m| m.seasonings()) {
        if !seen.insert(seasoning.to_lowercase()) {
            continue;
        }
        let key = (config.category_rank(SEASONING_CATEGORY), true, seasoning.clone());
        let task = Task::subtask(
            TaskKind::Shopping,
            format!("{} (check if you have)", seasoning),
            String::new(),
            labels_for(SEASONING_CATEGORY, config),
        );
        keyed.push((key, task));
    }

    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    keyed.into_iter().map(|(_, task)| task).collect()
}

/// One shopping task per trip, items in configured category order.
pub fn create_shopping_tasks(result: &PlanningResult, config: &PlannerConfig) -> Vec<Task> {
    result
        .trips
        .iter()
        .map(|trip| {
            let meals: Vec<&ExpandedMeal> = trip
                .meal_ids
                .iter()
                .filter_map(|id| result.plan.meal(id))
                .collect();

            let mut description = vec!["Shopping list".to_string()];
            description.extend(meals.iter().map(|m| diet_breakdown(m, &config.diet_profiles)));

            Task {
                title: format!("Shopping for: {}", meal_summary(&meals)),
                description: description.join("\n"),
                priority: config.shopping_priority,
                assigned_to: None,
                due_date: trip.date,
                labels: Vec::new(),
                subtasks: trip_subtasks(trip, &meals, config),
                meal_id: None,
                kind: TaskKind::Shopping,
            }
        })
        .collect()
}
