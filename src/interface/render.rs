use crate::models::RoundingWarning;
use crate::planner::{MealNutrition, PlanningResult, ProfileNutrition, TripShoppingList};
use crate::tasks::Task;

fn trip_heading(trip: &TripShoppingList) -> String {
    match trip.date {
        Some(date) => format!("Trip {} ({})", trip.index + 1, date),
        None => "Shopping list".to_string(),
    }
}

/// Display the shopping lists and calorie bookkeeping of a planning result.
pub fn display_planning_result(result: &PlanningResult) {
    println!();
    println!("=== Meal Plan ===");
    println!();

    for meal in &result.plan.meals {
        let mode = if meal.is_meal_prep() { "meal prep" } else { "multi-session" };
        println!(
            "  {} [{}] - {} portions, {}",
            meal.name,
            meal.id,
            meal.total_portions(),
            mode
        );
    }

    for trip in &result.trips {
        println!();
        println!("--- {} ---", trip_heading(trip));

        let max_name_len = trip.items.iter().map(|i| i.name.len()).max().unwrap_or(10);
        for item in &trip.items {
            let packages = match item.packages() {
                Some(count) => format!(
                    "  ({} x {}{})",
                    count,
                    item.package_size.unwrap_or(0.0),
                    item.unit
                ),
                None => String::new(),
            };
            println!(
                "  {:<width$} {:>8.0} {:<4} need {:>6.0}{}",
                item.name,
                item.quantity,
                item.unit,
                item.needed,
                packages,
                width = max_name_len
            );
        }
    }

    println!();
    println!("--- Summary ---");
    println!("Meals: {}", result.plan.meals.len());
    println!("Shopping trips: {}", result.trips.len());
    if !result.rounding_applied {
        println!("Package rounding: off");
    }
    for (profile, delta) in &result.calorie_adjustments {
        let sign = if *delta >= 0.0 { "+" } else { "" };
        let factor = result.compensation.factors.get(profile).copied().unwrap_or(1.0);
        println!(
            "Rounding {}: {}{:.1} kcal, compensation x{:.3}",
            profile, sign, delta, factor
        );
    }
    for (profile, unresolved) in &result.compensation.unresolved {
        println!("Unresolved {}: {:.1} kcal", profile, unresolved);
    }
    println!();
}

/// Display rounding warnings with their portion suggestions.
pub fn display_warnings(warnings: &[RoundingWarning]) {
    if warnings.is_empty() {
        println!("No rounding warnings.");
        return;
    }

    println!();
    println!("=== Rounding Warnings ({}) ===", warnings.len());
    println!();

    for warning in warnings {
        println!(
            "  {}: {:.0}% change ({:.0} -> {:.0}, packs of {:.0})",
            warning.ingredient_name,
            warning.percent_change * 100.0,
            warning.original_quantity,
            warning.rounded_quantity,
            warning.unit_size
        );
        for meal in &warning.meals {
            match meal.suggested_additional_portions {
                0 => println!(
                    "      {} ({} portions): no practical fix",
                    meal.meal_name, meal.current_portions
                ),
                extra => println!(
                    "      {} ({} portions): add {}",
                    meal.meal_name, meal.current_portions, extra
                ),
            }
        }
        if warning.combined_increase > 0 {
            println!(
                "      or add {} portion(s) to every meal above",
                warning.combined_increase
            );
        }
    }

    println!();
}

fn print_profile_lines(nutrition: &ProfileNutrition, indent: &str) {
    for (profile, totals) in nutrition {
        println!(
            "{}{}: {:.0} kcal, F:{:.1} P:{:.1} C:{:.1}",
            indent, profile, totals.calories, totals.fat, totals.protein, totals.carbs
        );
    }
}

/// Display per-profile nutrition for each scheduled meal, then plan totals.
pub fn display_nutrition(by_meal: &[MealNutrition], totals: &ProfileNutrition) {
    println!("--- Nutrition per meal ---");
    for meal in by_meal {
        println!("  {} [{}]", meal.name, meal.id);
        print_profile_lines(&meal.per_profile, "    ");
    }
    println!();

    println!("--- Nutrition per diet profile ---");
    print_profile_lines(totals, "  ");
    println!();
}

/// Display tasks with their subtasks, one line each.
pub fn display_tasks(tasks: &[Task]) {
    println!();
    println!("=== Tasks ({}) ===", tasks.len());
    println!();

    for task in tasks {
        let due = task.due_date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string());
        let who = task.assigned_to.as_deref().unwrap_or("");
        println!("  [{}] p{} {} {} {}", due, task.priority, task.title, who, task.labels.join(","));
        for subtask in &task.subtasks {
            println!("      - {}", subtask.title);
        }
    }

    println!();
}
