use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// meal-planner: expands a meal plan into package-rounded shopping lists and tasks.
#[derive(Parser, Debug)]
#[command(name = "meal-planner")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the planner configuration JSON file.
    #[arg(short, long, global = true, default_value = "planner_config.json")]
    pub config: PathBuf,

    /// Path to the meals database (recipes and ingredient catalog).
    #[arg(short, long, global = true, default_value = "meals_database.json")]
    pub recipes: PathBuf,

    /// Path to the meal plan JSON file.
    #[arg(short, long, global = true, default_value = "meal_plan.json")]
    pub plan: PathBuf,

    /// Log at debug level (RUST_LOG is ignored).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Overwrite existing output files without asking.
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Expand, round and compensate the meal plan and show the shopping lists.
    Plan {
        /// Write the planning result as JSON.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show nutrition totals per diet profile.
        #[arg(long)]
        nutrition: bool,

        /// Buy raw quantities instead of whole packages.
        #[arg(long)]
        no_rounding: bool,
    },

    /// Show ingredients that package rounding distorts heavily.
    Warnings,

    /// Generate shopping, prep, cooking and serving tasks.
    Tasks {
        /// Write the tasks as JSON.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Buy raw quantities instead of whole packages.
        #[arg(long)]
        no_rounding: bool,
    },

    /// Export the shopping lists as CSV.
    Export {
        /// Destination CSV file.
        #[arg(long, default_value = "shopping_list.csv")]
        csv: PathBuf,

        /// Buy raw quantities instead of whole packages.
        #[arg(long)]
        no_rounding: bool,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Plan {
            output: None,
            nutrition: false,
            no_rounding: false,
        }
    }
}
