use std::io;
use std::path::Path;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use meal_round_planner_rs::cli::{Cli, Command};
use meal_round_planner_rs::config::PlannerConfig;
use meal_round_planner_rs::error::Result;
use meal_round_planner_rs::interface::{
    display_nutrition, display_planning_result, display_tasks, display_warnings, prompt_yes_no,
};
use meal_round_planner_rs::models::MealPlan;
use meal_round_planner_rs::planner::{
    check_rounding_warnings, nutrition_by_meal, plan_meal_plan, plan_nutrition,
    validate_meal_plan, PlanningResult,
};
use meal_round_planner_rs::state::{
    load_meal_plan, load_meals_database, save_json, write_shopping_csv, RecipeBook,
};
use meal_round_planner_rs::tasks::generate_all_tasks;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    // RUST_LOG controls the level unless --verbose is given
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Inputs every command works from.
struct Session {
    config: PlannerConfig,
    book: RecipeBook,
    plan: MealPlan,
    assume_yes: bool,
}

impl Session {
    fn load(cli: &Cli) -> Result<Self> {
        let config = PlannerConfig::load(&cli.config)?;
        if config.diet_profiles.is_empty() {
            warn!("no diet profiles configured, every eater will be unknown");
        }

        let book = RecipeBook::new(load_meals_database(&cli.recipes)?);
        if book.is_empty() {
            warn!("meals database has no recipes");
        }
        for name in book.uncatalogued_ingredients() {
            warn!(ingredient = name, "no catalog entry, bought as needed");
        }

        let plan = load_meal_plan(&cli.plan)?;
        validate_meal_plan(&plan, &book, &config.diet_profiles)?;

        Ok(Self {
            config,
            book,
            plan,
            assume_yes: cli.yes,
        })
    }

    fn plan(&mut self, no_rounding: bool) -> Result<PlanningResult> {
        if no_rounding {
            self.config.enable_ingredient_rounding = false;
        }
        plan_meal_plan(&self.plan, &self.book, &self.config)
    }

    /// Whether `path` may be written, asking before replacing an existing file.
    fn may_write(&self, path: &Path) -> Result<bool> {
        if self.assume_yes || !path.exists() {
            return Ok(true);
        }
        prompt_yes_no(&format!("{} exists. Overwrite?", path.display()), false)
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut session = Session::load(&cli)?;

    match cli.command.unwrap_or_default() {
        Command::Plan {
            output,
            nutrition,
            no_rounding,
        } => cmd_plan(&mut session, output.as_deref(), nutrition, no_rounding),
        Command::Warnings => cmd_warnings(&session),
        Command::Tasks { output, no_rounding } => {
            cmd_tasks(&mut session, output.as_deref(), no_rounding)
        }
        Command::Export { csv, no_rounding } => cmd_export(&mut session, &csv, no_rounding),
    }
}

/// Plan the meal plan and show the shopping lists.
fn cmd_plan(
    session: &mut Session,
    output: Option<&Path>,
    nutrition: bool,
    no_rounding: bool,
) -> Result<()> {
    let result = session.plan(no_rounding)?;

    display_planning_result(&result);
    if !result.warnings.is_empty() {
        display_warnings(&result.warnings);
    }

    if nutrition {
        let catalog = session.book.catalog();
        let profiles = &session.config.diet_profiles;
        let by_meal = nutrition_by_meal(&result.plan, catalog, profiles)?;
        let totals = plan_nutrition(&result.plan, catalog, profiles)?;
        display_nutrition(&by_meal, &totals);
    }

    if let Some(path) = output {
        if session.may_write(path)? {
            save_json(path, &result)?;
            println!("Planning result saved to {}.", path.display());
        }
    }

    Ok(())
}

/// Show rounding warnings, whether or not rounding is enabled.
fn cmd_warnings(session: &Session) -> Result<()> {
    let warnings = check_rounding_warnings(&session.plan, &session.book, &session.config)?;
    display_warnings(&warnings);
    Ok(())
}

/// Generate and show tasks.
fn cmd_tasks(session: &mut Session, output: Option<&Path>, no_rounding: bool) -> Result<()> {
    let result = session.plan(no_rounding)?;
    let tasks = generate_all_tasks(&result, &session.config);

    display_tasks(&tasks);

    if let Some(path) = output {
        if session.may_write(path)? {
            save_json(path, &tasks)?;
            println!("{} tasks saved to {}.", tasks.len(), path.display());
        }
    }

    Ok(())
}

/// Export shopping lists as CSV.
fn cmd_export(session: &mut Session, csv: &Path, no_rounding: bool) -> Result<()> {
    let result = session.plan(no_rounding)?;

    if !session.may_write(csv)? {
        println!("Export cancelled.");
        return Ok(());
    }

    write_shopping_csv(csv, &result.trips)?;
    println!(
        "Exported {} shopping trip(s) to {}.",
        result.trips.len(),
        csv.display()
    );
    Ok(())
}
