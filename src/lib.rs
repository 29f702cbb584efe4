pub mod cli;
pub mod config;
pub mod error;
pub mod interface;
pub mod models;
pub mod planner;
pub mod state;
pub mod tasks;

pub use error::{PlannerError, Result};
pub use planner::{plan_meal_plan, PlanningResult};
