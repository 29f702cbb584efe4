//! Planner configuration.
//!
//! Loaded from a JSON file (defaults when the file does not exist) and passed
//! explicitly into the engine and the task synthesizer.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{PlannerError, Result};
use crate::planner::constants::*;

/// Person → diet profile mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DietProfiles(BTreeMap<String, String>);

impl DietProfiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, person: impl Into<String>, profile: impl Into<String>) -> Self {
        self.0.insert(person.into(), profile.into());
        self
    }

    /// Profile for `person`, if configured.
    pub fn profile_of(&self, person: &str) -> Option<&str> {
        self.0.get(person).map(String::as_str)
    }

    /// Profile for `person`, failing with `UnknownPerson` naming `meal`.
    pub fn require(&self, person: &str, meal: &str) -> Result<&str> {
        self.profile_of(person)
            .ok_or_else(|| PlannerError::UnknownPerson {
                person: person.to_string(),
                meal: meal.to_string(),
            })
    }

    /// Configured people, sorted by name.
    pub fn people(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Search limits for rounding warnings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarningLimits {
    /// Relative plan-wide change above which a warning is raised.
    pub change_threshold: f64,
    /// Relative error a single meal's suggestion must reach.
    pub meal_tolerance: f64,
    /// Largest extra-portion count tried for a single meal.
    pub max_meal_increase: u32,
    /// Largest extra-portion count tried for all meals together.
    pub max_combined_increase: u32,
    /// Per-meal suggestions above this are dropped from the warning.
    pub max_practical_increase: u32,
}

impl Default for WarningLimits {
    fn default() -> Self {
        Self {
            change_threshold: ROUNDING_WARNING_THRESHOLD,
            meal_tolerance: MEAL_SUGGESTION_TOLERANCE,
            max_meal_increase: MAX_MEAL_SUGGESTION,
            max_combined_increase: MAX_COMBINED_INCREASE,
            max_practical_increase: MAX_PRACTICAL_SUGGESTION,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub diet_profiles: DietProfiles,

    /// Shopping list category order.
    pub shopping_categories: Vec<String>,

    /// Attach the category as a label on shopping subtasks.
    pub use_category_labels: bool,

    pub shopping_priority: u8,
    pub prep_priority: u8,
    pub cooking_priority: u8,
    pub eating_priority: u8,

    /// Round packaged ingredients to whole packages.
    pub enable_ingredient_rounding: bool,

    pub warning_limits: WarningLimits,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            diet_profiles: DietProfiles::default(),
            shopping_categories: DEFAULT_SHOPPING_CATEGORIES
                .iter()
                .map(|c| c.to_string())
                .collect(),
            use_category_labels: true,
            shopping_priority: 2,
            prep_priority: 2,
            cooking_priority: 3,
            eating_priority: 3,
            enable_ingredient_rounding: true,
            warning_limits: WarningLimits::default(),
        }
    }
}

impl PlannerConfig {
    /// Load configuration from a JSON file, or defaults if it does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("Config file not found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        info!("Loading config from {}", path.display());
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(person) = self
            .diet_profiles
            .0
            .iter()
            .find(|(person, profile)| person.trim().is_empty() || profile.trim().is_empty())
            .map(|(person, _)| person)
        {
            return Err(PlannerError::InvalidInput(format!(
                "diet profile mapping for '{}' is empty",
                person
            )));
        }

        let limits = &self.warning_limits;
        if limits.change_threshold <= 0.0 || limits.meal_tolerance <= 0.0 {
            return Err(PlannerError::InvalidInput(
                "warning thresholds must be positive".to_string(),
            ));
        }
        if limits.max_meal_increase == 0 || limits.max_combined_increase == 0 {
            return Err(PlannerError::InvalidInput(
                "warning search limits must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Position of `category` in the configured order; unknown categories sort last.
    pub fn category_rank(&self, category: &str) -> usize {
        self.shopping_categories
            .iter()
            .position(|c| c == category)
            .unwrap_or(self.shopping_categories.len())
    }
}
