use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("Recipe not found: {id}{}", did_you_mean(.suggestion))]
    RecipeNotFound {
        id: String,
        suggestion: Option<String>,
    },

    #[error("Unknown person '{person}' in meal '{meal}': no diet profile configured")]
    UnknownPerson { person: String, meal: String },

    #[error("Catalog entry missing for ingredient: {0}")]
    CatalogEntryMissing(String),

    #[error("Shopping trip {trip} references unknown scheduled meal: {id}")]
    UnknownScheduledMeal { id: String, trip: String },

    #[error("Invalid meal plan:\n  {}", .0.join("\n  "))]
    Validation(Vec<String>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{}'?)", s),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;
