pub mod prompts;
pub mod render;

pub use prompts::prompt_yes_no;
pub use render::{display_nutrition, display_planning_result, display_tasks, display_warnings};
