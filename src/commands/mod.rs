//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod combine;
pub mod formulas;
pub mod models;
pub mod topdown;
pub mod view;

// Re-export main command functions
pub use combine::execute_combine;
pub use formulas::execute_formulas;
pub use models::{CombineArgs, TopdownArgs, ViewArgs};
pub use topdown::execute_topdown;
pub use view::execute_view;
