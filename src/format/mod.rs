//! Display formatting for grid values and error summaries.

mod format;

pub use format::{limit_recurring_decimals, limit_recurring_decimals_str, remove_fluff};
