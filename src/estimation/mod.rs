//! Recorded estimations and their error summaries.

mod store;
mod summary;

pub use store::{EstimationStore, Estimations};
pub use summary::{factorable, summary_rows, SummaryRow};
