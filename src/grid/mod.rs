//! The estimation grid: axis geometry, cell values, and the bundle of
//! URL-bound controls that configure them.

mod cells;
mod grid;
mod view;

pub use cells::CellToggle;
pub use grid::{format_radix, Cell, GridSpec};
pub use view::GridView;
