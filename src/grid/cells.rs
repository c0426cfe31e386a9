use crate::binding::UrlState;
use crate::codec::Coordinate;

/// Per-cell activation over a shared coordinate-list binding.
///
/// Backs the `visible` and `masked` keys: many cells share one list,
/// each cell toggles only its own membership. An unset list falls back
/// to the default activation set; emptying the list resets the key to
/// unset so the URI stays minimal.
#[derive(Clone)]
pub struct CellToggle {
    state: UrlState<Option<Vec<Coordinate>>>,
    cell: Coordinate,
    default_active: bool,
}

impl CellToggle {
    pub fn new(
        state: &UrlState<Option<Vec<Coordinate>>>,
        cell: Coordinate,
        default_active: bool,
    ) -> Self {
        Self {
            state: state.clone(),
            cell,
            default_active,
        }
    }

    fn effective(&self) -> Vec<Coordinate> {
        self.state.get().unwrap_or_else(|| {
            if self.default_active {
                vec![self.cell]
            } else {
                Vec::new()
            }
        })
    }

    pub fn is_active(&self) -> bool {
        self.effective().contains(&self.cell)
    }

    pub fn toggle(&self) {
        let current = self.effective();
        if !self.is_active() {
            let mut next = current;
            next.push(self.cell);
            self.state.set(Some(next));
            return;
        }
        let filtered: Vec<Coordinate> = current
            .into_iter()
            .filter(|coord| *coord != self.cell)
            .collect();
        self.state
            .set(if filtered.is_empty() { None } else { Some(filtered) });
    }
}
