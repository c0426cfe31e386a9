use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

use super::Estimations;
use crate::format::remove_fluff;

/// Numbers below 2000 composable from the factors 2, 3 and 5.
pub fn factorable() -> &'static BTreeSet<u64> {
    static FACTORABLE: OnceLock<BTreeSet<u64>> = OnceLock::new();
    FACTORABLE.get_or_init(|| {
        let mut set = BTreeSet::new();
        add_multiples(&mut set, 2);
        add_multiples(&mut set, 3);
        add_multiples(&mut set, 5);
        set
    })
}

fn add_multiples(set: &mut BTreeSet<u64>, factor: u64) {
    set.insert(factor);
    let mut queue: Vec<u64> = set.iter().copied().collect();
    while let Some(number) = queue.pop() {
        let mut multiple = number * factor;
        if set.contains(&multiple) {
            continue;
        }
        while multiple < 2000 {
            if set.insert(multiple) {
                queue.push(multiple);
            }
            multiple *= factor;
        }
    }
}

/// One line of the 1–100 accuracy summary.
#[derive(Clone, Debug, PartialEq)]
pub struct SummaryRow {
    pub number: u64,
    /// The estimate that claims this number, if any.
    pub estimate: Option<String>,
    /// Fluff-trimmed error ratio of the claiming estimate.
    pub error: Option<String>,
    /// Percentage error, e.g. `25%` for a ratio of 1.25.
    pub percentage: Option<String>,
    /// Whether the number itself is composable from the grid factors.
    pub composable: bool,
}

/// Derive the accuracy summary for the numbers 1 through 100.
///
/// Each recorded estimate is compared against its cell's actual value
/// `x_factor^column * y_factor^row`, and claims every number reachable
/// by scaling the estimate with a factorable multiplier to within 1e-4
/// of an integer.
pub fn summary_rows(estimations: &Estimations, x_factor: f64, y_factor: f64) -> Vec<SummaryRow> {
    let mut claimed: HashMap<u64, (String, String)> = HashMap::new();

    for (row, column, estimate) in estimations.iter() {
        let actual = x_factor.powi(column) * y_factor.powi(row);
        let error = remove_fluff(estimate / actual);
        let Some(places) = decimal_places(estimate) else {
            tracing::warn!(estimate, "estimate has no usable magnitude");
            continue;
        };
        let upscale = 10f64.powi(places);

        let mut add_factor = |num: u64| {
            let multiple = estimate * num as f64 * upscale;
            if (multiple - multiple.round()).abs() > 0.0001 {
                return;
            }
            claimed.insert(
                multiple.round() as u64,
                (format!("{estimate}"), error.clone()),
            );
        };
        add_factor(1);
        for &num in factorable() {
            add_factor(num);
        }
    }

    (1..=100)
        .map(|number| {
            let entry = claimed.get(&number);
            let percentage = entry.and_then(|(_, error)| {
                let ratio: f64 = error.parse().ok()?;
                Some(format!("{}%", remove_fluff((ratio - 1.0) * 100.0)))
            });
            SummaryRow {
                number,
                estimate: entry.map(|(estimate, _)| estimate.clone()),
                error: entry.map(|(_, error)| error.clone()),
                percentage,
                composable: factorable().contains(&number) || number == 1,
            }
        })
        .collect()
}

/// Smallest power of ten that scales `num` above one, probed from 1e-5
/// upward.
fn decimal_places(num: f64) -> Option<i32> {
    (-5..50).find(|&i| num * 10f64.powi(i) > 1.0)
}
