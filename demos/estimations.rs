//! Record estimations, persist them, and print the accuracy summary.

use std::sync::Arc;

use urlstate::{
    limit_recurring_decimals, summary_rows, EstimationStore, Estimations, MemoryStorage,
};

fn main() {
    let storage = Arc::new(MemoryStorage::new());
    let store = EstimationStore::load(storage, Estimations::default());

    store.subscribe(|estimations| {
        let count = estimations.iter().count();
        println!("  ({count} estimates recorded)");
    });

    // Actuals for (row, column) are 2^column * 3^row
    store.set_estimate(0, 2, Some(4.0)); // actual 4: exact
    store.set_estimate(1, 2, Some(13.0)); // actual 12: ~8% high
    store.set_estimate(2, -1, Some(4.3)); // actual 4.5: ~4% low

    println!("\nSummary (1-100):");
    for row in summary_rows(&store.get(), 2.0, 3.0) {
        if let (Some(estimate), Some(error), Some(percentage)) =
            (&row.estimate, &row.error, &row.percentage)
        {
            println!(
                "  {:>3}: estimated {} (error {}, {})",
                row.number, estimate, error, percentage
            );
        }
    }

    println!(
        "\n1/3 displays as {}",
        limit_recurring_decimals(1.0 / 3.0)
    );
}
