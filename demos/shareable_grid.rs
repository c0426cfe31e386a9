//! Build a grid view, tweak it, and print the shareable link.

use urlstate::{GridView, MemoryHistory, UrlRuntime};

fn main() {
    let history = MemoryHistory::new();
    let runtime = UrlRuntime::new(history.clone());

    UrlRuntime::with_runtime(runtime, || {
        let view = GridView::bind();

        println!("Default grid ({} x {}):", view.spec().rows(), view.spec().columns());
        print_grid(&view);

        // Shrink the grid and switch the display base
        view.x_positive.set(2);
        view.x_negative.set(1);
        view.y_positive.set(2);
        view.y_negative.set(1);
        view.base.set(16);

        println!("\nHex grid:");
        print_grid(&view);

        println!("\nShare this view as: ?{}", history.search());
    });
}

fn print_grid(view: &GridView) {
    let spec = view.spec();
    for i in 0..spec.rows() {
        let row: Vec<String> = (0..spec.columns())
            .map(|j| format!("{:>10}", spec.display(&spec.cell(i, j))))
            .collect();
        println!("{}", row.join(" "));
    }
}
