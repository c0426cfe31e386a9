//! Watch bindings follow browser-style navigation without any writes.

use urlstate::{MemoryHistory, UrlRuntime, UrlState};

fn main() {
    let history = MemoryHistory::with_search("xP=6");
    let runtime = UrlRuntime::new(history.clone());

    UrlRuntime::with_runtime(runtime, || {
        let x_positive = UrlState::new("xP", 5);
        println!("initial:        xP = {}", x_positive.get());

        x_positive.set(4);
        println!("after write:    xP = {} (?{})", x_positive.get(), history.search());

        // The user presses the back button
        history.back();
        println!("after back:     xP = {} (?{})", x_positive.get(), history.search());

        history.forward();
        println!("after forward:  xP = {} (?{})", x_positive.get(), history.search());

        // Another feature rewrites history behind our back; the
        // monitor hook picks it up all the same
        history.push_state("xP=12");
        println!("external push:  xP = {} (?{})", x_positive.get(), history.search());
    });
}
