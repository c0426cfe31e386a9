use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use urlstate::{MemoryHistory, Options, Query, UpdateMode, UrlRuntime, UrlState};

fn binding_creation_benchmark(c: &mut Criterion) {
    c.bench_function("binding_creation", |b| {
        UrlRuntime::scope(|| {
            // Keep the registry non-empty so creation cost is measured
            // without monitor activation churn
            let _anchor: UrlState<i32> = UrlState::new("anchor", 0);
            b.iter(|| {
                let binding: UrlState<i32> = UrlState::new("xP", black_box(6));
                binding
            });
        });
    });
}

fn binding_read_benchmark(c: &mut Criterion) {
    UrlRuntime::scope(|| {
        let binding: UrlState<i32> = UrlState::new("xP", 6);

        c.bench_function("binding_read", |b| {
            b.iter(|| {
                black_box(binding.get());
            });
        });
    });
}

fn binding_write_benchmark(c: &mut Criterion) {
    let history = MemoryHistory::new();
    let runtime = UrlRuntime::new(history);
    UrlRuntime::with_runtime(runtime, || {
        // Replace mode keeps the history at one entry across iterations
        let binding: UrlState<i32> = UrlState::with_options(
            "xP",
            6,
            Options {
                replace: true,
                ..Options::default()
            },
        );

        c.bench_function("binding_write", |b| {
            let mut i = 0;
            b.iter(|| {
                binding.set(black_box(i));
                i += 1;
            });
        });
    });
}

fn reconcile_benchmark(c: &mut Criterion) {
    let history = MemoryHistory::with_search("xP=6&xN=5&yP=4&yN=3&base=10");
    let runtime = UrlRuntime::new(history.clone());
    let _subs: Vec<_> = ["xP", "xN", "yP", "yN", "base"]
        .iter()
        .map(|key| runtime.subscribe(key, |_| {}))
        .collect();

    c.bench_function("reconcile_unchanged", |b| {
        b.iter(|| {
            runtime.reconcile();
        });
    });

    c.bench_function("reconcile_changed", |b| {
        let mut i = 0;
        b.iter(|| {
            history.set_search_untracked(&format!("xP={i}&xN=5&yP=4&yN=3&base=10"));
            runtime.reconcile();
            i += 1;
        });
    });
}

fn query_parse_benchmark(c: &mut Criterion) {
    c.bench_function("query_parse", |b| {
        b.iter(|| {
            black_box(Query::parse(black_box(
                "xP=6&xN=5&yP=4&yN=3&base=10&visible=0.0_1.2_3.4",
            )))
        });
    });
}

fn update_url_benchmark(c: &mut Criterion) {
    let history = MemoryHistory::new();
    let runtime = UrlRuntime::new(history);
    let _sub = runtime.subscribe("xP", |_| {});

    c.bench_function("update_url", |b| {
        let mut i = 0;
        b.iter(|| {
            runtime.update_url("xP", Some(&i.to_string()), UpdateMode::Replace);
            i += 1;
        });
    });
}

criterion_group!(
    benches,
    binding_creation_benchmark,
    binding_read_benchmark,
    binding_write_benchmark,
    reconcile_benchmark,
    query_parse_benchmark,
    update_url_benchmark
);
criterion_main!(benches);
