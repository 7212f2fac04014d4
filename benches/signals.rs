//! Benchmarks for reactive-core
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use reactive_core::{batch, computed, effect, reactive_ref};

// =============================================================================
// REF BENCHMARKS
// =============================================================================

fn bench_ref_create(c: &mut Criterion) {
    c.bench_function("ref_create", |b| {
        b.iter(|| black_box(reactive_ref(0i32)))
    });
}

fn bench_ref_get(c: &mut Criterion) {
    let r = reactive_ref(42i32);
    c.bench_function("ref_get", |b| b.iter(|| black_box(r.get())));
}

fn bench_ref_set(c: &mut Criterion) {
    let r = reactive_ref(0i32);
    c.bench_function("ref_set", |b| b.iter(|| r.set(black_box(42))));
}

fn bench_ref_set_same_value(c: &mut Criterion) {
    let r = reactive_ref(42i32);
    c.bench_function("ref_set_same_value", |b| b.iter(|| r.set(black_box(42))));
}

// =============================================================================
// COMPUTED BENCHMARKS
// =============================================================================

fn bench_computed_create(c: &mut Criterion) {
    let r = reactive_ref(0i32);
    c.bench_function("computed_create", |b| {
        let r = r.clone();
        b.iter(|| {
            black_box(computed({
                let r = r.clone();
                move || r.get() * 2
            }))
        })
    });
}

fn bench_computed_get_cached(c: &mut Criterion) {
    let r = reactive_ref(42i32);
    let r_clone = r.clone();
    let d = computed(move || r_clone.get() * 2);
    let _ = d.get();

    c.bench_function("computed_get_cached", |b| b.iter(|| black_box(d.get())));
}

fn bench_computed_get_dirty(c: &mut Criterion) {
    let r = reactive_ref(0i32);
    let r_clone = r.clone();
    let d = computed(move || r_clone.get() * 2);

    let mut i = 0i32;
    c.bench_function("computed_get_dirty", |b| {
        b.iter(|| {
            r.set(i);
            i += 1;
            black_box(d.get())
        })
    });
}

fn bench_computed_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("computed_chain");

    for depth in [1usize, 5, 10, 20] {
        group.bench_with_input(BenchmarkId::new("depth", depth), &depth, |b, &depth| {
            let r = reactive_ref(1i32);

            // Each computed in the chain is wrapped in an Rc so the next
            // closure can share it without `Computed<T>` needing `Clone`.
            let mut current = std::rc::Rc::new({
                let r = r.clone();
                computed(move || r.get() + 1)
            });

            for _ in 1..depth {
                let prev = current.clone();
                current = std::rc::Rc::new(computed(move || prev.get() + 1));
            }

            b.iter(|| {
                r.set(black_box(1));
                black_box(current.get())
            })
        });
    }

    group.finish();
}

// =============================================================================
// EFFECT BENCHMARKS
// =============================================================================

fn bench_effect_create(c: &mut Criterion) {
    c.bench_function("effect_create", |b| {
        b.iter(|| black_box(effect(|| {}, Default::default())))
    });
}

fn bench_effect_trigger(c: &mut Criterion) {
    let r = reactive_ref(0i32);
    let r_clone = r.clone();
    let _e = effect(
        move || {
            black_box(r_clone.get());
        },
        Default::default(),
    );

    let mut i = 0i32;
    c.bench_function("effect_trigger", |b| {
        b.iter(|| {
            r.set(i);
            i += 1;
        })
    });
}

fn bench_effect_multiple_deps(c: &mut Criterion) {
    let a = reactive_ref(0i32);
    let b_ref = reactive_ref(0i32);
    let c_ref = reactive_ref(0i32);

    let a_c = a.clone();
    let b_c = b_ref.clone();
    let c_c = c_ref.clone();
    let _e = effect(
        move || {
            black_box(a_c.get() + b_c.get() + c_c.get());
        },
        Default::default(),
    );

    let mut i = 0i32;
    c.bench_function("effect_multiple_deps", |b| {
        b.iter(|| {
            a.set(i);
            i += 1;
        })
    });
}

// =============================================================================
// BATCH BENCHMARKS
// =============================================================================

fn bench_batch_updates(c: &mut Criterion) {
    let r = reactive_ref(0i32);
    let r_clone = r.clone();
    let _e = effect(
        move || {
            black_box(r_clone.get());
        },
        Default::default(),
    );

    c.bench_function("batch_10_updates", |b| {
        b.iter(|| {
            batch(|| {
                for i in 0..10 {
                    r.set(black_box(i));
                }
            })
        })
    });
}

// =============================================================================
// STRESS TESTS
// =============================================================================

fn bench_many_refs(c: &mut Criterion) {
    let mut group = c.benchmark_group("many_refs");

    for count in [100, 1000, 10000] {
        group.bench_with_input(BenchmarkId::new("create", count), &count, |b, &count| {
            b.iter(|| {
                let refs: Vec<_> = (0..count).map(reactive_ref).collect();
                black_box(refs)
            })
        });
    }

    group.finish();
}

fn bench_many_effects(c: &mut Criterion) {
    let mut group = c.benchmark_group("many_effects");

    for count in [10, 100, 500] {
        group.bench_with_input(BenchmarkId::new("trigger", count), &count, |b, &count| {
            let r = reactive_ref(0i32);

            let effects: Vec<_> = (0..count)
                .map(|_| {
                    let r = r.clone();
                    effect(
                        move || {
                            black_box(r.get());
                        },
                        Default::default(),
                    )
                })
                .collect();

            let mut i = 0i32;
            b.iter(|| {
                r.set(i);
                i += 1;
            });

            for e in &effects {
                e.stop();
            }
        });
    }

    group.finish();
}

criterion_group!(
    ref_benches,
    bench_ref_create,
    bench_ref_get,
    bench_ref_set,
    bench_ref_set_same_value,
);

criterion_group!(
    computed_benches,
    bench_computed_create,
    bench_computed_get_cached,
    bench_computed_get_dirty,
    bench_computed_chain,
);

criterion_group!(
    effect_benches,
    bench_effect_create,
    bench_effect_trigger,
    bench_effect_multiple_deps,
    bench_batch_updates,
);

criterion_group!(stress_benches, bench_many_refs, bench_many_effects);

criterion_main!(ref_benches, computed_benches, effect_benches, stress_benches);
