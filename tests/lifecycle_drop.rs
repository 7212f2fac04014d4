use reactive_core::{effect, effect_scope, on_scope_dispose, reactive_ref, EffectOptions};
use std::cell::Cell;
use std::rc::Rc;

#[test]
fn stopping_an_effect_handle_stops_it_from_rerunning() {
    let count = reactive_ref(0);
    let runs = Rc::new(Cell::new(0));

    let runs_clone = runs.clone();
    let count_clone = count.clone();
    let handle = effect(
        move || {
            let _ = count_clone.get();
            runs_clone.set(runs_clone.get() + 1);
        },
        EffectOptions::default(),
    );
    assert_eq!(runs.get(), 1);

    count.set(1);
    assert_eq!(runs.get(), 2);

    handle.stop();
    count.set(2);
    assert_eq!(runs.get(), 2, "a stopped effect must not rerun");
}

#[test]
fn scope_dispose_runs_cleanup_registered_inside_it() {
    let cleanup_called = Rc::new(Cell::new(false));
    let cleanup_clone = cleanup_called.clone();

    let scope = effect_scope(false);
    scope.run(|| {
        on_scope_dispose(move || cleanup_clone.set(true));
    });
    assert!(!cleanup_called.get());

    scope.stop();
    assert!(cleanup_called.get());
}

#[test]
fn stopping_a_scope_stops_every_effect_created_within_it() {
    let count = reactive_ref(0);
    let runs = Rc::new(Cell::new(0));

    let scope = effect_scope(false);
    let runs_clone = runs.clone();
    let count_clone = count.clone();
    scope.run(|| {
        effect(
            move || {
                let _ = count_clone.get();
                runs_clone.set(runs_clone.get() + 1);
            },
            EffectOptions::default(),
        );
    });
    assert_eq!(runs.get(), 1);

    count.set(1);
    assert_eq!(runs.get(), 2);

    scope.stop();
    count.set(2);
    assert_eq!(runs.get(), 2, "effects owned by a stopped scope must not rerun");
}
