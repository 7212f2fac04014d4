use reactive_core::{computed, effect, reactive_ref};

#[test]
fn computed_tracks_its_sources_and_recomputes_on_read() {
    let a = reactive_ref(10);
    let b = reactive_ref(20);

    let a_clone = a.clone();
    let b_clone = b.clone();
    let sum = computed(move || a_clone.get() + b_clone.get());

    assert_eq!(sum.get(), 30);

    a.set(15);
    assert_eq!(sum.get(), 35);
}

#[test]
fn effect_reruns_on_every_dependency_it_reads() {
    let a = reactive_ref(0);
    let b = reactive_ref(0);

    let a_clone = a.clone();
    let b_clone = b.clone();
    let _e = effect(
        move || {
            let _ = a_clone.get();
            let _ = b_clone.get();
        },
        Default::default(),
    );

    a.set(1);
    b.set(1);
}

#[test]
fn computed_can_nest_inside_another_computed() {
    let a = reactive_ref(1);

    let a_for_outer = a.clone();
    let d = computed(move || {
        let a_inner = a_for_outer.clone();
        let inner = computed(move || a_inner.get() * 2);
        inner.get()
    });

    assert_eq!(d.get(), 2);
}
