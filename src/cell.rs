// ============================================================================
// reactive-core - Ref
// The atomic reactive cell: a single tracked value behind get/set.
// ============================================================================
//
// Grounded on the teacher's `primitives/signal.rs` `SignalInner<T>` pattern
// (Rc<RefCell<T>> value + a `Dep`-equivalent subscriber list + an equality
// function gating `set`). What's different: the teacher's `SourceInner<T>`
// doubled as both value-holder and `AnyReaction`-trait-object-compatible
// dep; here `Ref<T>` owns a concrete `Rc<Dep>` from `dep.rs` directly,
// since there's no heterogeneous storage requirement to design around
// (see `dep.rs`'s module doc).
//
// `custom_ref` takes the place of Vue's `customRef`: the caller supplies
// their own get/set closures and decides when to call `track`/`trigger`,
// useful for e.g. a debounced cell. `to_ref`/`to_refs` adapt a single key
// of a `ReactiveObject`/`ReactiveArray` into a standalone `Ref` that reads
// through to the source object - see `object.rs`/`array.rs` for the
// `ObjectKeyRef` variant.

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::constants::{ReadKind, WriteKind};
use crate::dep::Dep;
use crate::equality::{equals, EqualsFn};
use crate::tracking::{track, trigger};

enum RefKind<T> {
    Plain {
        value: RefCell<T>,
        equals: EqualsFn<T>,
    },
    Custom {
        get: Box<dyn Fn() -> T>,
        set: Box<dyn Fn(T)>,
    },
}

pub struct RefInner<T> {
    dep: Rc<Dep>,
    kind: RefKind<T>,
    shallow: bool,
}

/// A reactive atomic cell. Cheap to clone (an `Rc` underneath); every
/// clone observes the same underlying value.
pub struct Ref<T> {
    inner: Rc<RefInner<T>>,
}

impl<T> Clone for Ref<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone> Ref<T> {
    pub fn get(&self) -> T {
        track(&self.inner.dep, ReadKind::Get, "Ref", None);
        match &self.inner.kind {
            RefKind::Plain { value, .. } => value.borrow().clone(),
            RefKind::Custom { get, .. } => get(),
        }
    }

    pub fn set(&self, new_value: T)
    where
        T: PartialEq,
    {
        match &self.inner.kind {
            RefKind::Plain { value, equals } => {
                let changed = {
                    let current = value.borrow();
                    equals(&current, &new_value)
                };
                if !changed {
                    *value.borrow_mut() = new_value;
                    trigger(std::iter::once(self.inner.dep.clone()), WriteKind::Set, "Ref", None);
                }
            }
            RefKind::Custom { set, .. } => set(new_value),
        }
    }

    /// `set` for `Custom` refs never compares old/new (the closure decides
    /// whether and when to call `trigger` itself); this is the path
    /// `custom_ref`'s setter closure is expected to call into.
    pub fn notify(&self) {
        trigger(std::iter::once(self.inner.dep.clone()), WriteKind::Set, "Ref", None);
    }

    pub fn is_shallow(&self) -> bool {
        self.inner.shallow
    }

    pub fn dep(&self) -> &Rc<Dep> {
        &self.inner.dep
    }
}

/// Create a reactive cell wrapping `value`, using `PartialEq` to decide
/// whether a `set` actually changed anything.
pub fn reactive_ref<T: Clone + PartialEq + 'static>(value: T) -> Ref<T> {
    ref_with_equals(value, equals)
}

/// Like `reactive_ref`, but with a caller-supplied equality function -
/// useful for NaN-safe float comparison (`equality::has_changed_f64`) or
/// `never_equals`/`always_equals` to force or suppress every update.
pub fn ref_with_equals<T: Clone + 'static>(value: T, equals: EqualsFn<T>) -> Ref<T> {
    Ref {
        inner: Rc::new(RefInner {
            dep: Dep::new(),
            kind: RefKind::Plain {
                value: RefCell::new(value),
                equals,
            },
            shallow: false,
        }),
    }
}

/// Like `reactive_ref`, but a nested reactive container stored inside is
/// not itself auto-wrapped/unwrapped - only the top-level `.get()`/`.set()`
/// is tracked. For this crate's statically typed cells, "shallow" mainly
/// matters as a marker other code (`is_shallow`) can branch on; nested
/// `ReactiveObject`/`ReactiveArray` values are already their own reactive
/// handles regardless of wrapping depth.
pub fn shallow_ref<T: Clone + PartialEq + 'static>(value: T) -> Ref<T> {
    Ref {
        inner: Rc::new(RefInner {
            dep: Dep::new(),
            kind: RefKind::Plain {
                value: RefCell::new(value),
                equals,
            },
            shallow: true,
        }),
    }
}

/// Build a cell whose get/set are fully controlled by the caller. The
/// factory closure receives `track`/`trigger` callbacks to invoke from
/// inside its own get/set; a typical use is a debounced or validated cell.
pub fn custom_ref<T: 'static>(
    factory: impl FnOnce(Rc<dyn Fn()>, Rc<dyn Fn()>) -> (Box<dyn Fn() -> T>, Box<dyn Fn(T)>),
) -> Ref<T> {
    let dep = Dep::new();
    let track_dep = dep.clone();
    let trigger_dep = dep.clone();
    let track_fn: Rc<dyn Fn()> = Rc::new(move || track(&track_dep, ReadKind::Get, "Ref", None));
    let trigger_fn: Rc<dyn Fn()> = Rc::new(move || {
        trigger(std::iter::once(trigger_dep.clone()), WriteKind::Set, "Ref", None)
    });
    let (get, set) = factory(track_fn, trigger_fn);
    Ref {
        inner: Rc::new(RefInner {
            dep,
            kind: RefKind::Custom { get, set },
            shallow: false,
        }),
    }
}

/// Force a cell's dep to fire without going through its own change-detection
/// gate - useful for a shallow ref whose pointee was mutated in place, where
/// `set`'s equality check would otherwise see no change. Supplemental public
/// operation per SPEC_FULL.md §1/§6.
pub fn trigger_ref<T>(r: &Ref<T>) {
    r.notify();
}

/// Always `true`: whether a value is a `Ref` is a static, compile-time fact
/// in this crate rather than a runtime flag to query (unlike Vue, where
/// `isRef` distinguishes a `Ref` from a plain value at runtime because both
/// are just `unknown` at the type level). Kept for parity with the public
/// operation vocabulary in §6.
pub fn is_ref<T>(_r: &Ref<T>) -> bool {
    true
}

/// Unwrap a `Ref` to its current value. Vue's `unref` also passes a
/// non-ref value through unchanged; that overload has no Rust analogue
/// worth keeping; since the type system already tells a caller whether
/// they're holding a `Ref<T>` or a `T`, `unref` only needs to handle the
/// case that actually requires help.
pub fn unref<T: Clone>(r: &Ref<T>) -> T {
    r.get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{effect, EffectOptions};
    use std::cell::Cell as StdCell;

    #[test]
    fn trigger_ref_forces_a_fire_even_without_a_change() {
        let r = shallow_ref(vec![1, 2, 3]);
        let runs = Rc::new(StdCell::new(0));
        let runs_clone = runs.clone();
        let r_clone = r.clone();
        effect(
            move || {
                r_clone.get();
                runs_clone.set(runs_clone.get() + 1);
            },
            EffectOptions::default(),
        );
        assert_eq!(runs.get(), 1);
        trigger_ref(&r);
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn is_ref_is_always_true_and_unref_reads_the_current_value() {
        let r = reactive_ref(7);
        assert!(is_ref(&r));
        assert_eq!(unref(&r), 7);
        r.set(8);
        assert_eq!(unref(&r), 8);
    }

    #[test]
    fn get_tracks_and_set_triggers() {
        let r = reactive_ref(1);
        let runs = Rc::new(StdCell::new(0));
        let runs_clone = runs.clone();
        let r_clone = r.clone();
        effect(
            move || {
                r_clone.get();
                runs_clone.set(runs_clone.get() + 1);
            },
            EffectOptions::default(),
        );
        assert_eq!(runs.get(), 1);
        r.set(2);
        assert_eq!(runs.get(), 2);
        assert_eq!(r.get(), 2);
    }

    #[test]
    fn setting_an_equal_value_does_not_trigger() {
        let r = reactive_ref(1);
        let runs = Rc::new(StdCell::new(0));
        let runs_clone = runs.clone();
        let r_clone = r.clone();
        effect(
            move || {
                r_clone.get();
                runs_clone.set(runs_clone.get() + 1);
            },
            EffectOptions::default(),
        );
        r.set(1);
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn custom_ref_lets_caller_drive_track_and_trigger() {
        let stored = Rc::new(RefCell::new(0i32));
        let stored_get = stored.clone();
        let stored_set = stored.clone();
        let r: Ref<i32> = custom_ref(move |track, trigger| {
            let get: Box<dyn Fn() -> i32> = Box::new(move || {
                track();
                *stored_get.borrow()
            });
            let set: Box<dyn Fn(i32)> = Box::new(move |v| {
                *stored_set.borrow_mut() = v;
                trigger();
            });
            (get, set)
        });

        let runs = Rc::new(StdCell::new(0));
        let runs_clone = runs.clone();
        let r_clone = r.clone();
        effect(
            move || {
                r_clone.get();
                runs_clone.set(runs_clone.get() + 1);
            },
            EffectOptions::default(),
        );
        assert_eq!(runs.get(), 1);
        r.set(5);
        assert_eq!(runs.get(), 2);
        assert_eq!(r.get(), 5);
    }
}
