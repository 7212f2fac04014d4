// ============================================================================
// reactive-core - Computed
// A cached, lazily-recomputed derived value.
// ============================================================================
//
// The teacher's `primitives/derived.rs` implements Svelte-style
// MAYBE_DIRTY propagation: a derived doesn't eagerly recompute when a
// dependency writes, it marks itself (and its dependents) MAYBE_DIRTY and
// defers the actual recompute-and-compare to the next read, walking the
// dependency chain to decide whether anything really changed
// (`update_derived_chain`/`check_deps_changed`). The spec this crate
// targets describes Vue's simpler model instead: a computed is plain
// `dirty`; on a dependency write its internal effect's scheduler just
// flips `dirty = true` (no chain walk); the next `.get()` recomputes if
// dirty, caches the result, and clears the flag. That's what's built here
// - an explicit, deliberate deviation from the teacher's own cascade
// algorithm, not an oversight (see DESIGN.md).
//
// Structurally this keeps the teacher's shape: an inner `Rc<RefCell<...>>`
// cell for the cached value, a `Dep` that the computed's own readers
// subscribe to (so a computed can itself be read inside another effect or
// computed), and an internal `Effect` whose job is only to flip the dirty
// flag and notify the computed's own subscribers - it never runs the
// getter itself, the next `.get()` does.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::core::constants::{ReadKind, WriteKind};
use crate::core::context::untracked;
use crate::dep::Dep;
use crate::effect::{effect, EffectOptions};
use crate::key::Key;
use crate::tracking::{track, trigger};
use crate::ReactivityError;

struct ComputedState<T> {
    value: RefCell<Option<T>>,
    dirty: Cell<bool>,
}

pub struct Computed<T> {
    state: Rc<ComputedState<T>>,
    dep: Rc<Dep>,
    getter: Rc<dyn Fn() -> T>,
    setter: Option<Rc<dyn Fn(T)>>,
    // Kept alive for as long as the computed is; its scheduler marks
    // `dirty` and triggers this computed's own subscribers.
    _watcher: crate::effect::Effect,
}

impl<T: Clone + 'static> Computed<T> {
    /// `.get()` recomputes only if dirty, tracking this computed's `Dep`
    /// against whatever effect or outer computed is reading it.
    pub fn get(&self) -> T {
        track(&self.dep, ReadKind::Get, "Computed", None);

        if self.state.dirty.get() || self.state.value.borrow().is_none() {
            let value = (self.getter)();
            *self.state.value.borrow_mut() = Some(value);
            self.state.dirty.set(false);
        }

        self.state.value.borrow().clone().expect("computed value populated above")
    }

    /// Write-through setter, if one was supplied via `computed_with_setter`.
    /// A no-op (with a warning) on a read-only computed, matching Vue's
    /// behavior for a computed created from a bare getter.
    pub fn set(&self, new_value: T) {
        match &self.setter {
            Some(setter) => setter(new_value),
            None => {
                tracing::warn!(
                    "{}",
                    ReactivityError::ComputedSetterMissing {
                        key: Key::Symbol("computed")
                    }
                );
            }
        }
    }
}

/// Create a read-only computed from a getter closure. The getter runs
/// inside an internal effect so its own reads are tracked; when any of
/// them change, the computed is marked dirty and its own subscribers are
/// notified (not re-run immediately - computed values are pull, not push).
pub fn computed<T: Clone + 'static>(getter: impl Fn() -> T + 'static) -> Computed<T> {
    computed_with_setter(getter, None)
}

pub fn computed_with_setter<T: Clone + 'static>(
    getter: impl Fn() -> T + 'static,
    setter: Option<Box<dyn Fn(T)>>,
) -> Computed<T> {
    let state = Rc::new(ComputedState {
        value: RefCell::new(None),
        dirty: Cell::new(true),
    });
    let dep = Dep::new();
    let getter: Rc<dyn Fn() -> T> = Rc::new(getter);

    let watcher_state = state.clone();
    let watcher_dep = dep.clone();
    let watcher_getter = getter.clone();

    // The watcher effect's body reads exactly what `getter` reads (by
    // calling it once, discarding the result) so it shares the same
    // dependency set; its scheduler runs instead of a body re-run.
    let scheduler_state = watcher_state.clone();
    let scheduler_dep = watcher_dep.clone();
    let watcher = effect(
        move || {
            let _ = watcher_getter();
        },
        EffectOptions {
            lazy: false,
            scheduler: Some(Box::new(move || {
                if !scheduler_state.dirty.replace(true) {
                    trigger(std::iter::once(scheduler_dep.clone()), WriteKind::Set, "Computed", None);
                }
            })),
            ..Default::default()
        },
    );

    Computed {
        state,
        dep,
        getter,
        setter: setter.map(|s| Rc::from(s) as Rc<dyn Fn(T)>),
        _watcher: watcher,
    }
}

/// Run `f` without tracking - useful when reading a computed's current
/// cached value for diagnostics without subscribing the caller.
pub fn peek<T: Clone + 'static>(computed: &Computed<T>) -> T {
    untracked(|| computed.get())
}
