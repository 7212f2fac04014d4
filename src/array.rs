// ============================================================================
// reactive-core - ReactiveArray
// A tracked, index-keyed reactive sequence with instrumented identity
// search and length-mutating methods.
// ============================================================================
//
// Grounded on the same `collections/map.rs` per-key-signal pattern as
// `object.rs`, applied to a `Vec` instead of a map, plus the array
// instrumentation §4.3 calls out specifically:
//   - identity search (`index_of`/`includes`/`last_index_of`): force-track
//     every element (so later pushes/removals are correctly observed even
//     though the search itself may short-circuit before reading them all),
//     then retry once against the raw, untracked values if the tracked
//     search didn't find a reactive-wrapped match - there is no such
//     wrapped/raw distinction for a homogeneous `ReactiveArray<T>`, so
//     here this collapses to "track every index's dep unconditionally
//     before searching", which is the behaviorally meaningful half of the
//     spec's instrumentation for a statically typed element type.
//   - length mutators (`push`/`pop`/`shift`/`unshift`/`splice`): each
//     wraps its body in `pause_tracking`/`reset_tracking` so the method's
//     own internal reads (e.g. checking current length) don't create a
//     spurious dependency on the array from inside the mutator itself.

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::constants::{ReadKind, WriteKind};
use crate::core::context::{pause_tracking, reset_tracking};
use crate::core::error::ReactivityError;
use crate::dep::Dep;
use crate::key::Key;
use crate::object::Slot;
use crate::tracking::{track, trigger};

struct ArrayInner<T> {
    items: RefCell<Vec<Slot<T>>>,
    index_deps: RefCell<Vec<Rc<Dep>>>,
    length_dep: Rc<Dep>,
}

#[derive(Clone)]
pub struct ReactiveArray<T> {
    inner: Rc<ArrayInner<T>>,
    readonly: bool,
}

/// Two handles are the same array if they share the same underlying
/// storage and the same readonly flag - this is what makes `reactive(x)`
/// idempotent (§4.4's `reactive(reactive(x)) === reactive(x)`) without a
/// process-wide proxy cache: identity is pointer identity, not structural
/// value equality.
impl<T> PartialEq for ReactiveArray<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner) && self.readonly == other.readonly
    }
}

impl<T: Clone + PartialEq + 'static> ReactiveArray<T> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(ArrayInner {
                items: RefCell::new(Vec::new()),
                index_deps: RefCell::new(Vec::new()),
                length_dep: Dep::new(),
            }),
            readonly: false,
        }
    }

    pub fn from_vec(values: Vec<T>) -> Self {
        let array = Self::new();
        {
            let mut items = array.inner.items.borrow_mut();
            let mut deps = array.inner.index_deps.borrow_mut();
            for v in values {
                items.push(Slot::Plain(v));
                deps.push(Dep::new());
            }
        }
        array
    }

    pub fn readonly(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            readonly: true,
        }
    }

    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    fn ensure_dep(&self, index: usize) -> Rc<Dep> {
        let mut deps = self.inner.index_deps.borrow_mut();
        while deps.len() <= index {
            deps.push(Dep::new());
        }
        deps[index].clone()
    }

    /// Drop every index dep at or past `new_len`, returning them so the
    /// caller can `trigger` them - an index that becomes out of range must
    /// still fire, so a reader of it observes it going away (§4.2's
    /// `key="length"` trigger rule: "every indexed key whose numeric index
    /// >= new_length, plus length").
    fn truncate_index_deps(&self, new_len: usize) -> Vec<Rc<Dep>> {
        let mut deps = self.inner.index_deps.borrow_mut();
        if new_len >= deps.len() {
            return Vec::new();
        }
        deps.split_off(new_len)
    }

    pub fn len(&self) -> usize {
        track(&self.inner.length_dep, ReadKind::Get, "ReactiveArray", Some(Key::Symbol("length")));
        self.inner.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<T> {
        track(&self.ensure_dep(index), ReadKind::Get, "ReactiveArray", Some(Key::Index(index)));
        self.inner.items.borrow().get(index).map(|s| s.get())
    }

    pub fn set(&self, index: usize, new_value: T) {
        if self.readonly {
            tracing::warn!(
                "{}",
                ReactivityError::ReadOnlyViolation {
                    key: Key::Index(index)
                }
            );
            return;
        }

        if let Some(Slot::Cell(cell)) = self.inner.items.borrow().get(index) {
            cell.set(new_value);
            return;
        }

        let changed = match self.inner.items.borrow().get(index) {
            Some(Slot::Plain(current)) => *current != new_value,
            None => true,
        };
        if !changed {
            return;
        }

        {
            let mut items = self.inner.items.borrow_mut();
            if index >= items.len() {
                items.resize_with(index + 1, || Slot::Plain(new_value.clone()));
            } else {
                items[index] = Slot::Plain(new_value);
            }
        }
        trigger(
            std::iter::once(self.ensure_dep(index)),
            WriteKind::Set,
            "ReactiveArray",
            Some(Key::Index(index)),
        );
    }

    /// Identity search: force-tracks every element's dep before scanning,
    /// so an effect that calls `index_of` stays subscribed to every
    /// element - including ones past the matching index - matching the
    /// spec's "force-track-all" instrumentation.
    pub fn index_of(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.track_all();
        self.inner.items.borrow().iter().position(|s| &s.get() == value)
    }

    pub fn includes(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.index_of(value).is_some()
    }

    pub fn last_index_of(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.track_all();
        self.inner
            .items
            .borrow()
            .iter()
            .enumerate()
            .rev()
            .find(|(_, s)| &s.get() == value)
            .map(|(i, _)| i)
    }

    fn track_all(&self) {
        track(&self.inner.length_dep, ReadKind::Iterate, "ReactiveArray", Some(Key::ITERATE));
        let len = self.inner.items.borrow().len();
        for i in 0..len {
            track(&self.ensure_dep(i), ReadKind::Get, "ReactiveArray", Some(Key::Index(i)));
        }
    }

    pub fn push(&self, value: T) {
        if self.readonly {
            tracing::warn!(
                "{}",
                ReactivityError::ReadOnlyViolation {
                    key: Key::Symbol("push")
                }
            );
            return;
        }
        pause_tracking();
        self.inner.items.borrow_mut().push(Slot::Plain(value));
        self.inner.index_deps.borrow_mut().push(Dep::new());
        reset_tracking();
        trigger(
            std::iter::once(self.inner.length_dep.clone()),
            WriteKind::Add,
            "ReactiveArray",
            Some(Key::Symbol("length")),
        );
    }

    pub fn pop(&self) -> Option<T> {
        if self.readonly {
            return None;
        }
        pause_tracking();
        let popped = self.inner.items.borrow_mut().pop();
        let dropped_deps = if popped.is_some() {
            let new_len = self.inner.items.borrow().len();
            self.truncate_index_deps(new_len)
        } else {
            Vec::new()
        };
        reset_tracking();
        if popped.is_some() {
            let mut deps = dropped_deps;
            deps.push(self.inner.length_dep.clone());
            trigger(deps, WriteKind::Delete, "ReactiveArray", Some(Key::Symbol("length")));
        }
        popped.map(|s| s.get())
    }

    /// Every remaining index's value shifts down by one position, and the
    /// last slot disappears entirely - so every existing index dep (not
    /// just the one that happened to live at position 0) needs to fire,
    /// not just "length".
    pub fn shift(&self) -> Option<T> {
        if self.readonly || self.is_empty() {
            return None;
        }
        pause_tracking();
        let removed = self.inner.items.borrow_mut().remove(0);
        let deps_before_shift: Vec<Rc<Dep>> = self.inner.index_deps.borrow().clone();
        self.inner.index_deps.borrow_mut().remove(0);
        reset_tracking();
        let mut deps = deps_before_shift;
        deps.push(self.inner.length_dep.clone());
        trigger(deps, WriteKind::Delete, "ReactiveArray", Some(Key::Symbol("length")));
        Some(removed.get())
    }

    pub fn unshift(&self, value: T) {
        if self.readonly {
            return;
        }
        pause_tracking();
        self.inner.items.borrow_mut().insert(0, Slot::Plain(value));
        self.inner.index_deps.borrow_mut().insert(0, Dep::new());
        reset_tracking();
        trigger(
            std::iter::once(self.inner.length_dep.clone()),
            WriteKind::Add,
            "ReactiveArray",
            Some(Key::Symbol("length")),
        );
    }

    /// Remove `count` elements starting at `start` and insert `replace_with`
    /// in their place, returning the removed elements. Every index from
    /// `start` onward reindexes (or disappears, if the array shrank), so
    /// every index dep from `start` on needs to fire, not just "length".
    pub fn splice(&self, start: usize, count: usize, replace_with: Vec<T>) -> Vec<T> {
        if self.readonly {
            return Vec::new();
        }
        pause_tracking();
        let removed: Vec<T> = {
            let mut items = self.inner.items.borrow_mut();
            let end = (start + count).min(items.len());
            items
                .splice(start..end, replace_with.into_iter().map(Slot::Plain))
                .map(|s| s.get())
                .collect()
        };
        let affected_deps: Vec<Rc<Dep>> = {
            let deps = self.inner.index_deps.borrow();
            let from = start.min(deps.len());
            deps[from..].to_vec()
        };
        {
            let mut deps = self.inner.index_deps.borrow_mut();
            let new_len = self.inner.items.borrow().len();
            deps.resize_with(new_len, Dep::new);
        }
        reset_tracking();
        let mut fired = affected_deps;
        fired.push(self.inner.length_dep.clone());
        trigger(fired, WriteKind::Set, "ReactiveArray", Some(Key::Symbol("length")));
        removed
    }

    /// Assign the array's length directly (`arr.length = n` in the source
    /// language). Shrinking drops every element at or past `new_len` and
    /// fires each of their index deps plus the length dep - exactly §4.2's
    /// "key=\"length\" on array" trigger rule. Growing touches nothing and
    /// fires nothing: the newly revealed positions are holes, not assigned
    /// values, and unlike a JS array this crate has no sentinel "hole"
    /// value for an arbitrary `T`, so they don't exist as slots until
    /// something is `push`ed/`set` into them (§8 S4).
    pub fn set_length(&self, new_len: usize) {
        if self.readonly {
            tracing::warn!(
                "{}",
                ReactivityError::ReadOnlyViolation {
                    key: Key::Symbol("length")
                }
            );
            return;
        }

        let current_len = self.inner.items.borrow().len();
        if new_len >= current_len {
            return;
        }

        pause_tracking();
        self.inner.items.borrow_mut().truncate(new_len);
        let dropped_deps = self.truncate_index_deps(new_len);
        reset_tracking();

        let mut deps = dropped_deps;
        deps.push(self.inner.length_dep.clone());
        trigger(deps, WriteKind::Set, "ReactiveArray", Some(Key::Symbol("length")));
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.track_all();
        self.inner.items.borrow().iter().map(|s| s.get()).collect()
    }

    /// Untracked snapshot of the current elements - backs `to_raw` (§4.4).
    pub(crate) fn raw_vec(&self) -> Vec<T> {
        self.inner.items.borrow().iter().map(|s| s.get()).collect()
    }
}

impl<T: Clone + PartialEq + 'static> Default for ReactiveArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{effect, EffectOptions};
    use std::cell::Cell as StdCell;

    #[test]
    fn set_on_one_index_does_not_rerun_an_effect_reading_another() {
        let array = ReactiveArray::from_vec(vec![1, 2, 3]);
        let runs = Rc::new(StdCell::new(0));
        let runs_clone = runs.clone();
        let array_clone = array.clone();
        effect(
            move || {
                array_clone.get(0);
                runs_clone.set(runs_clone.get() + 1);
            },
            EffectOptions::default(),
        );
        assert_eq!(runs.get(), 1);
        array.set(2, 99);
        assert_eq!(runs.get(), 1);
        array.set(0, 100);
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn push_triggers_length_readers() {
        let array: ReactiveArray<i32> = ReactiveArray::new();
        let seen_len = Rc::new(StdCell::new(0));
        let seen_len_clone = seen_len.clone();
        let array_clone = array.clone();
        effect(
            move || seen_len_clone.set(array_clone.len()),
            EffectOptions::default(),
        );
        assert_eq!(seen_len.get(), 0);
        array.push(1);
        assert_eq!(seen_len.get(), 1);
    }

    #[test]
    fn index_of_force_tracks_every_element() {
        let array = ReactiveArray::from_vec(vec![1, 2, 3]);
        let runs = Rc::new(StdCell::new(0));
        let runs_clone = runs.clone();
        let array_clone = array.clone();
        effect(
            move || {
                array_clone.index_of(&1);
                runs_clone.set(runs_clone.get() + 1);
            },
            EffectOptions::default(),
        );
        assert_eq!(runs.get(), 1);
        // Index 2 is past the match at index 0 but still tracked.
        array.set(2, 42);
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn splice_replaces_a_range_and_returns_the_removed_elements() {
        let array = ReactiveArray::from_vec(vec![1, 2, 3, 4]);
        let removed = array.splice(1, 2, vec![20, 30, 40]);
        assert_eq!(removed, vec![2, 3]);
        assert_eq!(array.to_vec(), vec![1, 20, 30, 40, 4]);
    }

    #[test]
    fn shrinking_the_length_fires_every_truncated_index_but_growing_fires_nothing() {
        let array = ReactiveArray::from_vec(vec![1, 2, 3]);
        let log = Rc::new(RefCell::new(Vec::new()));
        let log_clone = log.clone();
        let array_clone = array.clone();
        effect(
            move || log_clone.borrow_mut().push(array_clone.get(2)),
            EffectOptions::default(),
        );
        assert_eq!(*log.borrow(), vec![Some(3)]);

        array.set_length(2);
        assert_eq!(*log.borrow(), vec![Some(3), None]);

        array.set_length(5);
        assert_eq!(*log.borrow(), vec![Some(3), None]);
    }

    #[test]
    fn pop_fires_the_dropped_index_and_shift_fires_every_remaining_index() {
        let array = ReactiveArray::from_vec(vec![1, 2, 3]);
        let last_seen = Rc::new(StdCell::new(99));
        let last_seen_clone = last_seen.clone();
        let array_clone = array.clone();
        effect(
            move || {
                if let Some(v) = array_clone.get(2) {
                    last_seen_clone.set(v);
                }
            },
            EffectOptions::default(),
        );
        assert_eq!(last_seen.get(), 3);

        let first_seen = Rc::new(StdCell::new(0));
        let first_seen_clone = first_seen.clone();
        let array_clone2 = array.clone();
        effect(
            move || {
                if let Some(v) = array_clone2.get(0) {
                    first_seen_clone.set(v);
                }
            },
            EffectOptions::default(),
        );
        assert_eq!(first_seen.get(), 1);

        array.shift();
        assert_eq!(array.to_vec(), vec![2, 3]);
        assert_eq!(first_seen.get(), 2);
    }
}
