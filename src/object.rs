// ============================================================================
// reactive-core - ReactiveObject
// A homogeneous, field-tracked reactive struct-like container.
// ============================================================================
//
// The spec's proxy handlers operate on arbitrary JS objects keyed by
// dynamic property names; Rust has no such dynamic object, so this models
// the same `get`/`set`/`has`/`delete_property`/`own_keys` algorithm (§4.3)
// over a concrete, homogeneous `Key -> T` map instead - grounded on the
// teacher's `collections/map.rs` `ReactiveMap<K,V>` (per-key signal table
// + a version/iteration signal + `get`/`set`/`contains_key` gating reads
// and writes through those signals). The per-key `Dep` table here plays
// the role the spec's process-wide weak map plays in JS (see SPEC_FULL.md
// §3's "Registry adaptation"): each `ReactiveObject` owns its own
// `IndexMap<Key, Rc<Dep>>`, created lazily the first time a key is tracked.
//
// `Slot<T>` implements the auto-unwrap/auto-wrap/forward-write behavior
// from §4.3's test scenario S2: a field holding a `Ref<T>` transparently
// reads/writes through to that ref instead of replacing it, exactly as a
// plain object field holding a ref does in Vue.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::array::ReactiveArray;
use crate::cell::{custom_ref, Ref};
use crate::core::constants::{ReadKind, WriteKind};
use crate::core::error::ReactivityError;
use crate::dep::Dep;
use crate::key::Key;
use crate::tracking::{track, trigger};

pub enum Slot<T> {
    Plain(T),
    Cell(Ref<T>),
}

impl<T: Clone> Slot<T> {
    pub(crate) fn get(&self) -> T {
        match self {
            Slot::Plain(v) => v.clone(),
            Slot::Cell(r) => r.get(),
        }
    }
}

struct ObjectInner<T> {
    slots: RefCell<IndexMap<Key, Slot<T>>>,
    key_deps: RefCell<IndexMap<Key, Rc<Dep>>>,
    iterate_dep: Rc<Dep>,
}

/// A reactive, struct-like container over `Key -> T`. Cheap to clone; all
/// clones share the same underlying slots and dep table.
pub struct ReactiveObject<T> {
    inner: Rc<ObjectInner<T>>,
    readonly: bool,
    shallow: bool,
}

/// Two handles are the same object if they share the same underlying
/// storage and the same readonly/shallow flags - this is what makes
/// `reactive(x)` idempotent (§4.4's `reactive(reactive(x)) === reactive(x)`)
/// without a process-wide proxy cache: identity is pointer identity, not
/// structural value equality. Also what lets `get_nested` return the same
/// logical readonly view on repeated reads instead of needing a separate
/// cache table (§4.3's "lazily constructed and cached").
impl<T> PartialEq for ReactiveObject<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
            && self.readonly == other.readonly
            && self.shallow == other.shallow
    }
}

impl<T> Clone for ReactiveObject<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            readonly: self.readonly,
            shallow: self.shallow,
        }
    }
}

impl<T: Clone + PartialEq + 'static> ReactiveObject<T> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(ObjectInner {
                slots: RefCell::new(IndexMap::new()),
                key_deps: RefCell::new(IndexMap::new()),
                iterate_dep: Dep::new(),
            }),
            readonly: false,
            shallow: false,
        }
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (Key, T)>) -> Self {
        let object = Self::new();
        for (k, v) in entries {
            object.inner.slots.borrow_mut().insert(k, Slot::Plain(v));
        }
        object
    }

    fn dep_for(&self, key: &Key) -> Rc<Dep> {
        if let Some(dep) = self.inner.key_deps.borrow().get(key) {
            return dep.clone();
        }
        let dep = Dep::new();
        self.inner.key_deps.borrow_mut().insert(key.clone(), dep.clone());
        dep
    }

    /// Return a readonly view sharing the same underlying data: writes
    /// through it are dropped (with a warning) instead of applied.
    pub fn readonly(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            readonly: true,
            shallow: self.shallow,
        }
    }

    pub fn shallow(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            readonly: self.readonly,
            shallow: true,
        }
    }

    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    pub fn is_shallow(&self) -> bool {
        self.shallow
    }

    /// Track the key's dep and return its current value, unwrapping a
    /// `Ref` slot transparently (auto-unwrap, §4.3 S2).
    pub fn get(&self, key: &Key) -> Option<T> {
        track(&self.dep_for(key), ReadKind::Get, "ReactiveObject", Some(key.clone()));
        self.inner.slots.borrow().get(key).map(|slot| slot.get())
    }

    /// Track the has-existence of `key` and the object's key set, then
    /// return whether it's present.
    pub fn has(&self, key: &Key) -> bool {
        track(&self.dep_for(key), ReadKind::Has, "ReactiveObject", Some(key.clone()));
        self.inner.slots.borrow().contains_key(key)
    }

    /// Set `key` to `new_value`. If the slot already holds a `Ref`, this
    /// forwards the write through that ref instead of replacing the slot
    /// (§4.3 S2's "forward-write" behavior) - reading the field afterward
    /// still sees the same `Ref` identity.
    pub fn set(&self, key: Key, new_value: T) {
        if self.readonly {
            tracing::warn!("{}", ReactivityError::ReadOnlyViolation { key });
            return;
        }

        let is_new_key = !self.inner.slots.borrow().contains_key(&key);

        if let Some(Slot::Cell(cell)) = self.inner.slots.borrow().get(&key) {
            cell.set(new_value);
            return;
        }

        let changed = match self.inner.slots.borrow().get(&key) {
            Some(Slot::Plain(current)) => *current != new_value,
            _ => true,
        };

        self.inner.slots.borrow_mut().insert(key.clone(), Slot::Plain(new_value));

        if is_new_key {
            trigger(
                [self.dep_for(&key), self.inner.iterate_dep.clone()],
                WriteKind::Add,
                "ReactiveObject",
                Some(key),
            );
        } else if changed {
            trigger(
                std::iter::once(self.dep_for(&key)),
                WriteKind::Set,
                "ReactiveObject",
                Some(key),
            );
        }
    }

    /// Install a `Ref` at `key`, so future `get`/`set` on this key forward
    /// through the ref instead of storing a plain value.
    pub fn set_ref(&self, key: Key, cell: Ref<T>) {
        let is_new_key = !self.inner.slots.borrow().contains_key(&key);
        self.inner.slots.borrow_mut().insert(key.clone(), Slot::Cell(cell));
        if is_new_key {
            trigger(
                [self.dep_for(&key), self.inner.iterate_dep.clone()],
                WriteKind::Add,
                "ReactiveObject",
                Some(key),
            );
        }
    }

    pub fn delete(&self, key: &Key) -> bool {
        if self.readonly {
            tracing::warn!(
                "{}",
                ReactivityError::ReadOnlyViolation { key: key.clone() }
            );
            return false;
        }
        let removed = self.inner.slots.borrow_mut().shift_remove(key).is_some();
        if removed {
            trigger(
                [self.dep_for(key), self.inner.iterate_dep.clone()],
                WriteKind::Delete,
                "ReactiveObject",
                Some(key.clone()),
            );
        }
        removed
    }

    /// Track the iteration dep and return a snapshot of the current keys,
    /// in insertion order (§4.3's `ownKeys`).
    pub fn own_keys(&self) -> Vec<Key> {
        track(&self.inner.iterate_dep, ReadKind::Iterate, "ReactiveObject", Some(Key::ITERATE));
        self.inner.slots.borrow().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        track(&self.inner.iterate_dep, ReadKind::Iterate, "ReactiveObject", Some(Key::ITERATE));
        self.inner.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Untracked snapshot of the current entries, in insertion order -
    /// backs `to_raw` (§4.4). Does not go through `get`/`own_keys`, so
    /// reading it never subscribes the caller.
    pub(crate) fn raw_entries(&self) -> Vec<(Key, T)> {
        self.inner
            .slots
            .borrow()
            .iter()
            .map(|(k, slot)| (k.clone(), slot.get()))
            .collect()
    }
}

/// Lazy wrapping of a nested object field (§4.3: "if `res` is
/// `Slot::Plain(v)` and `v` is itself an object type... return its
/// observed wrapper, `readonly(v)` if read-only, else `reactive(v)`").
/// This crate's homogeneous `Key -> T` design means a field either always
/// holds a nested `ReactiveObject<U>` (this impl) or never does - there's
/// no per-call runtime check needed the way Vue inspects each arbitrary
/// value - so the propagation is expressed as a dedicated accessor on the
/// concrete nested-object instantiation rather than inside the generic
/// `get`. No separate cache is needed for the "lazily constructed and
/// cached" requirement: `ReactiveObject::readonly()` returns a handle that
/// shares the same underlying `Rc`, so two calls compare equal via
/// `PartialEq` (pointer identity + flags) without a lookup table.
impl<T: Clone + PartialEq + 'static> ReactiveObject<ReactiveObject<T>> {
    pub fn get_nested(&self, key: &Key) -> Option<ReactiveObject<T>> {
        let nested = self.get(key)?;
        Some(if self.readonly { nested.readonly() } else { nested })
    }
}

/// Same propagation as above, for a field holding a nested `ReactiveArray`.
impl<T: Clone + PartialEq + 'static> ReactiveObject<ReactiveArray<T>> {
    pub fn get_nested(&self, key: &Key) -> Option<ReactiveArray<T>> {
        let nested = self.get(key)?;
        Some(if self.readonly { nested.readonly() } else { nested })
    }
}

impl<T: Clone + PartialEq + 'static> Default for ReactiveObject<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Adapt a single key of a `ReactiveObject` into a standalone `Ref`: reads
/// and writes forward to the host object's own `get`/`set`, so the host's
/// per-key dep (not a dep of its own) is what subscribers actually track
/// (§4.5). The object must already hold `key` - `to_ref` is for lifting an
/// existing field out to pass around independently, not for declaring one.
pub fn to_ref<T: Clone + PartialEq + 'static>(obj: &ReactiveObject<T>, key: Key) -> Ref<T> {
    let obj_get = obj.clone();
    let key_get = key.clone();
    let obj_set = obj.clone();
    custom_ref(move |_track, _trigger| {
        let get: Box<dyn Fn() -> T> = Box::new(move || {
            obj_get
                .get(&key_get)
                .unwrap_or_else(|| panic!("to_ref: key {key_get:?} not present on the host object"))
        });
        let set: Box<dyn Fn(T)> = Box::new(move |v| obj_set.set(key.clone(), v));
        (get, set)
    })
}

/// Expand every own key of `obj` into an object-key `Ref`, the reactive
/// equivalent of destructuring - each entry still reads/writes through to
/// `obj` (§4.5). There's no `ToRefsOnNonProxy` case to guard here: unlike
/// Vue, where `toRefs` can be called on any plain object, this crate's type
/// system only accepts an actual `ReactiveObject<T>`, which is reactive by
/// construction (see `core/error.rs`'s doc comment on `ToRefsOnNonProxy`).
pub fn to_refs<T: Clone + PartialEq + 'static>(obj: &ReactiveObject<T>) -> HashMap<Key, Ref<T>> {
    obj.own_keys()
        .into_iter()
        .map(|key| (key.clone(), to_ref(obj, key)))
        .collect()
}

/// A flat, non-reactive view over a record that may mix plain values and
/// `Ref`s: reads auto-unwrap a cell, writes forward into an existing cell
/// rather than replacing it - the same auto-unwrap/forward-write rules
/// `ReactiveObject::get`/`set` apply to a `Slot`, minus any tracking
/// (§4.5's `proxyRefs`). Useful for handing several independently-created
/// refs to a consumer as one flat map.
pub struct ProxyRefs<T> {
    record: RefCell<HashMap<Key, Slot<T>>>,
}

impl<T: Clone> ProxyRefs<T> {
    pub fn get(&self, key: &Key) -> Option<T> {
        self.record.borrow().get(key).map(|slot| slot.get())
    }

    pub fn set(&self, key: Key, value: T)
    where
        T: PartialEq,
    {
        let mut record = self.record.borrow_mut();
        match record.get(&key) {
            Some(Slot::Cell(cell)) => cell.set(value),
            _ => {
                record.insert(key, Slot::Plain(value));
            }
        }
    }
}

pub fn proxy_refs<T: Clone>(record: HashMap<Key, Slot<T>>) -> ProxyRefs<T> {
    ProxyRefs {
        record: RefCell::new(record),
    }
}
