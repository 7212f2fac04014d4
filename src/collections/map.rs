// ============================================================================
// reactive-core - ReactiveMap
// A HashMap with fine-grained per-key reactivity
// ============================================================================
//
// One of the "supplemental features" SPEC_FULL.md adds beyond the
// distilled spec (§1): the original @vue/reactivity package wraps
// `Map`/`Set` with the same proxy machinery as plain objects, but this
// crate's `ReactiveObject`/`ReactiveArray` are homogeneous over a fixed
// `Key` shape, so a genuinely arbitrary-key map needs its own type.
// Grounded directly on the teacher's `collections/map.rs` `ReactiveMap`:
// same three-tier reactivity (per-key dep, a version dep for structural
// changes, a size dep), rebuilt on this crate's `Dep`/`track`/`trigger`
// instead of the teacher's `SourceInner<T>`/`track_read`/`notify_write`.

use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;

use crate::core::constants::{ReadKind, WriteKind};
use crate::dep::Dep;
use crate::tracking::{track, trigger};

// Debug events pass `key: None` throughout this file: `K` is an arbitrary
// generic type with no `Key` conversion, unlike `ReactiveObject`/
// `ReactiveArray`'s fixed `Key` shape, so there's nothing generic to hand
// an `on_track`/`on_trigger` hook beyond which dep fired.

pub struct ReactiveMap<K: Eq + Hash + Clone, V> {
    data: HashMap<K, V>,
    key_deps: HashMap<K, Rc<Dep>>,
    version_dep: Rc<Dep>,
    size_dep: Rc<Dep>,
}

impl<K: Eq + Hash + Clone, V> ReactiveMap<K, V> {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            key_deps: HashMap::new(),
            version_dep: Dep::new(),
            size_dep: Dep::new(),
        }
    }

    fn dep_for(&mut self, key: &K) -> Rc<Dep> {
        if let Some(dep) = self.key_deps.get(key) {
            return dep.clone();
        }
        let dep = Dep::new();
        self.key_deps.insert(key.clone(), dep.clone());
        dep
    }

    pub fn len(&self) -> usize {
        track(&self.size_dep, ReadKind::Get, "ReactiveMap", None);
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains_key(&self, key: &K) -> bool {
        track(&self.version_dep, ReadKind::Has, "ReactiveMap", None);
        self.data.contains_key(key)
    }

    pub fn get(&mut self, key: &K) -> Option<&V> {
        if self.data.contains_key(key) {
            let dep = self.dep_for(key);
            track(&dep, ReadKind::Get, "ReactiveMap", None);
        } else {
            track(&self.version_dep, ReadKind::Get, "ReactiveMap", None);
        }
        self.data.get(key)
    }

    pub fn insert(&mut self, key: K, value: V) -> Option<V>
    where
        V: PartialEq,
    {
        let is_new = !self.data.contains_key(&key);
        let dep = self.dep_for(&key);
        let old = self.data.insert(key.clone(), value);

        if is_new {
            trigger(
                [dep, self.version_dep.clone(), self.size_dep.clone()],
                WriteKind::Add,
                "ReactiveMap",
                None,
            );
        } else {
            let changed = match (&old, self.data.get(&key)) {
                (Some(old), Some(new)) => old != new,
                _ => true,
            };
            if changed {
                trigger(std::iter::once(dep), WriteKind::Set, "ReactiveMap", None);
            }
        }

        old
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let removed = self.data.remove(key)?;
        if let Some(dep) = self.key_deps.remove(key) {
            trigger(
                [dep, self.version_dep.clone(), self.size_dep.clone()],
                WriteKind::Delete,
                "ReactiveMap",
                None,
            );
        } else {
            trigger(
                [self.version_dep.clone(), self.size_dep.clone()],
                WriteKind::Delete,
                "ReactiveMap",
                None,
            );
        }
        Some(removed)
    }

    pub fn clear(&mut self) {
        if self.data.is_empty() {
            return;
        }
        self.data.clear();
        let mut deps: Vec<_> = self.key_deps.drain().map(|(_, d)| d).collect();
        deps.push(self.version_dep.clone());
        deps.push(self.size_dep.clone());
        trigger(deps, WriteKind::Clear, "ReactiveMap", None);
    }

    /// Track the version dep and return a snapshot of the entries. A
    /// plain `.iter()` isn't exposed because a live borrowing iterator
    /// can't also call `track` through `&self` cleanly; `entries()` is
    /// this crate's equivalent of the spec's "iteration tracks ownKeys".
    pub fn entries(&self) -> Vec<(&K, &V)> {
        track(&self.version_dep, ReadKind::Iterate, "ReactiveMap", None);
        self.data.iter().collect()
    }
}

impl<K: Eq + Hash + Clone, V> Default for ReactiveMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
