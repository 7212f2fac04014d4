// ============================================================================
// reactive-core - ReactiveSet
// A HashSet with fine-grained per-item reactivity
// ============================================================================
//
// Grounded on the teacher's `collections/set.rs`: same three-tier design
// as `ReactiveMap` (per-item dep, a version dep, a size dep), rebuilt on
// this crate's `Dep`/`track`/`trigger`. The teacher exposes a generic
// `Borrow<Q>`-based lookup API (`contains<Q>`); this crate drops that in
// favor of operating on `&T` directly, matching the simpler style used by
// `ReactiveMap`/`ReactiveObject`/`ReactiveArray` in this codebase.

use std::collections::HashSet;
use std::hash::Hash;
use std::rc::Rc;

use crate::core::constants::{ReadKind, WriteKind};
use crate::dep::Dep;
use crate::tracking::{track, trigger};

pub struct ReactiveSet<T: Eq + Hash + Clone> {
    data: HashSet<T>,
    item_deps: std::collections::HashMap<T, Rc<Dep>>,
    version_dep: Rc<Dep>,
    size_dep: Rc<Dep>,
}

impl<T: Eq + Hash + Clone> ReactiveSet<T> {
    pub fn new() -> Self {
        Self {
            data: HashSet::new(),
            item_deps: std::collections::HashMap::new(),
            version_dep: Dep::new(),
            size_dep: Dep::new(),
        }
    }

    pub fn from_iter(iter: impl IntoIterator<Item = T>) -> Self {
        Self {
            data: iter.into_iter().collect(),
            item_deps: std::collections::HashMap::new(),
            version_dep: Dep::new(),
            size_dep: Dep::new(),
        }
    }

    fn dep_for(&mut self, item: &T) -> Rc<Dep> {
        if let Some(dep) = self.item_deps.get(item) {
            return dep.clone();
        }
        let dep = Dep::new();
        self.item_deps.insert(item.clone(), dep.clone());
        dep
    }

    pub fn len(&self) -> usize {
        track(&self.size_dep, ReadKind::Get, "ReactiveSet", None);
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tracks the item's own dep if one exists yet, else the version dep
    /// (so a later insert of this exact item is still observed). Debug
    /// events pass `key: None` here - same rationale as `ReactiveMap`,
    /// `T` is generic with no `Key` conversion.
    pub fn contains(&mut self, item: &T) -> bool {
        let dep = self.dep_for(item);
        track(&dep, ReadKind::Has, "ReactiveSet", None);
        self.data.contains(item)
    }

    pub fn insert(&mut self, item: T) -> bool {
        if self.data.contains(&item) {
            return false;
        }
        let dep = self.dep_for(&item);
        self.data.insert(item);
        trigger(
            [dep, self.version_dep.clone(), self.size_dep.clone()],
            WriteKind::Add,
            "ReactiveSet",
            None,
        );
        true
    }

    pub fn remove(&mut self, item: &T) -> bool {
        if !self.data.remove(item) {
            return false;
        }
        if let Some(dep) = self.item_deps.get(item) {
            trigger(
                [dep.clone(), self.version_dep.clone(), self.size_dep.clone()],
                WriteKind::Delete,
                "ReactiveSet",
                None,
            );
        } else {
            trigger(
                [self.version_dep.clone(), self.size_dep.clone()],
                WriteKind::Delete,
                "ReactiveSet",
                None,
            );
        }
        true
    }

    pub fn clear(&mut self) {
        if self.data.is_empty() {
            return;
        }
        self.data.clear();
        let mut deps: Vec<_> = self.item_deps.values().cloned().collect();
        deps.push(self.version_dep.clone());
        deps.push(self.size_dep.clone());
        trigger(deps, WriteKind::Clear, "ReactiveSet", None);
    }

    /// Track the version dep and return a snapshot of the items, this
    /// crate's equivalent of the spec's "iteration tracks ownKeys".
    pub fn items(&self) -> Vec<&T> {
        track(&self.version_dep, ReadKind::Iterate, "ReactiveSet", None);
        self.data.iter().collect()
    }
}

impl<T: Eq + Hash + Clone> Default for ReactiveSet<T> {
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
    fn contains_on_one_item_does_not_rerun_for_an_insert_of_another() {
        let set: Rc<std::cell::RefCell<ReactiveSet<String>>> =
            Rc::new(std::cell::RefCell::new(ReactiveSet::new()));
        set.borrow_mut().insert("a".to_string());

        let runs = Rc::new(StdCell::new(0));
        let runs_clone = runs.clone();
        let set_clone = set.clone();
        effect(
            move || {
                set_clone.borrow_mut().contains(&"a".to_string());
                runs_clone.set(runs_clone.get() + 1);
            },
            EffectOptions::default(),
        );
        assert_eq!(runs.get(), 1);

        set.borrow_mut().insert("b".to_string());
        assert_eq!(runs.get(), 1);

        set.borrow_mut().remove(&"a".to_string());
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn insert_triggers_size_readers() {
        let set: Rc<std::cell::RefCell<ReactiveSet<i32>>> =
            Rc::new(std::cell::RefCell::new(ReactiveSet::new()));
        let seen = Rc::new(StdCell::new(0));
        let seen_clone = seen.clone();
        let set_clone = set.clone();
        effect(
            move || seen_clone.set(set_clone.borrow().len()),
            EffectOptions::default(),
        );
        assert_eq!(seen.get(), 0);
        set.borrow_mut().insert(1);
        assert_eq!(seen.get(), 1);
    }
}
