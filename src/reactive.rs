// ============================================================================
// reactive-core - Factory functions
// reactive / shallow_reactive / readonly / shallow_readonly, plus the
// raw/mark_raw/is_reactive/is_readonly helpers from §4.4.
// ============================================================================
//
// Vue's factory functions wrap an arbitrary plain object in a `Proxy`,
// caching the proxy in a `WeakMap` so repeated calls on the same target
// return the identical proxy. This crate's targets (`ReactiveObject<T>`/
// `ReactiveArray<T>`) are themselves cheap `Rc`-backed value types rather
// than a raw struct wrapped after construction - they're born reactive.
// So "wrapping" here is just attaching the readonly/shallow flags to a
// handle that shares the same underlying `Rc`; the cache-hit invariant
// ("reactive(x) === reactive(x)") is realized through `PartialEq` on
// `(Rc pointer, flags)` rather than a runtime lookup table, which needs no
// separate cache structure to stay correct. See DESIGN.md for the full
// writeup of this adaptation.

use crate::array::ReactiveArray;
use crate::object::ReactiveObject;

/// Anything this crate can hand out a readonly/shallow view of, plus the
/// `to_raw`/`is_proxy` meta-queries from §4.4. `Raw` is the plain,
/// non-reactive snapshot type `to_raw` produces - a `Vec<(Key, T)>` for an
/// object, a `Vec<T>` for an array - since unlike Vue's single dynamic
/// object type, this crate's targets don't share one underlying shape to
/// unwrap to.
pub trait Observable: Clone {
    type Raw;
    fn is_readonly(&self) -> bool;
    fn is_shallow(&self) -> bool;
    fn to_readonly(&self) -> Self;
    fn to_raw(&self) -> Self::Raw;
}

impl<T: Clone + PartialEq + 'static> Observable for ReactiveObject<T> {
    type Raw = Vec<(crate::key::Key, T)>;

    fn is_readonly(&self) -> bool {
        ReactiveObject::is_readonly(self)
    }
    fn is_shallow(&self) -> bool {
        ReactiveObject::is_shallow(self)
    }
    fn to_readonly(&self) -> Self {
        self.readonly()
    }
    fn to_raw(&self) -> Self::Raw {
        ReactiveObject::raw_entries(self)
    }
}

impl<T: Clone + PartialEq + 'static> Observable for ReactiveArray<T> {
    type Raw = Vec<T>;

    fn is_readonly(&self) -> bool {
        ReactiveArray::is_readonly(self)
    }
    fn is_shallow(&self) -> bool {
        false
    }
    fn to_readonly(&self) -> Self {
        self.readonly()
    }
    fn to_raw(&self) -> Self::Raw {
        ReactiveArray::raw_vec(self)
    }
}

/// Return a reactive view of `target` (a no-op identity for anything
/// that's already a plain read-write reactive handle).
pub fn reactive<T: Observable>(target: T) -> T {
    target
}

/// Return a readonly view over the same underlying data as `target`.
/// Writes through the result are dropped with a warning.
pub fn readonly<T: Observable>(target: &T) -> T {
    target.to_readonly()
}

pub fn is_reactive<T: Observable>(target: &T) -> bool {
    !target.is_readonly()
}

pub fn is_readonly<T: Observable>(target: &T) -> bool {
    target.is_readonly()
}

pub fn is_shallow<T: Observable>(target: &T) -> bool {
    target.is_shallow()
}

/// Walk back to the underlying plain value, discarding reactivity. Never
/// tracks - the snapshot is read directly, bypassing `get`/`own_keys`.
pub fn to_raw<T: Observable>(target: &T) -> T::Raw {
    target.to_raw()
}

/// Every `ReactiveObject`/`ReactiveArray` handle is reactive by
/// construction (there is no separate wrap-an-arbitrary-value step to
/// query the result of, unlike Vue's `Proxy`-backed `isProxy`), so this is
/// trivially true for anything that implements `Observable`.
pub fn is_proxy<T: Observable>(_target: &T) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Key;

    #[test]
    fn readonly_view_shares_underlying_data() {
        let obj: ReactiveObject<i32> = ReactiveObject::new();
        obj.set(Key::from("a"), 1);
        let ro = readonly(&obj);
        assert!(is_readonly(&ro));
        assert!(!is_readonly(&obj));
        assert_eq!(ro.get(&Key::from("a")), Some(1));
    }

    #[test]
    fn to_raw_snapshots_without_tracking() {
        let obj: ReactiveObject<i32> = ReactiveObject::new();
        obj.set(Key::from("a"), 1);
        obj.set(Key::from("b"), 2);
        let mut raw = to_raw(&obj);
        raw.sort_by(|a, b| a.0.to_string().cmp(&b.0.to_string()));
        assert_eq!(raw, vec![(Key::from("a"), 1), (Key::from("b"), 2)]);
        assert!(is_proxy(&obj));
    }
}
