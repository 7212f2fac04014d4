// ============================================================================
// reactive-core - Reactive Collections
// Maps and Sets with fine-grained per-key/item reactivity
// ============================================================================
//
// Ports the teacher's ReactiveMap/ReactiveSet onto this crate's Dep/track/
// trigger primitives. `ReactiveVec` has no counterpart here: array-shaped
// reactivity is covered by `crate::array::ReactiveArray`, which additionally
// implements the spec's identity-search and length-mutator instrumentation
// (§4.3) that a bare vec port wouldn't have.
//
// Each collection has three levels of reactivity:
// 1. Per-key/item signals: only triggers when that specific element changes
// 2. Version dep: triggers on structural changes (add/remove)
// 3. Size dep: triggers when count changes

mod map;
mod set;

pub use map::ReactiveMap;
pub use set::ReactiveSet;
