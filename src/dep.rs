// ============================================================================
// reactive-core - Dep
// The dependency node: one per tracked (target, key) pair, holding the set
// of effects currently subscribed to it.
// ============================================================================
//
// Grounded on the teacher's `SourceInner<T>` (Rc<RefCell<...>>, a
// `Vec<Weak<dyn AnyReaction>>` subscriber list, pointer-identity removal).
// The teacher stores a *value* alongside the subscriber list because its
// `SourceInner<T>` doubles as both the dep and the cell; here the value
// lives in the target (`ReactiveObject`/`ReactiveArray`/`Ref`) and `Dep`
// only tracks who reads it, so it drops the `value`/`equals` fields and
// gains the bit-masked re-tracking state the teacher's version-counter
// scheme didn't implement (its own comments admit the version check was a
// stand-in - see `reactivity/tracking.rs::is_dirty`).
//
// `was_tracked`/`new_tracked` are per the spec's re-tracking algorithm:
// each bit is one level of effect-run recursion depth (`context::track_depth`).
// When an effect begins, the dep's bit for the new depth starts the run
// cleared in `new_tracked`; every `track()` call during the run sets that
// bit. At the end of the run, any dep whose depth bit is set in
// `was_tracked` but not in `new_tracked` is stale and gets its effect
// removed; `new_tracked` becomes the next `was_tracked`. Beyond
// `MAX_TRACK_DEPTH` the bit scheme is abandoned for a full rebuild
// (see `effect.rs`).

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::core::constants::MAX_TRACK_DEPTH;
use crate::effect::EffectInner;

pub struct Dep {
    subscribers: RefCell<Vec<Weak<EffectInner>>>,
    was_tracked: Cell<u32>,
    new_tracked: Cell<u32>,
}

impl Dep {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            subscribers: RefCell::new(Vec::new()),
            was_tracked: Cell::new(0),
            new_tracked: Cell::new(0),
        })
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    pub fn has_subscribers(&self) -> bool {
        !self.subscribers.borrow().is_empty()
    }

    /// Record that `effect`, currently running at `depth`, read this dep.
    /// Mirrors the spec's `trackEffects`: below the depth ceiling, set the
    /// bit and skip re-adding an already-subscribed effect; at/above the
    /// ceiling, fall back to a plain "already subscribed?" linear check.
    pub fn track(&self, effect: &Rc<EffectInner>, depth: u32) {
        if depth == 0 || depth > MAX_TRACK_DEPTH {
            self.track_unbounded(effect);
            return;
        }

        let bit = 1u32 << depth;
        if self.new_tracked.get() & bit != 0 {
            // Already recorded this dep for this effect at this depth in
            // the current run; nothing new to do.
            return;
        }
        self.new_tracked.set(self.new_tracked.get() | bit);

        if self.was_tracked.get() & bit == 0 || !self.is_subscribed(effect) {
            self.add_subscriber(effect);
        }
    }

    fn track_unbounded(&self, effect: &Rc<EffectInner>) {
        if !self.is_subscribed(effect) {
            self.add_subscriber(effect);
        }
    }

    fn is_subscribed(&self, effect: &Rc<EffectInner>) -> bool {
        self.subscribers
            .borrow()
            .iter()
            .any(|w| w.as_ptr() == Rc::as_ptr(effect))
    }

    fn add_subscriber(&self, effect: &Rc<EffectInner>) {
        self.subscribers.borrow_mut().push(Rc::downgrade(effect));
    }

    /// Begin a new tracking generation at `depth`: clear the bit in
    /// `new_tracked` so this run records fresh usage for that depth.
    pub fn start_generation(&self, depth: u32) {
        if depth == 0 || depth > MAX_TRACK_DEPTH {
            return;
        }
        let bit = 1u32 << depth;
        self.new_tracked.set(self.new_tracked.get() & !bit);
    }

    /// End a tracking generation: drop the subscriber if it stopped
    /// reading this dep (bit was set before the run, cleared now), then
    /// roll `new_tracked`'s bit into `was_tracked` for next time.
    pub fn end_generation(&self, effect: &Rc<EffectInner>, depth: u32) {
        if depth == 0 || depth > MAX_TRACK_DEPTH {
            return;
        }
        let bit = 1u32 << depth;
        let was = self.was_tracked.get() & bit != 0;
        let now = self.new_tracked.get() & bit != 0;
        if was && !now {
            self.remove_subscriber(effect);
        }
        let was_tracked = (self.was_tracked.get() & !bit) | (self.new_tracked.get() & bit);
        self.was_tracked.set(was_tracked);
    }

    pub fn remove_subscriber(&self, effect: &Rc<EffectInner>) {
        self.subscribers
            .borrow_mut()
            .retain(|w| w.as_ptr() != Rc::as_ptr(effect));
    }

    /// Snapshot the live subscribers for dispatch. Cloned into a `Vec`
    /// (collect-then-mutate) so trigger handlers can freely run effects -
    /// which may re-enter this dep (subscribe/unsubscribe) - without
    /// holding the `RefCell` borrow across that work.
    pub fn subscribers_snapshot(&self) -> Vec<Rc<EffectInner>> {
        self.subscribers
            .borrow()
            .iter()
            .filter_map(|w| w.upgrade())
            .collect()
    }

    pub fn clear(&self) {
        self.subscribers.borrow_mut().clear();
        self.was_tracked.set(0);
        self.new_tracked.set(0);
    }
}

impl Default for Dep {
    fn default() -> Self {
        Self {
            subscribers: RefCell::new(Vec::new()),
            was_tracked: Cell::new(0),
            new_tracked: Cell::new(0),
        }
    }
}
