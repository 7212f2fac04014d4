// ============================================================================
// reactive-core - Reactive context
// Thread-local state backing track/trigger: the active-effect stack, the
// should-track stack, and the batch/flush queues.
// ============================================================================
//
// Grounded on the teacher's `ReactiveContext` (single thread_local, RefCell/
// Cell fields, `with_context` accessor). Two fields changed shape because
// the spec calls for real stacks rather than single slots:
//   - `active_reaction`/`active_effect` (single `Option` slots) became
//     `effect_stack: RefCell<Vec<Rc<EffectInner>>>` so a nested effect run
//     restores the outer effect as active when the inner one exits.
//   - `untracking: Cell<bool>` became `should_track_stack: RefCell<Vec<bool>>`
//     per §4.1's `pauseTracking`/`resetTracking`, which nest and must
//     restore the exact prior value rather than an assumed default.
// `track_depth` is new: it is the recursion depth `d` used to compute the
// bit (`1 << d`) that `Dep::track` sets in `was_tracked`/`new_tracked`.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::effect::EffectInner;

/// Per-thread reactive state. One instance lives in a `thread_local!` below;
/// all access goes through `with_context`.
pub struct ReactiveContext {
    /// Stack of effects currently running. The top is "the active effect";
    /// reads made while it is non-empty get tracked against that effect.
    effect_stack: RefCell<Vec<Rc<EffectInner>>>,

    /// Stack of `should_track` booleans. `pause_tracking` pushes `false`,
    /// `enable_tracking` pushes `true`, `reset_tracking` pops. Reads are
    /// tracked only when the top of this stack is `true` (or the stack is
    /// empty, which also means "track").
    should_track_stack: RefCell<Vec<bool>>,

    /// Recursion depth of the current track run, used as the bit index
    /// into a `Dep`'s `was_tracked`/`new_tracked` masks.
    track_depth: Cell<u32>,

    /// Number of nested `batch()` calls currently open.
    batch_depth: Cell<u32>,

    /// Effects queued for the end of the current batch (or immediate
    /// flush if no batch is open).
    pending_effects: RefCell<Vec<Weak<EffectInner>>>,

    /// Guard against a flush recursively re-entering itself (an effect
    /// that writes to one of its own dependencies).
    flushing: Cell<bool>,
}

impl ReactiveContext {
    fn new() -> Self {
        Self {
            effect_stack: RefCell::new(Vec::new()),
            should_track_stack: RefCell::new(Vec::new()),
            track_depth: Cell::new(0),
            batch_depth: Cell::new(0),
            pending_effects: RefCell::new(Vec::new()),
            flushing: Cell::new(false),
        }
    }

    // -- active effect -----------------------------------------------------

    pub fn active_effect(&self) -> Option<Rc<EffectInner>> {
        self.effect_stack.borrow().last().cloned()
    }

    pub fn push_effect(&self, effect: Rc<EffectInner>) {
        self.effect_stack.borrow_mut().push(effect);
        self.track_depth.set(self.track_depth.get() + 1);
    }

    pub fn pop_effect(&self) {
        self.effect_stack.borrow_mut().pop();
        self.track_depth.set(self.track_depth.get().saturating_sub(1));
    }

    pub fn track_depth(&self) -> u32 {
        self.track_depth.get()
    }

    // -- should-track stack --------------------------------------------------

    pub fn should_track(&self) -> bool {
        *self.should_track_stack.borrow().last().unwrap_or(&true)
    }

    pub fn push_should_track(&self, value: bool) {
        self.should_track_stack.borrow_mut().push(value);
    }

    pub fn pop_should_track(&self) {
        self.should_track_stack.borrow_mut().pop();
    }

    // -- batching ----------------------------------------------------------

    pub fn enter_batch(&self) {
        self.batch_depth.set(self.batch_depth.get() + 1);
    }

    /// Returns `true` if this was the outermost batch (the caller should
    /// flush now).
    pub fn exit_batch(&self) -> bool {
        let depth = self.batch_depth.get().saturating_sub(1);
        self.batch_depth.set(depth);
        depth == 0
    }

    pub fn is_batching(&self) -> bool {
        self.batch_depth.get() > 0
    }

    pub fn queue_effect(&self, effect: Weak<EffectInner>) {
        self.pending_effects.borrow_mut().push(effect);
    }

    pub fn take_pending_effects(&self) -> Vec<Weak<EffectInner>> {
        std::mem::take(&mut *self.pending_effects.borrow_mut())
    }

    pub fn has_pending_effects(&self) -> bool {
        !self.pending_effects.borrow().is_empty()
    }

    pub fn is_flushing(&self) -> bool {
        self.flushing.get()
    }

    pub fn set_flushing(&self, value: bool) {
        self.flushing.set(value);
    }
}

impl Default for ReactiveContext {
    fn default() -> Self {
        Self::new()
    }
}

thread_local! {
    static CONTEXT: ReactiveContext = ReactiveContext::new();
}

/// Run `f` with access to the thread-local reactive context.
pub fn with_context<R>(f: impl FnOnce(&ReactiveContext) -> R) -> R {
    CONTEXT.with(f)
}

/// Is a read right now observed by an active effect with tracking enabled?
pub fn is_tracking() -> bool {
    with_context(|ctx| ctx.active_effect().is_some() && ctx.should_track())
}

/// Disable tracking for subsequent reads until `reset_tracking` is called.
/// Nests: each call must be paired with exactly one `reset_tracking`.
pub fn pause_tracking() {
    with_context(|ctx| ctx.push_should_track(false));
}

/// Force-enable tracking for subsequent reads until `reset_tracking` is
/// called, even inside an outer `pause_tracking`. Nests the same way.
pub fn enable_tracking() {
    with_context(|ctx| ctx.push_should_track(true));
}

/// Restore the `should_track` state from before the matching
/// `pause_tracking`/`enable_tracking` call.
pub fn reset_tracking() {
    with_context(|ctx| ctx.pop_should_track());
}

/// Check if currently in a batch.
pub fn is_batching() -> bool {
    with_context(|ctx| ctx.is_batching())
}

/// Run `f` with tracking disabled, regardless of the ambient state, and
/// restore it afterwards. Equivalent to Vue's `untrack`/`peek`.
pub fn untracked<R>(f: impl FnOnce() -> R) -> R {
    pause_tracking();
    let result = f();
    reset_tracking();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracking_is_on_by_default_outside_any_effect() {
        with_context(|ctx| assert!(ctx.should_track()));
    }

    #[test]
    fn pause_and_reset_tracking_nests() {
        with_context(|ctx| {
            assert!(ctx.should_track());
            ctx.push_should_track(false);
            assert!(!ctx.should_track());
            ctx.push_should_track(true);
            assert!(ctx.should_track());
            ctx.pop_should_track();
            assert!(!ctx.should_track());
            ctx.pop_should_track();
            assert!(ctx.should_track());
        });
    }

    #[test]
    fn untracked_restores_prior_state() {
        untracked(|| {
            with_context(|ctx| assert!(!ctx.should_track()));
        });
        with_context(|ctx| assert!(ctx.should_track()));
    }

    #[test]
    fn batch_depth_tracks_nesting() {
        with_context(|ctx| {
            assert!(!ctx.is_batching());
            ctx.enter_batch();
            ctx.enter_batch();
            assert!(ctx.is_batching());
            assert!(!ctx.exit_batch());
            assert!(ctx.is_batching());
            assert!(ctx.exit_batch());
            assert!(!ctx.is_batching());
        });
    }
}
