// ============================================================================
// reactive-core - Effect
// The reactive side-effect node: reruns its function whenever a tracked
// dep it read on its last run fires a trigger.
// ============================================================================
//
// Grounded on the teacher's `EffectInner`/`Effect` (Rc<RefCell<...>> inner,
// `Cell<u32>` flags, weak self-reference for scheduling, RAII `Drop` that
// runs teardown). Dropped relative to the teacher: the effect tree
// (parent/first_child/last_child/sibling pointers) - this crate groups
// effects for bulk disposal via `EffectScope` (see `scope.rs`), which maps
// directly onto §4.7 and makes the teacher's separate parent/child effect
// linking redundant for anything this spec needs. Also dropped: the large
// discriminator flag set (RENDER_EFFECT/BRANCH_EFFECT/...) - since `deps`
// here is a concrete `Vec<Rc<Dep>>` rather than `Vec<Rc<dyn AnySource>>>`,
// there's no trait object to discriminate.
//
// `catch_unwind`/`resume_unwind` around the user function body mirrors the
// teacher's own use of `catch_unwind` in `EffectScopeInner::stop()` for
// running cleanups defensively; here it's used so one panicking effect
// doesn't poison the whole dependency graph mid-dispatch (the dep's
// subscriber snapshot has already been taken - see `dep.rs` - so later
// subscribers in the same trigger still run).

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::panic::{catch_unwind, resume_unwind, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use crate::core::constants::{ReadKind, WriteKind};
use crate::core::context::with_context;
use crate::dep::Dep;
use crate::key::Key;
use crate::scope::current_scope;

pub type EffectFn = Box<dyn FnMut()>;
pub type SchedulerFn = Box<dyn Fn()>;
pub type StopFn = Box<dyn FnOnce()>;
pub type OnTrackFn = Box<dyn Fn(&TrackEvent)>;
pub type OnTriggerFn = Box<dyn Fn(&TriggerEvent)>;

/// Passed to an `on_track` hook: which dep this effect just subscribed to
/// and why. Mirrors Vue's `DebuggerEvent`, minus the `newValue`/`oldValue`
/// payload - carrying an arbitrary `T` through here generically would need
/// the same `dyn Any` type erasure this crate deliberately dropped when it
/// replaced the teacher's `AnySource`/`AnyReaction` traits with concrete
/// types (see `dep.rs`'s module doc), for a debug-only feature that doesn't
/// need it: `target_kind`/`key`/`op` already identify what changed.
#[derive(Debug, Clone)]
pub struct TrackEvent {
    pub target_kind: &'static str,
    pub key: Option<Key>,
    pub op: ReadKind,
}

/// Passed to an `on_trigger` hook: which dep fired and why.
#[derive(Debug, Clone)]
pub struct TriggerEvent {
    pub target_kind: &'static str,
    pub key: Option<Key>,
    pub op: WriteKind,
}

/// Options accepted by `effect()`, mirroring Vue's `ReactiveEffectOptions`.
#[derive(Default)]
pub struct EffectOptions {
    /// Don't run the effect immediately; the caller drives it via the
    /// returned `Effect::run`.
    pub lazy: bool,
    /// Custom scheduler: when a dep this effect reads triggers, call this
    /// instead of re-running the effect function directly.
    pub scheduler: Option<SchedulerFn>,
    /// Allow the effect to trigger itself (otherwise a self-trigger while
    /// the effect is running is ignored, preventing infinite recursion).
    pub allow_recurse: bool,
    /// Run when the effect is stopped.
    pub on_stop: Option<StopFn>,
    /// Debug hook: called every time this effect subscribes to a dep.
    pub on_track: Option<OnTrackFn>,
    /// Debug hook: called every time a dep this effect subscribes to fires,
    /// just before the effect is notified.
    pub on_trigger: Option<OnTriggerFn>,
}

pub struct EffectInner {
    active: Cell<bool>,
    running: Cell<bool>,
    paused: Cell<bool>,
    pending_while_paused: Cell<bool>,
    allow_recurse: Cell<bool>,
    func: RefCell<EffectFn>,
    scheduler: Option<SchedulerFn>,
    on_stop: RefCell<Option<StopFn>>,
    on_track: Option<OnTrackFn>,
    on_trigger: Option<OnTriggerFn>,
    deps: RefCell<Vec<Rc<Dep>>>,
}

impl EffectInner {
    pub fn new(
        func: EffectFn,
        scheduler: Option<SchedulerFn>,
        on_track: Option<OnTrackFn>,
        on_trigger: Option<OnTriggerFn>,
    ) -> Rc<Self> {
        Rc::new(Self {
            active: Cell::new(true),
            running: Cell::new(false),
            paused: Cell::new(false),
            pending_while_paused: Cell::new(false),
            allow_recurse: Cell::new(false),
            func: RefCell::new(func),
            scheduler,
            on_stop: RefCell::new(None),
            on_track,
            on_trigger,
            deps: RefCell::new(Vec::new()),
        })
    }

    /// Called by `tracking::track` right after this effect subscribes to a
    /// dep. A no-op unless `EffectOptions::on_track` was supplied.
    pub fn fire_on_track(&self, event: &TrackEvent) {
        if let Some(on_track) = &self.on_track {
            on_track(event);
        }
    }

    /// Called by `tracking::trigger` for every effect about to be notified
    /// by a firing dep. A no-op unless `EffectOptions::on_trigger` was
    /// supplied.
    pub fn fire_on_trigger(&self, event: &TriggerEvent) {
        if let Some(on_trigger) = &self.on_trigger {
            on_trigger(event);
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    pub fn allows_recurse(&self) -> bool {
        self.allow_recurse.get()
    }

    /// Suspend re-running on trigger; a trigger received while paused is
    /// remembered and replayed once `resume` is called (mirrors the
    /// teacher's scope-level INERT flag, applied per-effect here since
    /// this crate has no parallel flag bitfield to piggyback on).
    pub fn pause(&self) {
        self.paused.set(true);
    }

    pub fn resume(self: &Rc<Self>) {
        if !self.paused.get() {
            return;
        }
        self.paused.set(false);
        if self.pending_while_paused.replace(false) {
            self.notify();
        }
    }

    /// Run the effect function with tracking enabled, recording every dep
    /// read during the run and dropping subscriptions to deps no longer
    /// read (the bit-masked re-tracking pass from §4.2).
    pub fn run(self: &Rc<Self>) {
        if !self.active.get() {
            // Stopped effects still run once, untracked, like Vue's.
            (self.func.borrow_mut())();
            return;
        }

        let depth = with_context(|ctx| {
            ctx.push_effect(self.clone());
            ctx.track_depth()
        });

        for dep in self.deps.borrow().iter() {
            dep.start_generation(depth);
        }

        self.running.set(true);
        let run_result = catch_unwind(AssertUnwindSafe(|| {
            (self.func.borrow_mut())();
        }));
        self.running.set(false);

        for dep in self.deps.borrow().iter() {
            dep.end_generation(self, depth);
        }

        with_context(|ctx| ctx.pop_effect());

        if let Err(payload) = run_result {
            resume_unwind(payload);
        }
    }

    /// Called by `Dep::track` equivalents as this effect reads a dep for
    /// the first time in the current run; kept here so the effect's own
    /// `deps` list (used to drive `start_generation`/`end_generation`
    /// each run) stays in sync with what each dep knows about it.
    pub fn record_dep(&self, dep: &Rc<Dep>) {
        if !self.deps.borrow().iter().any(|d| Rc::ptr_eq(d, dep)) {
            self.deps.borrow_mut().push(dep.clone());
        }
    }

    /// Invoked by `trigger` when a dep this effect subscribes to changes.
    /// Delegates to the scheduler if one was provided, otherwise reruns
    /// the effect function directly - unless the effect is already
    /// running and doesn't allow recursion, in which case the trigger is
    /// dropped to avoid infinite self-recursion.
    pub fn notify(self: &Rc<Self>) {
        if !self.active.get() {
            return;
        }
        if self.paused.get() {
            self.pending_while_paused.set(true);
            return;
        }
        if self.running.get() && !self.allow_recurse.get() {
            return;
        }
        if let Some(scheduler) = &self.scheduler {
            scheduler();
        } else {
            self.run();
        }
    }

    pub fn stop(self: &Rc<Self>) {
        if !self.active.get() {
            return;
        }
        self.active.set(false);
        for dep in self.deps.borrow_mut().drain(..) {
            dep.remove_subscriber(self);
        }
        if let Some(on_stop) = self.on_stop.borrow_mut().take() {
            on_stop();
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// No `Drop` impl: an effect dropped without an explicit `stop()` leaves
// `Weak` entries in its deps' subscriber lists, which simply fail to
// upgrade on the next dispatch (`Dep::subscribers_snapshot` filters them
// out) and get pruned the next time that dep re-tracks.

/// Public handle to a running effect. `drop`ping the last handle does not
/// stop the effect - call `stop()` explicitly, or let the owning
/// `EffectScope` stop it in bulk.
#[derive(Clone)]
pub struct Effect {
    inner: Rc<EffectInner>,
}

impl Effect {
    pub fn inner(&self) -> &Rc<EffectInner> {
        &self.inner
    }

    pub fn stop(&self) {
        self.inner.stop();
    }

    pub fn is_active(&self) -> bool {
        self.inner.is_active()
    }

    /// Re-run the effect manually (used for `lazy` effects, and by
    /// `Computed` to recompute on demand).
    pub fn run(&self) {
        self.inner.run();
    }
}

/// Create and (unless `lazy`) immediately run a reactive effect, scoped to
/// the currently active `EffectScope` if any.
pub fn effect(func: impl FnMut() + 'static, mut opts: EffectOptions) -> Effect {
    let on_stop = opts.on_stop.take();
    let scheduler = opts.scheduler.take();
    let on_track = opts.on_track.take();
    let on_trigger = opts.on_trigger.take();
    let inner = EffectInner::new(Box::new(func), scheduler, on_track, on_trigger);
    inner.allow_recurse.set(opts.allow_recurse);
    *inner.on_stop.borrow_mut() = on_stop;

    if let Some(scope) = current_scope() {
        scope.add_effect(Rc::downgrade(&inner));
    }

    if !opts.lazy {
        inner.run();
    }

    Effect { inner }
}
