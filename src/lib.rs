// ============================================================================
// reactive-core - A fine-grained dependency-tracking and effect-scheduling
// engine, modeled on Vue 3's @vue/reactivity.
// ============================================================================
//
// See DESIGN.md for the grounding ledger (what each module is built from in
// the teacher repo and the rest of the example pack) and SPEC_FULL.md for
// the full requirements this crate implements.

pub mod array;
pub mod cell;
pub mod collections;
pub mod computed;
pub mod core;
pub mod dep;
pub mod effect;
pub mod equality;
pub mod key;
mod macros;
pub mod object;
pub mod reactive;
pub mod scope;
pub mod tracking;

pub use crate::core::error::ReactivityError;
pub use crate::core::{
    enable_tracking, is_batching, is_tracking, pause_tracking, reset_tracking, untracked,
    with_context, ReactiveContext,
};

pub use array::ReactiveArray;
pub use cell::{custom_ref, is_ref, reactive_ref, ref_with_equals, shallow_ref, trigger_ref, unref, Ref};
pub use collections::{ReactiveMap, ReactiveSet};
pub use computed::{computed, computed_with_setter, peek, Computed};
pub use dep::Dep;
pub use effect::{effect, Effect, EffectOptions, TrackEvent, TriggerEvent};
pub use equality::{
    always_equals, by_field, equals, has_changed, has_changed_f32, has_changed_f64,
    never_equals, shallow_equals_slice, EqualsFn,
};
pub use key::Key;
pub use object::{proxy_refs, to_ref, to_refs, ProxyRefs, ReactiveObject, Slot};
pub use reactive::{
    is_proxy, is_reactive, is_readonly, is_shallow, readonly, reactive, to_raw, Observable,
};
pub use scope::{effect_scope, on_scope_dispose, EffectScope};
pub use tracking::{batch, track, trigger};
