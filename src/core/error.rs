// ============================================================================
// reactive-core - Error taxonomy
// ============================================================================
//
// Most misuse in this API is a warn-and-no-op rather than a `Result`: Vue's
// reactivity core behaves the same way (a write to a readonly proxy logs a
// console warning and is dropped, it doesn't throw). `ReactivityError`
// exists to give those warnings a single, typed, greppable shape; it is
// passed to `tracing::warn!` at the call site rather than returned. The one
// case that really does propagate - a panic inside a user effect callback -
// is handled separately via `catch_unwind`/`resume_unwind` in `effect.rs`
// and is surfaced to `on_stop`/the caller of `EffectScope::stop`, not through
// this enum.
//
// `thiserror` is part of the teacher's ambient stack (see sibling example
// repos' `Cargo.toml`s for the same crate); it gives each variant a
// `Display` impl for free so `tracing::warn!("{err}")` reads naturally.

use thiserror::Error;

use crate::key::Key;

#[derive(Debug, Error)]
pub enum ReactivityError {
    #[error("set operation on key {key:?} failed: target is readonly")]
    ReadOnlyViolation { key: Key },

    #[error("cannot make target reactive: {reason}")]
    InvalidObservationTarget { reason: &'static str },

    /// Unreachable in practice: `object::to_refs` only ever accepts a
    /// `ReactiveObject<T>`, which is reactive by construction, so there is
    /// no "not an observed object" argument Rust's type system would let
    /// through. Kept for parity with the source taxonomy this crate is
    /// modeled on, where `toRefs` accepts any plain object.
    #[error("to_refs() called on a target that is not an observed object")]
    ToRefsOnNonProxy,

    #[error("computed has no setter; write to key {key:?} ignored")]
    ComputedSetterMissing { key: Key },

    #[error("effect callback panicked: {message}")]
    UserFunctionFailure { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_render_a_useful_message() {
        let err = ReactivityError::ReadOnlyViolation {
            key: Key::Str("count".into()),
        };
        assert!(err.to_string().contains("readonly"));

        let err = ReactivityError::ComputedSetterMissing {
            key: Key::Index(0),
        };
        assert!(err.to_string().contains("no setter"));
    }
}
