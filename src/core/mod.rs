// ============================================================================
// reactive-core - Core Module
// Fundamental types, the reactive context, and error types
// ============================================================================

pub mod constants;
pub mod context;
pub mod error;

pub use constants::{ReadKind, WriteKind, MAX_TRACK_DEPTH};
pub use context::{
    is_batching, is_tracking, pause_tracking, enable_tracking, reset_tracking, untracked,
    with_context, ReactiveContext,
};
pub use error::ReactivityError;
