// ============================================================================
// reactive-core - Constants
// Operation vocabulary and the bit-diffing depth ceiling
// ============================================================================
//
// The teacher crate this was built from used a large flag bitfield to let
// one trait object (`dyn AnyReaction`) stand in for several concrete node
// kinds (source / derived / effect / scope / repeater...) at once. This
// crate only ever stores one concrete node type in a Dep's subscriber list
// (`Effect`), so that whole discrimination bitfield is gone - `EffectInner`
// carries a couple of plain `Cell<bool>` fields instead (see `effect.rs`).
// What's left here is the vocabulary for track/trigger call sites and the
// constant that bounds the bit-masked re-tracking algorithm.

/// Reads that go through `track`. Carried only for `on_track` debug events;
/// never used for dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadKind {
    Get,
    Has,
    Iterate,
}

/// Writes that go through `trigger`. Carried for `on_trigger` debug events
/// and to let a target decide which deps a given write touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteKind {
    Add,
    Set,
    Delete,
    Clear,
}

/// Recursion depths beyond this fall back to full dep clear + rebuild
/// instead of bit-masked diffing (see `tracking::track`). One bit per
/// depth level in a `u32`, so the usable range is 1..=30.
pub const MAX_TRACK_DEPTH: u32 = 30;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_write_kinds_are_distinguishable() {
        assert_ne!(ReadKind::Get, ReadKind::Has);
        assert_ne!(WriteKind::Add, WriteKind::Set);
    }

    #[test]
    fn max_track_depth_fits_in_u32() {
        assert!(MAX_TRACK_DEPTH < 32);
        let bit: u32 = 1 << MAX_TRACK_DEPTH;
        assert_ne!(bit, 0);
    }
}
