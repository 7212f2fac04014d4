// ============================================================================
// reactive-core - Equality
// Same-value-zero comparison used by `trigger` to decide whether a write
// actually changed anything (§4.3's `hasChanged`).
// ============================================================================
//
// Ported close to verbatim from the teacher's `reactivity/equality.rs` -
// it already implements exactly the NaN-safe "same-value-zero" semantics
// the spec calls for (`hasChanged`), just under a different name. The
// `EqualsFn<T>` type alias the teacher threaded through `SourceInner<T>`
// is gone along with that struct; equality functions here are plain `fn`
// items/closures passed directly where a cell needs custom comparison.

pub type EqualsFn<T> = fn(&T, &T) -> bool;

/// Default strict equality using `PartialEq`. The default comparator for
/// every reactive cell unless a custom one is supplied.
pub fn equals<T: PartialEq>(a: &T, b: &T) -> bool {
    a == b
}

/// Same-value-zero for `f64`: NaN is considered equal to NaN, unlike raw
/// IEEE 754 comparison. This is what `has_changed` uses for float cells so
/// a `Ref<f64>` holding NaN doesn't re-trigger on every read-modify-write.
pub fn has_changed_f64(a: &f64, b: &f64) -> bool {
    if a.is_nan() {
        return !b.is_nan();
    }
    a != b
}

pub fn has_changed_f32(a: &f32, b: &f32) -> bool {
    if a.is_nan() {
        return !b.is_nan();
    }
    a != b
}

/// The general entry point: "did this write actually change the value?"
/// Delegates to `PartialEq` for everything except the float NaN corner
/// case, which needs the same-value-zero override above.
pub fn has_changed<T: PartialEq>(new: &T, old: &T) -> bool {
    new != old
}

pub fn shallow_equals_slice<T: PartialEq>(a: &[T], b: &[T]) -> bool {
    a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x == y)
}

/// Never equal - every write is treated as a change. Useful for cells
/// whose value type can't implement `PartialEq` meaningfully (e.g.
/// closures) but should still trigger on every `set`.
pub fn never_equals<T>(_a: &T, _b: &T) -> bool {
    false
}

/// Always equal - a write never triggers. Used by `shallow_ref`-style
/// cells where identity, not structural equality, decides whether the
/// outer cell changed (the nested container's own reactivity handles the
/// rest).
pub fn always_equals<T>(_a: &T, _b: &T) -> bool {
    true
}

/// Build an equality function that compares two values by a projected
/// field rather than structurally.
pub fn by_field<T, F, R>(field_fn: F) -> impl Fn(&T, &T) -> bool
where
    F: Fn(&T) -> R,
    R: PartialEq,
{
    move |a, b| field_fn(a) == field_fn(b)
}
