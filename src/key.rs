// ============================================================================
// reactive-core - Keys
// ============================================================================
//
// Vue's reactivity core tracks dependencies under arbitrary JS property
// keys (string, integer-string for arrays, or `Symbol` for the handful of
// well-known internal keys like the iteration marker). Rust has no dynamic
// property-key type, so `Key` enumerates the three shapes this crate
// actually needs: named fields on `ReactiveObject`, numeric indices on
// `ReactiveArray`, and a small set of well-known symbols (the iteration
// key, the "has" key for `in`-style checks) used internally by `trigger`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Str(String),
    Index(usize),
    Symbol(&'static str),
}

impl Key {
    /// The well-known key tracked by `for...in`/`Object.keys`-style
    /// iteration (own_keys) reads and invalidated by add/delete/clear
    /// writes.
    pub const ITERATE: Key = Key::Symbol("__iterate__");

    /// The well-known key tracked by `has`-style (`in`/`contains_key`)
    /// reads on map/set-like targets.
    pub const MAP_KEY: Key = Key::Symbol("__map_key_iterate__");
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Str(s) => write!(f, "{s}"),
            Key::Index(i) => write!(f, "[{i}]"),
            Key::Symbol(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Str(s)
    }
}

impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Key::Index(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_compare_and_hash_by_variant_and_value() {
        assert_eq!(Key::from("a"), Key::Str("a".to_string()));
        assert_ne!(Key::from(0usize), Key::Str("0".to_string()));
        assert_eq!(Key::ITERATE, Key::Symbol("__iterate__"));
    }

    #[test]
    fn display_renders_each_variant_distinctly() {
        assert_eq!(Key::from("count").to_string(), "count");
        assert_eq!(Key::from(3usize).to_string(), "[3]");
        assert_eq!(Key::ITERATE.to_string(), "__iterate__");
    }
}
