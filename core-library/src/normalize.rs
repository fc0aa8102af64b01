//! Name normalisation shared by reserved-playlist detection, name-based
//! identity fallback and collation.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonical decomposition with combining marks removed, trimmed and
/// lowercased. `"  En Caché "` becomes `"en cache"`.
pub fn fold_name(name: &str) -> String {
    strip_marks(name).trim().to_lowercase()
}

/// Canonical decomposition with combining marks removed. Case and
/// surrounding whitespace are preserved.
pub fn strip_marks(name: &str) -> String {
    name.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Identity key used when an artist is matched by name: lowercase only,
/// without accent folding or trimming.
pub fn name_key(name: &str) -> String {
    name.to_lowercase()
}

/// True when the value is absent or only whitespace.
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}
