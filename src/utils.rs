//! Text normalization helpers shared by the resolver and the filters.

/// Remove every whitespace character and lower-case the rest.
///
/// Unicode-aware, so Greek headers and non-breaking spaces normalize the same
/// way as ASCII ones.
pub fn compact_lowercase<T: AsRef<str>>(text: T) -> String {
    text.as_ref()
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// True when either string contains the other.
pub fn contains_either(left: &str, right: &str) -> bool {
    left.contains(right) || right.contains(left)
}
