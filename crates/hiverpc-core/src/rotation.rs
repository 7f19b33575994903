//! Endpoint rotation policy.
//!
//! Hive API nodes are interchangeable; when one stops answering, the fetch
//! driver moves to the next address in the caller's list. Rotation is a pure
//! function over the read-only endpoint list — the list is never mutated,
//! only the current pointer advances.

/// Returns the endpoint following `current` in `all`, wrapping to the
/// first element when `current` is last.
///
/// `current` is expected to be a member of `all` (exact match). If it is
/// not, the first element is returned so rotation stays total and
/// deterministic.
///
/// # Panics
///
/// Panics if `all` is empty — there is nothing to rotate to.
pub fn next_node<'a>(current: &str, all: &'a [String]) -> &'a str {
    assert!(!all.is_empty(), "endpoint list must not be empty");
    match all.iter().position(|a| a == current) {
        Some(index) if index + 1 < all.len() => &all[index + 1],
        _ => &all[0],
    }
}
