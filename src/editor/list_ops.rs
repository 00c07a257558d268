//! Copy-on-write list helpers. Each returns a new `Vec` and leaves the
//! input untouched; callers check indices first.

/// `items` with `item` appended
pub fn appended<T: Clone>(items: &[T], item: T) -> Vec<T> {
    let mut out = Vec::with_capacity(items.len() + 1);
    out.extend_from_slice(items);
    out.push(item);
    out
}

/// `items` with the element at `index` removed, or replaced when
/// `replacement` is given
pub fn spliced<T: Clone>(items: &[T], index: usize, replacement: Option<T>) -> Vec<T> {
    let mut out = items.to_vec();
    match replacement {
        Some(item) => out[index] = item,
        None => {
            out.remove(index);
        }
    }
    out
}

/// `items` with the element at `from` moved to `to`, others keeping their
/// relative order
pub fn moved<T: Clone>(items: &[T], from: usize, to: usize) -> Vec<T> {
    let mut out = items.to_vec();
    let item = out.remove(from);
    out.insert(to.min(out.len()), item);
    out
}

/// Whitespace-only input counts as empty
pub fn blank_if_whitespace(text: &str) -> &str {
    if text.trim().is_empty() { "" } else { text }
}
