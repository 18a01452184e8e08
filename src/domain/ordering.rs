//! Positional primitives for ordered card sequences.
//!
//! Both functions are pure: they read the input slices and return freshly
//! built vectors, leaving the originals untouched.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderingError {
    #[error("index {index} out of range for sequence of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("element not present in source sequence")]
    NotPresent,

    #[error("element already present in destination sequence")]
    AlreadyPresent,
}

/// Moves the element at `from` so that it ends up at `to`
///
/// `to` is interpreted against the sequence *after* the element has been
/// removed, so both indices must be below `sequence.len()`.
///
/// # Examples
/// ```
/// use taskboard_core::domain::ordering::relocate;
///
/// let moved = relocate(&["a", "b", "c"], 0, 2).unwrap();
/// assert_eq!(moved, vec!["b", "c", "a"]);
/// ```
pub fn relocate<T: Clone>(sequence: &[T], from: usize, to: usize) -> Result<Vec<T>, OrderingError> {
    let len = sequence.len();
    for index in [from, to] {
        if index >= len {
            return Err(OrderingError::IndexOutOfRange { index, len });
        }
    }

    let mut moved = sequence.to_vec();
    let item = moved.remove(from);
    moved.insert(to, item);
    Ok(moved)
}

/// Moves `item` out of `source` and into `dest` at `dest_index`
///
/// `dest_index` is interpreted against the unmodified `dest`, so any value
/// in `0..=dest.len()` is accepted.
pub fn splice_across<T: Clone + PartialEq>(
    source: &[T],
    dest: &[T],
    item: &T,
    dest_index: usize,
) -> Result<(Vec<T>, Vec<T>), OrderingError> {
    let position = source
        .iter()
        .position(|candidate| candidate == item)
        .ok_or(OrderingError::NotPresent)?;

    if dest.contains(item) {
        return Err(OrderingError::AlreadyPresent);
    }
    if dest_index > dest.len() {
        return Err(OrderingError::IndexOutOfRange {
            index: dest_index,
            len: dest.len(),
        });
    }

    let mut new_source = source.to_vec();
    new_source.remove(position);

    let mut new_dest = Vec::with_capacity(dest.len() + 1);
    new_dest.extend_from_slice(&dest[..dest_index]);
    new_dest.push(item.clone());
    new_dest.extend_from_slice(&dest[dest_index..]);

    Ok((new_source, new_dest))
}
