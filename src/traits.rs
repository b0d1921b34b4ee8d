//! Common traits and error types for meldable heaps
//!
//! [`MeldableHeap`] captures the operations a hollow heap offers so that the
//! graph algorithms in [`crate::pathfinding`] and [`crate::graph`] can be
//! written against the abstract interface rather than a concrete heap.
//!
//! Unlike `std::collections::BinaryHeap`, these heaps store (key, value) pairs
//! to separate the ordering key from the data, and every insertion returns a
//! handle that identifies the element for later `decrease_key` calls.

use std::fmt;

/// Error type for heap operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// The new key is greater than the item's current key
    InvalidKeyOrder,
    /// The item was already removed by a previous `delete_min`
    ItemNotLive,
    /// The operation needs a non-empty heap
    EmptyHeap,
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::InvalidKeyOrder => {
                write!(f, "new key is greater than the current key")
            }
            HeapError::ItemNotLive => {
                write!(f, "item is no longer live (it was removed from the heap)")
            }
            HeapError::EmptyHeap => write!(f, "heap is empty"),
        }
    }
}

impl std::error::Error for HeapError {}

/// A handle to an element in the heap, used for `decrease_key` and key lookups
///
/// Handles are cheap to clone; two handles are equal when they identify the
/// same element.
pub trait Handle: Clone + PartialEq + Eq + fmt::Debug {}

/// Meldable, addressable min-heap
///
/// # Example
///
/// ```rust
/// use hollow_heap::{HollowHeap, MeldableHeap};
///
/// let mut heap = HollowHeap::new();
/// let handle = heap.insert(10, "item");
/// heap.decrease_key(&handle, 5).unwrap();
/// assert_eq!(heap.key_of(&handle), Ok(5));
/// assert_eq!(heap.find_min(), Some(handle));
/// ```
pub trait MeldableHeap<K: Ord, V> {
    /// The handle type returned on insertion
    type Handle: Handle;

    /// Creates a new empty heap
    fn new() -> Self;

    /// Returns true if the heap holds no live items
    fn is_empty(&self) -> bool;

    /// Returns the number of live items in the heap
    fn len(&self) -> usize;

    /// Inserts a value with the given key, returning a handle to it
    ///
    /// # Time Complexity
    /// O(1)
    fn insert(&mut self, key: K, value: V) -> Self::Handle;

    /// Returns a handle to an item with the minimum key without removing it
    ///
    /// # Time Complexity
    /// O(1)
    fn find_min(&self) -> Option<Self::Handle>;

    /// Removes an item with the minimum key, returning its key and handle
    ///
    /// The returned handle is no longer live. Returns `None` on an empty heap.
    ///
    /// # Time Complexity
    /// O(log n) amortized
    fn delete_min(&mut self) -> Option<(K, Self::Handle)>;

    /// Merges another heap into this one, consuming the other heap
    ///
    /// # Time Complexity
    /// O(1)
    fn merge(&mut self, other: Self);

    /// Lowers the key of the item identified by `handle`
    ///
    /// # Errors
    /// - [`HeapError::ItemNotLive`] if the item was already removed
    /// - [`HeapError::EmptyHeap`] if this heap is empty
    /// - [`HeapError::InvalidKeyOrder`] if `new_key` is greater than the
    ///   current key; the heap is left unchanged
    ///
    /// # Time Complexity
    /// O(1) amortized
    fn decrease_key(&mut self, handle: &Self::Handle, new_key: K) -> Result<(), HeapError>;

    /// Returns the current key of a live item
    fn key_of(&self, handle: &Self::Handle) -> Result<K, HeapError>
    where
        K: Clone;

    /// Returns the value stored for an item, live or not
    fn value_of<'a>(&self, handle: &'a Self::Handle) -> &'a V;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            HeapError::InvalidKeyOrder.to_string(),
            "new key is greater than the current key"
        );
        assert_eq!(HeapError::EmptyHeap.to_string(), "heap is empty");
        assert!(HeapError::ItemNotLive.to_string().contains("no longer live"));
    }

    #[test]
    fn test_error_is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(HeapError::ItemNotLive);
        assert!(err.source().is_none());
    }
}
