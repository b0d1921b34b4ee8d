//! Hollow Heap for Rust
//!
//! A hollow heap is a meldable, addressable priority queue with the amortized
//! bounds of a Fibonacci heap:
//!
//! - **insert**, **find_min**, **merge**: O(1)
//! - **decrease_key**: O(1) amortized
//! - **delete_min**: O(log n) amortized
//!
//! Decrease-key never restructures the heap: it moves the item into a fresh
//! node and leaves the old node behind *hollow*. Delete-min later sweeps the
//! hollow nodes away while consolidating the remaining nodes by rank.
//!
//! The crate also ships graph algorithms that benefit from cheap
//! decrease-key: Dijkstra and A* over implicit graphs ([`pathfinding`]) and,
//! with the default `graph` feature, shortest paths and minimum spanning trees
//! over an explicit graph ([`graph`]).
//!
//! # Example
//!
//! ```rust
//! use hollow_heap::{HollowHeap, MeldableHeap};
//!
//! let mut heap = HollowHeap::new();
//! let five = heap.insert(5, "five");
//! heap.insert(3, "three");
//! heap.decrease_key(&five, 1).unwrap();
//!
//! assert_eq!(heap.find_min(), Some(five));
//! let drained: Vec<i32> = std::iter::from_fn(|| heap.delete_min().map(|(key, _)| key)).collect();
//! assert_eq!(drained, vec![1, 3]);
//! ```

mod consolidate;
#[cfg(feature = "graph")]
pub mod graph;
pub mod hollow;
pub mod item;
mod node;
pub mod pathfinding;
pub mod rank;
pub mod traits;

pub use consolidate::SweepStats;
pub use hollow::{HollowHeap, StructureViolation};
pub use item::Item;
pub use traits::{Handle, HeapError, MeldableHeap};
