//! Hollow Heap implementation
//!
//! A hollow heap has the amortized efficiency of a Fibonacci heap with a much
//! simpler structure.
//!
//! # Time Complexity
//!
//! | Operation      | Complexity           |
//! |----------------|----------------------|
//! | `insert`       | O(1) worst-case      |
//! | `find_min`     | O(1) worst-case      |
//! | `merge`        | O(1) worst-case      |
//! | `decrease_key` | O(1) amortized       |
//! | `delete_min`   | O(log n) amortized   |
//!
//! # Key Ideas
//!
//! 1. **Lazy deletion for decrease-key**: instead of cutting a node out of the
//!    structure, decrease-key moves the item to a fresh node with the lower key
//!    and leaves the old node behind *hollow*. The fresh node is melded with
//!    the root in O(1).
//!
//! 2. **DAG structure**: the hollow node is also hung below the fresh node and
//!    remembers it as its *second parent*, so its subtree stays reachable from
//!    two places. Delete-min visits such a node only once both parents have
//!    been visited.
//!
//! # References
//!
//! - Hansen, T.D., Kaplan, H., Tarjan, R.E., Zwick, U. (2017). "Hollow Heaps."
//!   *ACM Transactions on Algorithms*, 13(3), 42.
//!   [arXiv:1510.06535](https://arxiv.org/abs/1510.06535)

use crate::consolidate::{self, SweepStats};
use crate::item::{Item, ItemCell};
use crate::node::{self, Content, Node, NodeRef};
use crate::rank;
use crate::traits::{HeapError, MeldableHeap};
use rustc_hash::{FxHashMap, FxHashSet};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Hollow Heap
///
/// # Example
///
/// ```rust
/// use hollow_heap::{HollowHeap, MeldableHeap};
///
/// let mut heap = HollowHeap::new();
/// heap.insert(5, "five");
/// let three = heap.insert(3, "three");
/// let eight = heap.insert(8, "eight");
///
/// heap.decrease_key(&eight, 1).unwrap();
/// assert_eq!(heap.find_min(), Some(eight.clone()));
///
/// let (key, item) = heap.delete_min().unwrap();
/// assert_eq!((key, item.value()), (1, &"eight"));
/// assert_eq!(heap.find_min(), Some(three));
/// ```
pub struct HollowHeap<K, V> {
    /// Root of the heap (None if empty); always full
    root: Option<NodeRef<K, V>>,
    /// Number of live items
    len: usize,
    stats: SweepStats,
}

impl<K, V> HollowHeap<K, V> {
    /// Counters describing the work this heap (and heaps merged into it) did
    pub fn stats(&self) -> SweepStats {
        self.stats
    }

    /// Removes every item, marking each of them not live.
    ///
    /// Runs in time proportional to the size of the structure, without
    /// recursion.
    pub fn clear(&mut self) {
        let mut stack: Vec<NodeRef<K, V>> = self.root.take().into_iter().collect();
        while let Some(node) = stack.pop() {
            let mut inner = node.borrow_mut();
            if let Content::Full { item, .. } = &inner.content {
                item.retire();
            }
            inner.second_parent = None;
            stack.extend(inner.children.drain(..));
        }
        self.len = 0;
    }
}

impl<K, V> Drop for HollowHeap<K, V> {
    fn drop(&mut self) {
        // Dropping nested Rc chains recursively can overflow the stack on deep dags
        self.clear();
    }
}

impl<K: Ord, V> Default for HollowHeap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for HollowHeap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HollowHeap")
            .field("len", &self.len)
            .field("stats", &self.stats)
            .finish()
    }
}

impl<K: Ord, V> MeldableHeap<K, V> for HollowHeap<K, V> {
    type Handle = Item<K, V>;

    fn new() -> Self {
        HollowHeap {
            root: None,
            len: 0,
            stats: SweepStats::default(),
        }
    }

    fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn len(&self) -> usize {
        self.len
    }

    fn insert(&mut self, key: K, value: V) -> Item<K, V> {
        let cell = Rc::new(ItemCell::new(value));
        let node = Node::new_ref(key, Rc::clone(&cell), 0);

        self.root = Some(match self.root.take() {
            None => node,
            Some(root) => node::link(node, root),
        });
        self.len += 1;
        self.stats.nodes_created += 1;

        Item::from_cell(cell)
    }

    fn find_min(&self) -> Option<Item<K, V>> {
        let root = self.root.as_ref()?;
        let item = root.borrow().item().map(|cell| Item::from_cell(Rc::clone(cell)));
        item
    }

    fn delete_min(&mut self) -> Option<(K, Item<K, V>)> {
        let root = self.root.take()?;
        let Some((key, cell)) = root.borrow_mut().make_hollow() else {
            unreachable!("heap root is never hollow");
        };
        cell.retire();
        self.len -= 1;

        let (new_root, report) = consolidate::rebuild(root);
        log::trace!(
            "delete_min: reclaimed {} hollow nodes, {} ranked + {} unranked links, max rank {}",
            report.reclaimed,
            report.ranked_links,
            report.unranked_links,
            report.max_rank
        );
        self.stats.record(&report);
        self.root = new_root;

        Some((key, Item::from_cell(cell)))
    }

    fn merge(&mut self, mut other: Self) {
        self.stats.absorb(&other.stats);

        let Some(other_root) = other.root.take() else {
            return;
        };
        self.len += other.len;
        other.len = 0;

        self.root = Some(match self.root.take() {
            None => other_root,
            Some(root) => node::link(other_root, root),
        });
    }

    fn decrease_key(&mut self, handle: &Item<K, V>, new_key: K) -> Result<(), HeapError> {
        let node = handle.cell().owning_node().ok_or(HeapError::ItemNotLive)?;
        let root = self.root.as_ref().ok_or(HeapError::EmptyHeap)?;

        let in_order = node.borrow().key().map(|current| new_key <= *current);
        match in_order {
            Some(true) => {}
            Some(false) => return Err(HeapError::InvalidKeyOrder),
            None => return Err(HeapError::ItemNotLive),
        }

        if Rc::ptr_eq(&node, root) {
            node.borrow_mut().set_key(new_key);
            return Ok(());
        }

        let old_rank = node.borrow().rank;
        let Some((_, cell)) = node.borrow_mut().make_hollow() else {
            return Err(HeapError::ItemNotLive);
        };
        let fresh = Node::new_ref(new_key, cell, rank::demote(old_rank));
        self.stats.nodes_created += 1;

        let root = self.root.take().ok_or(HeapError::EmptyHeap)?;
        self.root = Some(node::link_above(node, fresh, root));
        Ok(())
    }

    fn key_of(&self, handle: &Item<K, V>) -> Result<K, HeapError>
    where
        K: Clone,
    {
        handle.key()
    }

    fn value_of<'a>(&self, handle: &'a Item<K, V>) -> &'a V {
        handle.value()
    }
}

/// A broken structural invariant found by [`HollowHeap::verify_structure`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureViolation {
    /// The root node holds no item
    HollowRoot,
    /// A full node's key is smaller than the key of a full ancestor
    HeapOrder,
    /// A full node holds an item that is not live or points at another node
    StaleItem,
    /// A full node carries a second parent
    SecondParentOnFullNode,
    /// A node whose second parent is `p` is not the last child of `p`
    SecondParentNotLast,
    /// A recorded second parent does not list the node as a child
    DanglingSecondParent,
    /// The number of full nodes differs from `len()`
    LengthMismatch {
        /// Full nodes reachable from the root
        counted: usize,
        /// Value reported by `len()`
        expected: usize,
    },
}

impl fmt::Display for StructureViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructureViolation::HollowRoot => write!(f, "root node is hollow"),
            StructureViolation::HeapOrder => write!(f, "heap order violated"),
            StructureViolation::StaleItem => {
                write!(f, "full node holds a removed or misdirected item")
            }
            StructureViolation::SecondParentOnFullNode => {
                write!(f, "full node has a second parent")
            }
            StructureViolation::SecondParentNotLast => {
                write!(f, "second-parent child is not the last child")
            }
            StructureViolation::DanglingSecondParent => {
                write!(f, "second parent does not hold the node")
            }
            StructureViolation::LengthMismatch { counted, expected } => {
                write!(f, "found {counted} full nodes, expected {expected}")
            }
        }
    }
}

impl std::error::Error for StructureViolation {}

type NodePtr<K, V> = *const RefCell<Node<K, V>>;

impl<K: Ord, V> HollowHeap<K, V> {
    /// Walks the whole dag and checks the structural invariants.
    ///
    /// Heap order is checked along every path: a full node's key must not be
    /// smaller than the nearest full ancestor's, even when hollow nodes sit in
    /// between. Runs in time proportional to the size of the dag; meant for
    /// tests and debugging.
    pub fn verify_structure(&self) -> Result<(), StructureViolation> {
        self.walk().inspect_err(|violation| {
            log::debug!("hollow heap structure check failed: {violation}");
        })
    }

    fn walk(&self) -> Result<(), StructureViolation> {
        let Some(root) = &self.root else {
            return match self.len {
                0 => Ok(()),
                expected => Err(StructureViolation::LengthMismatch {
                    counted: 0,
                    expected,
                }),
            };
        };
        if root.borrow().is_hollow() {
            return Err(StructureViolation::HollowRoot);
        }

        // Nodes reached through two parents are re-expanded only when the new
        // path brings a larger bound.
        let mut bounds: FxHashMap<NodePtr<K, V>, Option<NodeRef<K, V>>> = FxHashMap::default();
        let mut with_second_parent: FxHashSet<NodePtr<K, V>> = FxHashSet::default();
        let mut confirmed: FxHashSet<NodePtr<K, V>> = FxHashSet::default();
        let mut full = 0;

        let mut stack: Vec<(NodeRef<K, V>, Option<NodeRef<K, V>>)> = vec![(Rc::clone(root), None)];
        while let Some((node, bound)) = stack.pop() {
            let ptr = Rc::as_ptr(&node);
            let first_visit = match bounds.get(&ptr) {
                None => true,
                Some(seen) if !Self::raises(seen, &bound) => continue,
                Some(_) => false,
            };
            bounds.insert(ptr, bound.clone());

            let current = node.borrow();
            if let (Some(key), Some(bound)) = (current.key(), &bound) {
                if bound.borrow().key().is_some_and(|above| key < above) {
                    return Err(StructureViolation::HeapOrder);
                }
            }

            if first_visit {
                match &current.content {
                    Content::Full { item, .. } => {
                        full += 1;
                        if !item.is_live() || !item.is_held_by(&node) {
                            return Err(StructureViolation::StaleItem);
                        }
                        if current.second_parent.is_some() {
                            return Err(StructureViolation::SecondParentOnFullNode);
                        }
                    }
                    Content::Hollow => {
                        if current.second_parent.is_some() {
                            with_second_parent.insert(ptr);
                        }
                    }
                }
            }

            let child_bound = if current.is_hollow() {
                bound
            } else {
                Some(Rc::clone(&node))
            };
            let last = current.children.len().saturating_sub(1);
            for (index, child) in current.children.iter().enumerate() {
                let points_here = child
                    .borrow()
                    .second_parent
                    .as_ref()
                    .is_some_and(|parent| std::ptr::eq(parent.as_ptr(), ptr));
                if points_here {
                    // Stored oldest first, so the last child visited sits at index 0.
                    if index != 0 {
                        log::debug!("second-parent child at {index} of {}", last + 1);
                        return Err(StructureViolation::SecondParentNotLast);
                    }
                    confirmed.insert(Rc::as_ptr(child));
                }
                stack.push((Rc::clone(child), child_bound.clone()));
            }
        }

        if with_second_parent != confirmed {
            return Err(StructureViolation::DanglingSecondParent);
        }
        if full != self.len {
            return Err(StructureViolation::LengthMismatch {
                counted: full,
                expected: self.len,
            });
        }
        Ok(())
    }

    /// True if `candidate` is a strictly tighter lower bound than `seen`.
    fn raises(seen: &Option<NodeRef<K, V>>, candidate: &Option<NodeRef<K, V>>) -> bool {
        match (seen, candidate) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(seen), Some(candidate)) => match (seen.borrow().key(), candidate.borrow().key()) {
                (Some(seen), Some(candidate)) => candidate > seen,
                _ => false,
            },
        }
    }
}
