//! Item handles returned by [`HollowHeap::insert`](crate::HollowHeap)
//!
//! An item is shared between the caller, who holds an [`Item`], and the node
//! that currently stores it. The item keeps a non-owning reference back to
//! that node; decrease-key moves the item to a fresh node and repoints the
//! reference, so a handle always follows its item rather than a position in
//! the heap.

use crate::node::{NodeRef, WeakNodeRef};
use crate::traits::{Handle, HeapError};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Shared state behind an [`Item`] handle
pub(crate) struct ItemCell<K, V> {
    value: V,
    node: RefCell<WeakNodeRef<K, V>>,
    live: Cell<bool>,
}

impl<K, V> ItemCell<K, V> {
    pub(crate) fn new(value: V) -> Self {
        ItemCell {
            value,
            node: RefCell::new(Weak::new()),
            live: Cell::new(true),
        }
    }

    /// Records `node` as the node holding this item
    pub(crate) fn attach(&self, node: &NodeRef<K, V>) {
        *self.node.borrow_mut() = Rc::downgrade(node);
    }

    /// Marks the item removed and forgets its node
    pub(crate) fn retire(&self) {
        self.live.set(false);
        *self.node.borrow_mut() = Weak::new();
    }

    pub(crate) fn is_live(&self) -> bool {
        self.live.get()
    }

    /// The node holding this item, if the item is still live
    pub(crate) fn owning_node(&self) -> Option<NodeRef<K, V>> {
        if !self.is_live() {
            return None;
        }
        self.node.borrow().upgrade()
    }

    /// Returns true if `node` is the node this item points back to
    pub(crate) fn is_held_by(&self, node: &NodeRef<K, V>) -> bool {
        std::ptr::eq(self.node.borrow().as_ptr(), Rc::as_ptr(node))
    }
}

/// Handle to an element of a [`HollowHeap`](crate::HollowHeap)
///
/// The handle stays usable after its element is removed: [`Item::value`]
/// still returns the payload, [`Item::is_live`] reports `false` and
/// [`Item::key`] fails with [`HeapError::ItemNotLive`].
///
/// # Example
///
/// ```rust
/// use hollow_heap::{HeapError, HollowHeap, MeldableHeap};
///
/// let mut heap = HollowHeap::new();
/// let item = heap.insert(3, "three");
/// assert_eq!(item.key(), Ok(3));
///
/// heap.delete_min();
/// assert!(!item.is_live());
/// assert_eq!(item.value(), &"three");
/// assert_eq!(item.key(), Err(HeapError::ItemNotLive));
/// ```
pub struct Item<K, V> {
    cell: Rc<ItemCell<K, V>>,
}

impl<K, V> Item<K, V> {
    pub(crate) fn from_cell(cell: Rc<ItemCell<K, V>>) -> Self {
        Item { cell }
    }

    pub(crate) fn cell(&self) -> &Rc<ItemCell<K, V>> {
        &self.cell
    }

    /// The payload stored with this item
    pub fn value(&self) -> &V {
        &self.cell.value
    }

    /// Returns true until the item is removed by `delete_min`
    pub fn is_live(&self) -> bool {
        self.cell.is_live()
    }

    /// The item's current key
    ///
    /// # Errors
    /// Returns [`HeapError::ItemNotLive`] if the item was removed.
    pub fn key(&self) -> Result<K, HeapError>
    where
        K: Clone,
    {
        let node = self.cell.owning_node().ok_or(HeapError::ItemNotLive)?;
        let key = node.borrow().key().cloned();
        key.ok_or(HeapError::ItemNotLive)
    }
}

impl<K, V> Clone for Item<K, V> {
    fn clone(&self) -> Self {
        Item {
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<K, V> PartialEq for Item<K, V> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }
}

impl<K, V> Eq for Item<K, V> {}

impl<K, V> fmt::Debug for Item<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("cell", &Rc::as_ptr(&self.cell))
            .field("live", &self.is_live())
            .finish()
    }
}

impl<K, V> Handle for Item<K, V> {}
