//! Dag nodes and the linking primitives
//!
//! A node is either *full*, holding a key and an item, or *hollow*, emptied by
//! decrease-key and waiting for delete-min to reclaim it. Parents own their
//! children through `Rc`; a hollow node may be owned by two parents, its
//! original one and the node recorded in `second_parent`.
//!
//! Child lists are stored oldest first. Consolidation walks them newest
//! first, which makes the child attached by [`link_above`] (always the first
//! child of a fresh node) the last one visited.

use crate::item::ItemCell;
use crate::rank::{self, Rank};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Type alias for a reference-counted node pointer
pub(crate) type NodeRef<K, V> = Rc<RefCell<Node<K, V>>>;

/// Non-owning node pointer, used for item back-references and second parents
pub(crate) type WeakNodeRef<K, V> = Weak<RefCell<Node<K, V>>>;

pub(crate) enum Content<K, V> {
    Full { key: K, item: Rc<ItemCell<K, V>> },
    Hollow,
}

pub(crate) struct Node<K, V> {
    pub(crate) content: Content<K, V>,
    /// Children, oldest first
    pub(crate) children: SmallVec<[NodeRef<K, V>; 2]>,
    /// Set only on hollow nodes, by `link_above`
    pub(crate) second_parent: Option<WeakNodeRef<K, V>>,
    pub(crate) rank: Rank,
}

impl<K, V> Node<K, V> {
    /// Allocates a full node for `item` and points the item at it.
    pub(crate) fn new_ref(key: K, item: Rc<ItemCell<K, V>>, rank: Rank) -> NodeRef<K, V> {
        let node = Rc::new(RefCell::new(Node {
            content: Content::Full {
                key,
                item: Rc::clone(&item),
            },
            children: SmallVec::new(),
            second_parent: None,
            rank,
        }));
        item.attach(&node);
        node
    }

    pub(crate) fn is_hollow(&self) -> bool {
        matches!(self.content, Content::Hollow)
    }

    pub(crate) fn key(&self) -> Option<&K> {
        match &self.content {
            Content::Full { key, .. } => Some(key),
            Content::Hollow => None,
        }
    }

    pub(crate) fn item(&self) -> Option<&Rc<ItemCell<K, V>>> {
        match &self.content {
            Content::Full { item, .. } => Some(item),
            Content::Hollow => None,
        }
    }

    /// Overwrites the key of a full node. Hollow nodes are left untouched.
    pub(crate) fn set_key(&mut self, new_key: K) {
        if let Content::Full { key, .. } = &mut self.content {
            *key = new_key;
        }
    }

    /// Empties the node, returning what it held
    pub(crate) fn make_hollow(&mut self) -> Option<(K, Rc<ItemCell<K, V>>)> {
        match std::mem::replace(&mut self.content, Content::Hollow) {
            Content::Full { key, item } => Some((key, item)),
            Content::Hollow => None,
        }
    }
}

impl<K: Ord, V> Node<K, V> {
    /// True if `self` must become the parent of `other`.
    fn beats(&self, other: &Self) -> bool {
        match (self.key(), other.key()) {
            (Some(mine), Some(theirs)) => mine < theirs,
            _ => unreachable!("only full nodes are linked"),
        }
    }
}

fn add_child<K, V>(parent: &NodeRef<K, V>, child: NodeRef<K, V>) {
    parent.borrow_mut().children.push(child);
}

/// Links two full roots; the one with the larger key becomes a child of the
/// other. `u` wins only with a strictly smaller key.
pub(crate) fn link<K: Ord, V>(u: NodeRef<K, V>, v: NodeRef<K, V>) -> NodeRef<K, V> {
    let u_wins = u.borrow().beats(&v.borrow());
    if u_wins {
        add_child(&u, v);
        u
    } else {
        add_child(&v, u);
        v
    }
}

/// Links two full roots of equal rank, bumping the winner's rank.
pub(crate) fn ranked_link<K: Ord, V>(x: NodeRef<K, V>, y: NodeRef<K, V>) -> NodeRef<K, V> {
    let rank = {
        let (x_node, y_node) = (x.borrow(), y.borrow());
        debug_assert_eq!(x_node.rank, y_node.rank, "ranked link of unequal ranks");
        x_node.rank.max(y_node.rank)
    };
    let winner = link(x, y);
    winner.borrow_mut().rank = rank::checked_increment(rank);
    winner
}

/// Hangs the hollowed node `w` under its replacement `u`, then melds `u`
/// with the root `v`.
///
/// `u` must be fresh: `w` becomes its first child and therefore stays the
/// last child visited by consolidation, which is where the second-parent
/// discharge expects it.
pub(crate) fn link_above<K: Ord, V>(
    w: NodeRef<K, V>,
    u: NodeRef<K, V>,
    v: NodeRef<K, V>,
) -> NodeRef<K, V> {
    {
        let mut hollow = w.borrow_mut();
        debug_assert!(hollow.is_hollow(), "link_above on a full node");
        debug_assert!(hollow.second_parent.is_none(), "node already has a second parent");
        hollow.second_parent = Some(Rc::downgrade(&u));
    }
    debug_assert!(u.borrow().children.is_empty(), "link_above needs a fresh node");
    add_child(&u, w);
    link(u, v)
}
