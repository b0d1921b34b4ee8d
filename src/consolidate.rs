//! Delete-min reconstruction
//!
//! After the root's item is removed, the old root is just another hollow node.
//! The sweep visits hollow nodes from a worklist, starting with the old root,
//! and sorts the children of each into three groups:
//!
//! - full children go into a rank-indexed table, where equal ranks are linked
//!   binomial-style until every rank is held by at most one node;
//! - hollow children with no second parent are queued for a visit of their own;
//! - hollow children with a second parent are reachable from two places. The
//!   first visit only clears the link; whichever parent visits second finds it
//!   cleared and queues the child. If the visiting node *is* the second parent,
//!   the child is the last entry of its list.
//!
//! A visited hollow node has had its children moved out and is dropped as soon
//! as its visit ends. When the worklist is empty the table slots are linked
//! into a single root.

use crate::node::{self, NodeRef};
use crate::rank::Rank;
use std::rc::Rc;

/// Cumulative counters describing the work done by a heap
///
/// Every node is reclaimed at most once, so `hollow_reclaimed` can never exceed
/// `nodes_created`; the total sweep work of a heap is bounded by the nodes its
/// inserts and decrease-keys created, which is what makes delete-min
/// O(log n) amortized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Nodes allocated by `insert` and by non-root `decrease_key`
    pub nodes_created: usize,
    /// Hollow nodes visited and released by `delete_min`, extracted roots included
    pub hollow_reclaimed: usize,
    /// Equal-rank links performed while filling the rank table
    pub ranked_links: usize,
    /// Links performed while folding the rank table into one root
    pub unranked_links: usize,
    /// Number of `delete_min` calls that removed an item
    pub delete_mins: usize,
    /// Largest rank any node reached during consolidation
    pub max_rank: Rank,
}

impl SweepStats {
    pub(crate) fn record(&mut self, report: &SweepReport) {
        self.hollow_reclaimed += report.reclaimed;
        self.ranked_links += report.ranked_links;
        self.unranked_links += report.unranked_links;
        self.delete_mins += 1;
        self.max_rank = self.max_rank.max(report.max_rank);
    }

    /// Folds in the counters of a heap that was merged into this one
    pub(crate) fn absorb(&mut self, other: &SweepStats) {
        self.nodes_created += other.nodes_created;
        self.hollow_reclaimed += other.hollow_reclaimed;
        self.ranked_links += other.ranked_links;
        self.unranked_links += other.unranked_links;
        self.delete_mins += other.delete_mins;
        self.max_rank = self.max_rank.max(other.max_rank);
    }
}

/// What a single sweep did
#[derive(Debug, Default)]
pub(crate) struct SweepReport {
    pub(crate) reclaimed: usize,
    pub(crate) ranked_links: usize,
    pub(crate) unranked_links: usize,
    pub(crate) max_rank: Rank,
}

/// Full nodes found by the sweep, at most one per rank
struct RankTable<K, V> {
    slots: Vec<Option<NodeRef<K, V>>>,
}

impl<K: Ord, V> RankTable<K, V> {
    fn new() -> Self {
        RankTable { slots: Vec::new() }
    }

    fn insert(&mut self, mut node: NodeRef<K, V>, report: &mut SweepReport) {
        loop {
            let rank = node.borrow().rank;
            report.max_rank = report.max_rank.max(rank);
            let slot = usize::from(rank);
            if slot >= self.slots.len() {
                self.slots.resize_with(slot + 1, || None);
            }
            match self.slots[slot].take() {
                None => {
                    self.slots[slot] = Some(node);
                    return;
                }
                Some(other) => {
                    node = node::ranked_link(node, other);
                    report.ranked_links += 1;
                }
            }
        }
    }

    fn fold(self, report: &mut SweepReport) -> Option<NodeRef<K, V>> {
        self.slots.into_iter().flatten().reduce(|root, node| {
            report.unranked_links += 1;
            node::link(node, root)
        })
    }
}

enum Verdict {
    Full,
    Queue,
    Discharged { by_origin: bool },
}

/// Rebuilds a heap from the hollowed-out former root.
///
/// Returns the new root (`None` if no full node remains) and what the sweep
/// did.
pub(crate) fn rebuild<K: Ord, V>(old_root: NodeRef<K, V>) -> (Option<NodeRef<K, V>>, SweepReport) {
    debug_assert!(old_root.borrow().is_hollow(), "rebuild from a full root");

    let mut report = SweepReport::default();
    let mut table = RankTable::new();
    let mut worklist = vec![old_root];

    while let Some(origin) = worklist.pop() {
        triage(&origin, &mut worklist, &mut table, &mut report);
        report.reclaimed += 1;
    }

    let root = table.fold(&mut report);
    (root, report)
}

/// Sorts the children of the hollow node `origin`.
fn triage<K: Ord, V>(
    origin: &NodeRef<K, V>,
    worklist: &mut Vec<NodeRef<K, V>>,
    table: &mut RankTable<K, V>,
    report: &mut SweepReport,
) {
    let children = std::mem::take(&mut origin.borrow_mut().children);
    let count = children.len();

    for (visited, child) in children.into_iter().rev().enumerate() {
        let verdict = {
            let mut node = child.borrow_mut();
            if !node.is_hollow() {
                Verdict::Full
            } else {
                match node.second_parent.take() {
                    None => Verdict::Queue,
                    Some(parent) => Verdict::Discharged {
                        by_origin: std::ptr::eq(parent.as_ptr(), Rc::as_ptr(origin)),
                    },
                }
            }
        };

        match verdict {
            Verdict::Full => table.insert(child, report),
            Verdict::Queue => worklist.push(child),
            Verdict::Discharged { by_origin } => {
                debug_assert!(
                    !by_origin || visited + 1 == count,
                    "a child whose second parent is the visited node must be its last child"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemCell;
    use crate::node::Node;

    fn full(key: i32, rank: Rank) -> NodeRef<i32, ()> {
        Node::new_ref(key, Rc::new(ItemCell::new(())), rank)
    }

    fn hollow_root_with(children: Vec<NodeRef<i32, ()>>) -> NodeRef<i32, ()> {
        let root = full(i32::MIN, 0);
        root.borrow_mut().make_hollow();
        root.borrow_mut().children.extend(children);
        root
    }

    fn key_of(node: &NodeRef<i32, ()>) -> i32 {
        *node.borrow().key().unwrap()
    }

    #[test]
    fn test_rebuild_without_children_is_empty() {
        let (root, report) = rebuild(hollow_root_with(vec![]));
        assert!(root.is_none());
        assert_eq!(report.reclaimed, 1);
    }

    #[test]
    fn test_equal_ranks_are_linked() {
        let children = (0..4).map(|k| full(k, 0)).collect();
        let (root, report) = rebuild(hollow_root_with(children));

        let root = root.unwrap();
        assert_eq!(key_of(&root), 0);
        assert_eq!(root.borrow().rank, 2);
        assert_eq!(report.ranked_links, 3);
        assert_eq!(report.unranked_links, 0);
        assert_eq!(report.max_rank, 2);
    }

    #[test]
    fn test_distinct_ranks_are_folded() {
        let children = vec![full(7, 0), full(3, 1), full(5, 2)];
        let (root, report) = rebuild(hollow_root_with(children));

        assert_eq!(key_of(&root.unwrap()), 3);
        assert_eq!(report.ranked_links, 0);
        assert_eq!(report.unranked_links, 2);
    }

    #[test]
    fn test_hollow_children_are_visited() {
        let inner = hollow_root_with(vec![full(4, 0), full(2, 0)]);
        let (root, report) = rebuild(hollow_root_with(vec![inner, full(9, 3)]));

        assert_eq!(key_of(&root.unwrap()), 2);
        assert_eq!(report.reclaimed, 2);
    }

    #[test]
    fn test_second_parent_child_waits_for_both_visits() {
        // `shared` hangs below both `first` and `second`; it is queued only by
        // whichever of the two is visited last.
        let shared = hollow_root_with(vec![full(6, 0)]);
        let second = hollow_root_with(vec![shared.clone()]);
        let first = hollow_root_with(vec![shared.clone()]);
        shared.borrow_mut().second_parent = Some(Rc::downgrade(&second));
        drop(shared);

        let (root, report) = rebuild(hollow_root_with(vec![first, second]));
        assert_eq!(key_of(&root.unwrap()), 6);
        // old root, first, second and shared
        assert_eq!(report.reclaimed, 4);
    }

    #[test]
    fn test_stats_absorb() {
        let mut a = SweepStats {
            nodes_created: 3,
            max_rank: 1,
            ..SweepStats::default()
        };
        let b = SweepStats {
            nodes_created: 2,
            hollow_reclaimed: 1,
            max_rank: 4,
            ..SweepStats::default()
        };
        a.absorb(&b);
        assert_eq!(a.nodes_created, 5);
        assert_eq!(a.hollow_reclaimed, 1);
        assert_eq!(a.max_rank, 4);
    }
}
