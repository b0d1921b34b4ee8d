//! Dijkstra's and A* search over implicit graphs
//!
//! The graph is described by its nodes: a [`SearchNode`] lists its successors
//! with edge costs and knows whether it is a goal. The searches keep the open
//! set in a [`MeldableHeap`] and lower a node's priority with `decrease_key`
//! when a shorter route to it shows up, instead of pushing duplicates.
//!
//! Only lightweight indices are stored in the heap. A fast hash map (FxHash)
//! maps node states to their index, and the per-node metadata (best cost,
//! heap handle, predecessor) lives in a vector indexed the same way.
//!
//! Dijkstra is A* with a zero heuristic, so both share one implementation.
//!
//! # Example
//!
//! ```rust
//! use hollow_heap::pathfinding::{dijkstra, SearchNode};
//! use hollow_heap::HollowHeap;
//!
//! #[derive(Clone, PartialEq, Eq, Hash)]
//! struct GridPos { x: i32, y: i32, goal_x: i32, goal_y: i32 }
//!
//! impl SearchNode for GridPos {
//!     type Cost = u32;
//!
//!     fn successors(&self) -> Vec<(Self, Self::Cost)> {
//!         [(1, 0), (-1, 0), (0, 1), (0, -1)]
//!             .iter()
//!             .map(|(dx, dy)| (GridPos { x: self.x + dx, y: self.y + dy, ..self.clone() }, 1))
//!             .collect()
//!     }
//!
//!     fn is_goal(&self) -> bool {
//!         self.x == self.goal_x && self.y == self.goal_y
//!     }
//! }
//!
//! let start = GridPos { x: 0, y: 0, goal_x: 2, goal_y: 2 };
//! let (path, cost) = dijkstra::<_, HollowHeap<_, _>>(&start).unwrap();
//! assert_eq!(cost, 4);
//! assert_eq!(path.len(), 5);
//! ```

use crate::traits::MeldableHeap;
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::hash::Hash;
use std::ops::Add;

/// Trait for types that can be used as costs in pathfinding algorithms.
///
/// `Default` must be the zero cost.
pub trait Cost: Ord + Copy + Add<Output = Self> + Default {}

impl<T> Cost for T where T: Ord + Copy + Add<Output = Self> + Default {}

/// A node in a search graph.
///
/// The node carries all the context needed to produce its successors and to
/// decide whether it is a goal.
pub trait SearchNode: Clone + Eq + Hash {
    /// The cost type for edge weights
    type Cost: Cost;

    /// Returns every neighbor of this node with the cost of the edge to it.
    fn successors(&self) -> Vec<(Self, Self::Cost)>;

    /// Returns true if this node is a goal state.
    fn is_goal(&self) -> bool;
}

/// A node that can estimate its remaining cost for A* search.
///
/// The heuristic must never overestimate the true remaining cost, or A* may
/// return a suboptimal path.
pub trait AStarNode: SearchNode {
    /// Estimated cost from this node to the nearest goal.
    fn heuristic(&self) -> Self::Cost;
}

/// Heap key for the open set: ordered by f-score only.
#[derive(Debug, Clone, Copy)]
pub struct PriorityCost<C> {
    /// g + h (h = 0 for Dijkstra)
    pub f_score: C,
    /// Cost from the start
    pub g_score: C,
}

impl<C: Ord> PartialEq for PriorityCost<C> {
    fn eq(&self, other: &Self) -> bool {
        self.f_score == other.f_score
    }
}

impl<C: Ord> Eq for PriorityCost<C> {}

impl<C: Ord> PartialOrd for PriorityCost<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C: Ord> Ord for PriorityCost<C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_score.cmp(&other.f_score)
    }
}

/// Index of a discovered node; this is what the heap stores.
pub type NodeIndex = usize;

struct Entry<N: SearchNode, H> {
    node: N,
    g_score: N::Cost,
    /// Heap handle while the node is in the open set
    handle: Option<H>,
    came_from: Option<NodeIndex>,
    closed: bool,
}

/// Open/closed bookkeeping shared by all searches.
struct Frontier<N: SearchNode, H: MeldableHeap<PriorityCost<N::Cost>, NodeIndex>> {
    heap: H,
    entries: Vec<Entry<N, H::Handle>>,
    index_of: FxHashMap<N, NodeIndex>,
}

impl<N, H> Frontier<N, H>
where
    N: SearchNode,
    H: MeldableHeap<PriorityCost<N::Cost>, NodeIndex>,
{
    fn new() -> Self {
        Frontier {
            heap: H::new(),
            entries: Vec::new(),
            index_of: FxHashMap::default(),
        }
    }

    /// Records `g_score` for `node` if it improves on what is known, and
    /// inserts or lowers the node in the open set accordingly.
    fn relax(&mut self, node: N, g_score: N::Cost, h_score: N::Cost, came_from: Option<NodeIndex>) {
        let priority = PriorityCost {
            f_score: g_score + h_score,
            g_score,
        };

        let index = match self.index_of.get(&node) {
            Some(&index) => index,
            None => {
                let index = self.entries.len();
                self.index_of.insert(node.clone(), index);
                let handle = self.heap.insert(priority, index);
                self.entries.push(Entry {
                    node,
                    g_score,
                    handle: Some(handle),
                    came_from,
                    closed: false,
                });
                return;
            }
        };

        let entry = &mut self.entries[index];
        if entry.closed || g_score >= entry.g_score {
            return;
        }
        entry.g_score = g_score;
        entry.came_from = came_from;
        if let Some(handle) = &entry.handle {
            // The heuristic is fixed per node, so a lower g always lowers f.
            let lowered = self.heap.decrease_key(handle, priority);
            debug_assert!(lowered.is_ok(), "open-set key did not decrease");
        }
    }

    /// Pops the open node with the lowest f-score and closes it.
    fn close_next(&mut self) -> Option<(NodeIndex, N::Cost)> {
        let (priority, handle) = self.heap.delete_min()?;
        let index = *self.heap.value_of(&handle);
        let entry = &mut self.entries[index];
        entry.closed = true;
        entry.handle = None;
        Some((index, priority.g_score))
    }

    fn path_to(&self, mut current: NodeIndex) -> Vec<N> {
        let mut path = vec![self.entries[current].node.clone()];
        while let Some(previous) = self.entries[current].came_from {
            path.push(self.entries[previous].node.clone());
            current = previous;
        }
        path.reverse();
        path
    }
}

/// Runs Dijkstra's algorithm from `start` until a node with `is_goal()` is
/// closed.
///
/// Returns the path (start and goal inclusive) and its cost, or `None` if no
/// goal is reachable.
///
/// # Type Parameters
/// - `N`: the node type
/// - `H`: the heap used for the open set, e.g. `HollowHeap<_, _>`
pub fn dijkstra<N, H>(start: &N) -> Option<(Vec<N>, N::Cost)>
where
    N: SearchNode,
    H: MeldableHeap<PriorityCost<N::Cost>, NodeIndex>,
{
    search::<N, H>(start, |_| N::Cost::default())
}

/// Runs A* search from `start`, guided by the node's heuristic.
///
/// With an admissible heuristic the returned path is a shortest one.
pub fn astar<N, H>(start: &N) -> Option<(Vec<N>, N::Cost)>
where
    N: AStarNode,
    H: MeldableHeap<PriorityCost<N::Cost>, NodeIndex>,
{
    search::<N, H>(start, |node| node.heuristic())
}

fn search<N, H>(start: &N, heuristic: impl Fn(&N) -> N::Cost) -> Option<(Vec<N>, N::Cost)>
where
    N: SearchNode,
    H: MeldableHeap<PriorityCost<N::Cost>, NodeIndex>,
{
    let mut frontier: Frontier<N, H> = Frontier::new();
    frontier.relax(start.clone(), N::Cost::default(), heuristic(start), None);

    while let Some((index, g_score)) = frontier.close_next() {
        let current = frontier.entries[index].node.clone();
        if current.is_goal() {
            return Some((frontier.path_to(index), g_score));
        }

        for (neighbor, edge_cost) in current.successors() {
            let h_score = heuristic(&neighbor);
            frontier.relax(neighbor, g_score + edge_cost, h_score, Some(index));
        }
    }

    None
}

/// Returns every node whose shortest distance from `start` is at most
/// `budget`, with that distance, in order of increasing distance.
///
/// `is_goal()` is ignored.
pub fn reachable_within<N, H>(start: &N, budget: N::Cost) -> Vec<(N, N::Cost)>
where
    N: SearchNode,
    H: MeldableHeap<PriorityCost<N::Cost>, NodeIndex>,
{
    let zero = N::Cost::default();
    let mut frontier: Frontier<N, H> = Frontier::new();
    let mut reached = Vec::new();
    if budget < zero {
        return reached;
    }
    frontier.relax(start.clone(), zero, zero, None);

    while let Some((index, g_score)) = frontier.close_next() {
        let current = frontier.entries[index].node.clone();
        for (neighbor, edge_cost) in current.successors() {
            let tentative = g_score + edge_cost;
            if tentative <= budget {
                frontier.relax(neighbor, tentative, zero, Some(index));
            }
        }
        reached.push((current, g_score));
    }

    reached
}
