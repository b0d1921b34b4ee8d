//! Explicit weighted graphs and the classic algorithms that lean on
//! decrease-key: single-source shortest paths (Dijkstra) and minimum spanning
//! trees (Prim).
//!
//! Vertices live in a [`SlotMap`] arena, so a [`VertexKey`] stays valid until
//! its vertex is removed and a stale key is detected rather than aliased to a
//! newer vertex. Per-vertex search state (distances, heap handles) is kept in
//! [`SecondaryMap`]s keyed the same way.
//!
//! Requires the `graph` feature (enabled by default).
//!
//! # Example
//!
//! ```rust
//! use hollow_heap::graph::{shortest_paths, Graph};
//!
//! let mut graph = Graph::new();
//! let a = graph.add_vertex();
//! let b = graph.add_vertex();
//! let c = graph.add_vertex();
//! graph.add_edge(a, b, 4u32).unwrap();
//! graph.add_edge(a, c, 1).unwrap();
//! graph.add_edge(c, b, 2).unwrap();
//!
//! let paths = shortest_paths(&graph, a);
//! assert_eq!(paths.distance(b), Some(3));
//! assert_eq!(paths.path_to(b), Some(vec![a, c, b]));
//! ```

use crate::hollow::HollowHeap;
use crate::item::Item;
use crate::pathfinding::Cost;
use crate::traits::MeldableHeap;
use slotmap::{new_key_type, SecondaryMap, SlotMap};
use std::fmt;

new_key_type! {
    /// Key identifying a vertex of a [`Graph`]
    pub struct VertexKey;
}

/// Error type for graph construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphError {
    /// The vertex key does not belong to the graph (never did, or was removed)
    UnknownVertex(VertexKey),
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::UnknownVertex(key) => write!(f, "unknown vertex {key:?}"),
        }
    }
}

impl std::error::Error for GraphError {}

/// A directed edge as stored in its source vertex's adjacency list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge<W> {
    /// Target vertex
    pub to: VertexKey,
    /// Edge weight
    pub weight: W,
}

/// Directed weighted graph with adjacency lists
#[derive(Debug, Clone)]
pub struct Graph<W> {
    vertices: SlotMap<VertexKey, Vec<Edge<W>>>,
    edge_count: usize,
}

impl<W> Default for Graph<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> Graph<W> {
    /// Creates an empty graph
    pub fn new() -> Self {
        Graph {
            vertices: SlotMap::with_key(),
            edge_count: 0,
        }
    }

    /// Adds an isolated vertex
    pub fn add_vertex(&mut self) -> VertexKey {
        self.vertices.insert(Vec::new())
    }

    /// Adds a directed edge `from -> to`
    pub fn add_edge(&mut self, from: VertexKey, to: VertexKey, weight: W) -> Result<(), GraphError> {
        if !self.vertices.contains_key(to) {
            return Err(GraphError::UnknownVertex(to));
        }
        let edges = self
            .vertices
            .get_mut(from)
            .ok_or(GraphError::UnknownVertex(from))?;
        edges.push(Edge { to, weight });
        self.edge_count += 1;
        Ok(())
    }

    /// Adds the edges `a -> b` and `b -> a` with the same weight
    pub fn add_undirected_edge(&mut self, a: VertexKey, b: VertexKey, weight: W) -> Result<(), GraphError>
    where
        W: Clone,
    {
        if !self.vertices.contains_key(b) {
            return Err(GraphError::UnknownVertex(b));
        }
        self.add_edge(a, b, weight.clone())?;
        self.add_edge(b, a, weight)
    }

    /// Removes a vertex along with every edge leaving or entering it.
    ///
    /// Returns false if the vertex was not in the graph. O(V + E).
    pub fn remove_vertex(&mut self, vertex: VertexKey) -> bool {
        let Some(outgoing) = self.vertices.remove(vertex) else {
            return false;
        };
        self.edge_count -= outgoing.len();
        for edges in self.vertices.values_mut() {
            let before = edges.len();
            edges.retain(|edge| edge.to != vertex);
            self.edge_count -= before - edges.len();
        }
        true
    }

    /// Returns true if `vertex` is in the graph
    pub fn contains_vertex(&self, vertex: VertexKey) -> bool {
        self.vertices.contains_key(vertex)
    }

    /// Outgoing edges of `vertex`; empty for an unknown vertex
    pub fn neighbors(&self, vertex: VertexKey) -> impl Iterator<Item = &Edge<W>> + '_ {
        self.vertices.get(vertex).into_iter().flatten()
    }

    /// All vertex keys
    pub fn vertices(&self) -> impl Iterator<Item = VertexKey> + '_ {
        self.vertices.keys()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }
}

/// Result of [`shortest_paths`]
#[derive(Debug, Clone)]
pub struct ShortestPaths<W> {
    source: VertexKey,
    distance: SecondaryMap<VertexKey, W>,
    previous: SecondaryMap<VertexKey, VertexKey>,
}

impl<W: Copy> ShortestPaths<W> {
    pub fn source(&self) -> VertexKey {
        self.source
    }

    /// Shortest distance from the source, `None` if unreachable
    pub fn distance(&self, vertex: VertexKey) -> Option<W> {
        self.distance.get(vertex).copied()
    }

    /// Vertices on a shortest path from the source to `vertex`, both included
    pub fn path_to(&self, vertex: VertexKey) -> Option<Vec<VertexKey>> {
        if !self.distance.contains_key(vertex) {
            return None;
        }
        let mut path = vec![vertex];
        let mut current = vertex;
        while let Some(&previous) = self.previous.get(current) {
            path.push(previous);
            current = previous;
        }
        path.reverse();
        Some(path)
    }

    /// Number of vertices reachable from the source, the source included
    pub fn reached(&self) -> usize {
        self.distance.len()
    }
}

/// Dijkstra's algorithm from `source` over non-negative edge weights.
///
/// An unknown `source` yields a result in which nothing is reachable.
pub fn shortest_paths<W: Cost>(graph: &Graph<W>, source: VertexKey) -> ShortestPaths<W> {
    let mut result = ShortestPaths {
        source,
        distance: SecondaryMap::new(),
        previous: SecondaryMap::new(),
    };
    if !graph.contains_vertex(source) {
        return result;
    }

    let mut heap: HollowHeap<W, VertexKey> = HollowHeap::new();
    let mut handles: SecondaryMap<VertexKey, Item<W, VertexKey>> = SecondaryMap::new();
    let mut settled: SecondaryMap<VertexKey, ()> = SecondaryMap::new();

    result.distance.insert(source, W::default());
    handles.insert(source, heap.insert(W::default(), source));

    while let Some((distance, item)) = heap.delete_min() {
        let vertex = *item.value();
        settled.insert(vertex, ());

        for edge in graph.neighbors(vertex) {
            if settled.contains_key(edge.to) {
                continue;
            }
            let tentative = distance + edge.weight;
            match result.distance.get(edge.to).copied() {
                Some(known) if tentative >= known => continue,
                Some(_) => {
                    if let Some(handle) = handles.get(edge.to) {
                        let lowered = heap.decrease_key(handle, tentative);
                        debug_assert!(lowered.is_ok(), "tentative distance did not decrease");
                    }
                }
                None => {
                    handles.insert(edge.to, heap.insert(tentative, edge.to));
                }
            }
            result.distance.insert(edge.to, tentative);
            result.previous.insert(edge.to, vertex);
        }
    }

    log::debug!(
        "shortest_paths: reached {} of {} vertices ({:?})",
        result.reached(),
        graph.vertex_count(),
        heap.stats()
    );
    result
}

/// Result of [`minimum_spanning_tree`]
#[derive(Debug, Clone)]
pub struct SpanningTree<W> {
    root: VertexKey,
    parent: SecondaryMap<VertexKey, (VertexKey, W)>,
    total_weight: W,
    spans_root: bool,
}

impl<W: Copy> SpanningTree<W> {
    pub fn root(&self) -> VertexKey {
        self.root
    }

    /// Sum of the tree's edge weights
    pub fn total_weight(&self) -> W {
        self.total_weight
    }

    /// The tree edge connecting `vertex` towards the root, with its weight
    pub fn parent_edge(&self, vertex: VertexKey) -> Option<(VertexKey, W)> {
        self.parent.get(vertex).copied()
    }

    /// Tree edges as `(vertex, parent, weight)`
    pub fn edges(&self) -> impl Iterator<Item = (VertexKey, VertexKey, W)> + '_ {
        self.parent
            .iter()
            .map(|(vertex, &(parent, weight))| (vertex, parent, weight))
    }

    /// Returns true if `vertex` is spanned by the tree
    pub fn contains(&self, vertex: VertexKey) -> bool {
        (self.spans_root && vertex == self.root) || self.parent.contains_key(vertex)
    }

    /// Number of vertices spanned, the root included
    pub fn vertex_count(&self) -> usize {
        self.parent.len() + usize::from(self.spans_root)
    }
}

/// Prim's algorithm: a minimum spanning tree of the component containing
/// `root`.
///
/// Edges are followed in their stored direction, so undirected graphs should
/// be built with [`Graph::add_undirected_edge`]. An unknown `root` yields an
/// empty tree.
pub fn minimum_spanning_tree<W: Cost>(graph: &Graph<W>, root: VertexKey) -> SpanningTree<W> {
    let mut tree = SpanningTree {
        root,
        parent: SecondaryMap::new(),
        total_weight: W::default(),
        spans_root: graph.contains_vertex(root),
    };
    if !tree.spans_root {
        return tree;
    }

    let mut heap: HollowHeap<W, VertexKey> = HollowHeap::new();
    let mut handles: SecondaryMap<VertexKey, Item<W, VertexKey>> = SecondaryMap::new();
    // Lightest known edge from the tree to each fringe vertex
    let mut fringe: SecondaryMap<VertexKey, (VertexKey, W)> = SecondaryMap::new();
    let mut in_tree: SecondaryMap<VertexKey, ()> = SecondaryMap::new();

    let mut next = Some(root);
    while let Some(vertex) = next {
        in_tree.insert(vertex, ());

        for edge in graph.neighbors(vertex) {
            if in_tree.contains_key(edge.to) {
                continue;
            }
            match fringe.get(edge.to).copied() {
                Some((_, lightest)) if edge.weight >= lightest => continue,
                Some(_) => {
                    if let Some(handle) = handles.get(edge.to) {
                        let lowered = heap.decrease_key(handle, edge.weight);
                        debug_assert!(lowered.is_ok(), "fringe weight did not decrease");
                    }
                }
                None => {
                    handles.insert(edge.to, heap.insert(edge.weight, edge.to));
                }
            }
            fringe.insert(edge.to, (vertex, edge.weight));
        }

        next = heap.delete_min().map(|(weight, item)| {
            let joined = *item.value();
            if let Some(&(parent, _)) = fringe.get(joined) {
                tree.parent.insert(joined, (parent, weight));
                tree.total_weight = tree.total_weight + weight;
            }
            joined
        });
    }

    tree
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_edge_rejects_unknown_vertex() {
        let mut graph: Graph<u32> = Graph::new();
        let a = graph.add_vertex();
        let b = graph.add_vertex();
        assert!(graph.remove_vertex(b));

        assert_eq!(graph.add_edge(a, b, 1), Err(GraphError::UnknownVertex(b)));
        assert_eq!(graph.add_edge(b, a, 1), Err(GraphError::UnknownVertex(b)));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_remove_vertex_drops_incident_edges() {
        let mut graph: Graph<u32> = Graph::new();
        let a = graph.add_vertex();
        let b = graph.add_vertex();
        let c = graph.add_vertex();
        graph.add_undirected_edge(a, b, 1).unwrap();
        graph.add_edge(c, b, 2).unwrap();
        graph.add_edge(a, c, 3).unwrap();
        assert_eq!(graph.edge_count(), 4);

        assert!(graph.remove_vertex(b));
        assert!(!graph.remove_vertex(b));
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(graph.neighbors(b).count(), 0);
    }

    #[test]
    fn test_shortest_paths_lowers_distances() {
        let mut graph = Graph::new();
        let v: Vec<_> = (0..5).map(|_| graph.add_vertex()).collect();
        graph.add_edge(v[0], v[1], 10u64).unwrap();
        graph.add_edge(v[0], v[2], 3).unwrap();
        graph.add_edge(v[2], v[1], 4).unwrap();
        graph.add_edge(v[1], v[3], 2).unwrap();
        graph.add_edge(v[2], v[3], 8).unwrap();

        let paths = shortest_paths(&graph, v[0]);
        assert_eq!(paths.distance(v[1]), Some(7));
        assert_eq!(paths.distance(v[3]), Some(9));
        assert_eq!(paths.distance(v[4]), None);
        assert_eq!(paths.path_to(v[3]), Some(vec![v[0], v[2], v[1], v[3]]));
        assert_eq!(paths.path_to(v[4]), None);
        assert_eq!(paths.reached(), 4);
    }

    #[test]
    fn test_shortest_paths_unknown_source() {
        let mut graph: Graph<u32> = Graph::new();
        let a = graph.add_vertex();
        graph.remove_vertex(a);
        let paths = shortest_paths(&graph, a);
        assert_eq!(paths.reached(), 0);
        assert_eq!(paths.path_to(a), None);
    }

    #[test]
    fn test_minimum_spanning_tree() {
        //   a --1-- b
        //   |     / |
        //   4   2   5
        //   | /     |
        //   c --3-- d      e (isolated)
        let mut graph = Graph::new();
        let [a, b, c, d, e] = [(); 5].map(|_| graph.add_vertex());
        graph.add_undirected_edge(a, b, 1u32).unwrap();
        graph.add_undirected_edge(a, c, 4).unwrap();
        graph.add_undirected_edge(b, c, 2).unwrap();
        graph.add_undirected_edge(b, d, 5).unwrap();
        graph.add_undirected_edge(c, d, 3).unwrap();

        let tree = minimum_spanning_tree(&graph, a);
        assert_eq!(tree.total_weight(), 6);
        assert_eq!(tree.vertex_count(), 4);
        assert_eq!(tree.parent_edge(c), Some((b, 2)));
        assert_eq!(tree.parent_edge(d), Some((c, 3)));
        assert_eq!(tree.parent_edge(a), None);
        assert!(tree.contains(a));
        assert!(!tree.contains(e));
        assert_eq!(tree.edges().count(), 3);
    }
}
