use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::GraphResult;
use crate::shortest_path::{self, DistanceMap};
use crate::spanning::{self, Bridge, MstEdge};
use crate::traversal;

/// Vertex identifier. Vertices exist implicitly once mentioned by an edge.
pub type VertexId = i64;

/// Edge weight. May be negative; only Bellman-Ford is correct in that case.
pub type Weight = i64;

/// One adjacency record: the far endpoint and the edge weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub target: VertexId,
    pub weight: Weight,
}

fn default_weight() -> Weight {
    1
}

/// A plain edge record as exchanged with an external record layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub from: VertexId,
    pub to: VertexId,
    #[serde(default = "default_weight")]
    pub weight: Weight,
}

/// In-memory graph: insertion-ordered adjacency lists + a fixed directedness flag.
///
/// For an undirected graph each `add_edge(u, v, w)` stores both `u → v` and
/// `v → u`. Every vertex named in an edge gets an adjacency entry, even if it
/// never appears as a source, so "all vertices" always means all mentioned
/// vertices. Neighbor order is insertion order; it decides traversal order.
#[derive(Debug, Clone)]
pub struct Graph {
    adjacency: IndexMap<VertexId, Vec<Edge>>,
    directed: bool,
}

impl Graph {
    pub fn new(directed: bool) -> Self {
        Self {
            adjacency: IndexMap::new(),
            directed,
        }
    }

    /// Pre-allocate for a known number of vertices.
    pub fn with_capacity(directed: bool, vertex_count: usize) -> Self {
        Self {
            adjacency: IndexMap::with_capacity(vertex_count),
            directed,
        }
    }

    /// Add an edge `u → v` (and `v → u` when undirected).
    ///
    /// Duplicates and self-loops are accepted as-is.
    pub fn add_edge(&mut self, u: VertexId, v: VertexId, weight: Weight) {
        self.adjacency
            .entry(u)
            .or_default()
            .push(Edge { target: v, weight });
        let reverse = self.adjacency.entry(v).or_default();
        if !self.directed {
            reverse.push(Edge { target: u, weight });
        }
    }

    /// Add an edge with the default weight of 1.
    pub fn add_unweighted_edge(&mut self, u: VertexId, v: VertexId) {
        self.add_edge(u, v, 1);
    }

    /// Bulk load from edge records, in iteration order.
    pub fn load_edges<I>(&mut self, edges: I)
    where
        I: IntoIterator<Item = EdgeRecord>,
    {
        for EdgeRecord { from, to, weight } in edges {
            self.add_edge(from, to, weight);
        }
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Outgoing adjacency records of `v`; empty for unknown vertices.
    pub fn neighbors(&self, v: VertexId) -> &[Edge] {
        self.adjacency.get(&v).map(|e| e.as_slice()).unwrap_or(&[])
    }

    /// Known vertices in first-mention order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.adjacency.keys().copied()
    }

    pub fn contains_vertex(&self, v: VertexId) -> bool {
        self.adjacency.contains_key(&v)
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of adjacency records (an undirected edge counts twice).
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(|v| v.len()).sum()
    }

    /// Approximate memory usage in bytes.
    pub fn memory_usage(&self) -> usize {
        use std::mem::size_of;

        let keys = self.adjacency.len() * (size_of::<VertexId>() + size_of::<Vec<Edge>>() + 16);
        let edges: usize = self
            .adjacency
            .values()
            .map(|v| v.capacity() * size_of::<Edge>())
            .sum();

        keys + edges
    }

    /// Position of `v` in the adjacency map, used as a dense index by the algorithms.
    pub(crate) fn index_of(&self, v: VertexId) -> Option<usize> {
        self.adjacency.get_index_of(&v)
    }

    /// Vertex at dense index `i`.
    pub(crate) fn vertex_at(&self, i: usize) -> VertexId {
        self.adjacency
            .get_index(i)
            .map(|(&v, _)| v)
            .unwrap_or_default()
    }

    /// Adjacency records of the vertex at dense index `i`.
    pub(crate) fn neighbors_at(&self, i: usize) -> &[Edge] {
        self.adjacency
            .get_index(i)
            .map(|(_, e)| e.as_slice())
            .unwrap_or(&[])
    }

    // --- Queries ---

    /// See [`traversal::bfs`].
    pub fn bfs(&self, start: VertexId) -> Vec<VertexId> {
        traversal::bfs(self, start)
    }

    /// See [`traversal::dfs`].
    pub fn dfs(&self, start: VertexId) -> Vec<VertexId> {
        traversal::dfs(self, start)
    }

    /// See [`traversal::detect_cycle`].
    pub fn detect_cycle(&self) -> bool {
        traversal::detect_cycle(self)
    }

    /// See [`traversal::topological_sort`].
    pub fn topological_sort(&self) -> GraphResult<Vec<VertexId>> {
        traversal::topological_sort(self)
    }

    /// See [`shortest_path::dijkstra`].
    pub fn dijkstra(&self, start: VertexId) -> DistanceMap {
        shortest_path::dijkstra(self, start)
    }

    /// See [`shortest_path::bellman_ford`].
    pub fn bellman_ford(&self, start: VertexId) -> GraphResult<DistanceMap> {
        shortest_path::bellman_ford(self, start)
    }

    /// See [`spanning::prim_mst`].
    pub fn prim_mst(&self) -> GraphResult<Vec<MstEdge>> {
        spanning::prim_mst(self)
    }

    /// See [`spanning::find_bridges`].
    pub fn find_bridges(&self) -> GraphResult<Vec<Bridge>> {
        spanning::find_bridges(self)
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new(false)
    }
}
