//! graph-kit-core: In-memory graph data structure and algorithm suite.
//!
//! A pure Rust library holding an insertion-ordered adjacency map for a
//! directed or undirected, integer-weighted graph, plus the classic
//! queries over it: BFS/DFS, cycle detection, topological sort, Dijkstra,
//! Bellman-Ford, Prim's MST and bridge finding.
//!
//! All queries are read-only and single-threaded. Depth-first algorithms use
//! an explicit stack, so arbitrarily long paths cannot exhaust the thread
//! stack. Logging goes through `tracing`; no subscriber is installed here.

mod error;
mod graph;
mod shortest_path;
mod spanning;
mod traversal;

pub use error::{GraphError, GraphResult};
pub use graph::{Edge, EdgeRecord, Graph, VertexId, Weight};
pub use shortest_path::{bellman_ford, dijkstra, Distance, DistanceMap};
pub use spanning::{find_bridges, mst_total_weight, prim_mst, Bridge, MstEdge};
pub use traversal::{bfs, detect_cycle, dfs, topological_sort};
