use std::cmp::Reverse;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{GraphError, GraphResult};
use crate::graph::{Graph, VertexId, Weight};
use crate::traversal::Frame;

/// An edge selected for the minimum spanning tree, oriented from the
/// already-spanned endpoint to the newly added one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MstEdge {
    pub from: VertexId,
    pub to: VertexId,
    pub weight: Weight,
}

/// A bridge: removing this edge disconnects its two endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bridge {
    pub from: VertexId,
    pub to: VertexId,
}

/// Heap entry: (weight, from, to, dense index of `to`). Tuple order gives
/// the tie-break.
type HeapEdge = Reverse<(Weight, VertexId, VertexId, usize)>;

fn push_incident(graph: &Graph, idx: usize, visited: &[bool], heap: &mut BinaryHeap<HeapEdge>) {
    let from = graph.vertex_at(idx);
    for edge in graph.neighbors_at(idx) {
        if let Some(to_idx) = graph.index_of(edge.target) {
            if !visited[to_idx] {
                heap.push(Reverse((edge.weight, from, edge.target, to_idx)));
            }
        }
    }
}

/// Prim's minimum spanning tree, starting from the first-mentioned vertex.
///
/// Keeps one min-heap of edges incident to every expanded vertex and
/// repeatedly takes the lightest edge leading out of the tree. On a
/// disconnected graph only the start vertex's component is spanned.
pub fn prim_mst(graph: &Graph) -> GraphResult<Vec<MstEdge>> {
    if graph.is_directed() {
        debug!("prim_mst rejected: directed graph");
        return Err(GraphError::RequiresUndirected {
            operation: "prim_mst",
        });
    }

    let n = graph.vertex_count();
    let mut mst = Vec::with_capacity(n.saturating_sub(1));
    if n == 0 {
        return Ok(mst);
    }

    let mut visited = vec![false; n];
    let mut heap: BinaryHeap<HeapEdge> = BinaryHeap::new();
    let mut spanned = 1;

    visited[0] = true;
    push_incident(graph, 0, &visited, &mut heap);

    while spanned < n {
        let Some(Reverse((weight, from, to, to_idx))) = heap.pop() else {
            break;
        };
        if visited[to_idx] {
            continue;
        }
        visited[to_idx] = true;
        spanned += 1;
        mst.push(MstEdge { from, to, weight });
        push_incident(graph, to_idx, &visited, &mut heap);
    }

    if spanned < n {
        warn!(
            spanned,
            vertices = n,
            "graph is disconnected; spanning tree covers the start component only"
        );
    }
    Ok(mst)
}

/// Sum of the weights of a set of tree edges.
pub fn mst_total_weight(edges: &[MstEdge]) -> Weight {
    edges.iter().map(|e| e.weight).sum()
}

/// Tarjan's bridge-finding over every component.
///
/// A tree edge `(u, v)` is a bridge iff `low[v] > discovery[u]`. The edge
/// back to a vertex's DFS parent is never treated as a back edge. Bridges
/// are listed in the order their DFS subtree finishes.
pub fn find_bridges(graph: &Graph) -> GraphResult<Vec<Bridge>> {
    if graph.is_directed() {
        debug!("find_bridges rejected: directed graph");
        return Err(GraphError::RequiresUndirected {
            operation: "find_bridges",
        });
    }

    let n = graph.vertex_count();
    let mut discovery: Vec<Option<usize>> = vec![None; n];
    let mut low = vec![0usize; n];
    let mut parent: Vec<Option<usize>> = vec![None; n];
    let mut time = 0usize;
    let mut bridges = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();

    for root in 0..n {
        if discovery[root].is_some() {
            continue;
        }
        discovery[root] = Some(time);
        low[root] = time;
        time += 1;
        stack.push(Frame::new(root));

        while let Some(frame) = stack.last_mut() {
            let v = frame.vertex;
            let neighbors = graph.neighbors_at(v);

            if frame.cursor == neighbors.len() {
                stack.pop();
                if let Some(p) = parent[v] {
                    low[p] = low[p].min(low[v]);
                    if discovery[p].is_some_and(|dp| low[v] > dp) {
                        bridges.push(Bridge {
                            from: graph.vertex_at(p),
                            to: graph.vertex_at(v),
                        });
                    }
                }
                continue;
            }

            let target = neighbors[frame.cursor].target;
            frame.cursor += 1;

            let Some(next) = graph.index_of(target) else {
                continue;
            };
            match discovery[next] {
                None => {
                    parent[next] = Some(v);
                    discovery[next] = Some(time);
                    low[next] = time;
                    time += 1;
                    stack.push(Frame::new(next));
                }
                Some(d) if parent[v] != Some(next) => {
                    low[v] = low[v].min(d);
                }
                Some(_) => {}
            }
        }
    }

    debug!(bridges = bridges.len(), "find_bridges complete");
    Ok(bridges)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_undirected(edges: &[(VertexId, VertexId, Weight)]) -> Graph {
        let mut g = Graph::new(false);
        for &(u, v, w) in edges {
            g.add_edge(u, v, w);
        }
        g
    }

    /// Two triangles {0,1,2} and {3,4,5} joined by 2-3.
    fn make_two_triangles() -> Graph {
        make_undirected(&[
            (0, 1, 1),
            (1, 2, 1),
            (2, 0, 1),
            (3, 4, 1),
            (4, 5, 1),
            (5, 3, 1),
            (2, 3, 1),
        ])
    }

    fn bridge(from: VertexId, to: VertexId) -> Bridge {
        Bridge { from, to }
    }

    // --- Prim tests ---

    #[test]
    fn test_prim_small() {
        let g = make_undirected(&[(0, 1, 4), (0, 2, 2), (1, 2, 1), (2, 3, 3)]);
        let mst = prim_mst(&g).unwrap();
        assert_eq!(
            mst,
            vec![
                MstEdge { from: 0, to: 2, weight: 2 },
                MstEdge { from: 2, to: 1, weight: 1 },
                MstEdge { from: 2, to: 3, weight: 3 },
            ]
        );
        assert_eq!(mst_total_weight(&mst), 6);
    }

    #[test]
    fn test_prim_edge_count_connected() {
        let g = make_undirected(&[
            (0, 1, 7),
            (0, 3, 5),
            (1, 2, 8),
            (1, 3, 9),
            (1, 4, 7),
            (2, 4, 5),
            (3, 4, 15),
            (3, 5, 6),
            (4, 5, 8),
            (4, 6, 9),
            (5, 6, 11),
        ]);
        let mst = prim_mst(&g).unwrap();
        assert_eq!(mst.len(), g.vertex_count() - 1);
        assert_eq!(mst_total_weight(&mst), 39);
    }

    #[test]
    fn test_prim_negative_weights() {
        let g = make_undirected(&[(0, 1, -3), (1, 2, 5), (0, 2, -1)]);
        let mst = prim_mst(&g).unwrap();
        assert_eq!(mst_total_weight(&mst), -4);
    }

    #[test]
    fn test_prim_disconnected_covers_start_component() {
        let g = make_undirected(&[(0, 1, 1), (1, 2, 1), (10, 11, 1)]);
        let mst = prim_mst(&g).unwrap();
        assert_eq!(mst.len(), 2);
        assert!(mst.iter().all(|e| e.from < 10 && e.to < 10));
    }

    #[test]
    fn test_prim_ignores_self_loops_and_heavier_duplicates() {
        let g = make_undirected(&[(0, 0, -10), (0, 1, 5), (0, 1, 2)]);
        let mst = prim_mst(&g).unwrap();
        assert_eq!(mst, vec![MstEdge { from: 0, to: 1, weight: 2 }]);
    }

    #[test]
    fn test_prim_empty_graph() {
        assert!(prim_mst(&Graph::new(false)).unwrap().is_empty());
    }

    #[test]
    fn test_prim_rejects_directed() {
        let mut g = Graph::new(true);
        g.add_edge(0, 1, 1);
        let err = prim_mst(&g).unwrap_err();
        assert_eq!(err, GraphError::RequiresUndirected { operation: "prim_mst" });
        assert!(err.is_precondition());
    }

    // --- Bridge tests ---

    #[test]
    fn test_bridges_two_triangles() {
        let g = make_two_triangles();
        assert_eq!(find_bridges(&g).unwrap(), vec![bridge(2, 3)]);
    }

    #[test]
    fn test_bridges_small() {
        let g = make_undirected(&[(0, 1, 4), (0, 2, 2), (1, 2, 1), (2, 3, 3)]);
        assert_eq!(find_bridges(&g).unwrap(), vec![bridge(2, 3)]);
    }

    #[test]
    fn test_bridges_chain_every_edge() {
        let g = make_undirected(&[(0, 1, 1), (1, 2, 1)]);
        assert_eq!(find_bridges(&g).unwrap(), vec![bridge(1, 2), bridge(0, 1)]);
    }

    #[test]
    fn test_bridges_cycle_has_none() {
        let g = make_undirected(&[(0, 1, 1), (1, 2, 1), (2, 3, 1), (3, 0, 1)]);
        assert!(find_bridges(&g).unwrap().is_empty());
    }

    #[test]
    fn test_bridges_all_components() {
        let g = make_undirected(&[(0, 1, 1), (1, 2, 1), (2, 0, 1), (7, 8, 1)]);
        assert_eq!(find_bridges(&g).unwrap(), vec![bridge(7, 8)]);
    }

    #[test]
    fn test_bridges_self_loop_is_not_bridge() {
        let g = make_undirected(&[(0, 0, 1), (0, 1, 1)]);
        assert_eq!(find_bridges(&g).unwrap(), vec![bridge(0, 1)]);
    }

    #[test]
    fn test_bridges_rejects_directed() {
        let mut g = Graph::new(true);
        g.add_edge(0, 1, 1);
        assert!(matches!(
            find_bridges(&g),
            Err(GraphError::RequiresUndirected { .. })
        ));
    }

    #[test]
    fn test_bridges_deep_chain_no_stack_overflow() {
        let mut g = Graph::new(false);
        for i in 0..200_000 {
            g.add_edge(i, i + 1, 1);
        }
        assert_eq!(find_bridges(&g).unwrap().len(), 200_000);
    }
}
