use std::collections::VecDeque;

use tracing::debug;

use crate::error::{GraphError, GraphResult};
use crate::graph::{Graph, VertexId};

/// One explicit-stack DFS frame: a vertex (dense index) and the position of
/// the next neighbor to examine. Replaces a recursive call, so traversal
/// depth is bounded by heap, not by the thread stack.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Frame {
    pub vertex: usize,
    pub cursor: usize,
}

impl Frame {
    pub(crate) fn new(vertex: usize) -> Self {
        Self { vertex, cursor: 0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}

/// Breadth-first traversal from `start`, in first-discovered order.
///
/// `start` is always part of the result, even when it is not a known vertex.
pub fn bfs(graph: &Graph, start: VertexId) -> Vec<VertexId> {
    let Some(start_idx) = graph.index_of(start) else {
        return vec![start];
    };

    let mut visited = vec![false; graph.vertex_count()];
    let mut order = Vec::new();
    let mut queue: VecDeque<usize> = VecDeque::new();

    visited[start_idx] = true;
    queue.push_back(start_idx);

    while let Some(current) = queue.pop_front() {
        order.push(graph.vertex_at(current));

        for edge in graph.neighbors_at(current) {
            let Some(next) = graph.index_of(edge.target) else {
                continue;
            };
            if !visited[next] {
                visited[next] = true;
                queue.push_back(next);
            }
        }
    }

    debug!(start, visited = order.len(), "bfs complete");
    order
}

/// Depth-first traversal from `start`, in pre-order.
///
/// Visits neighbors in insertion order, exactly as the recursive formulation
/// would, but keeps its own stack of frames.
pub fn dfs(graph: &Graph, start: VertexId) -> Vec<VertexId> {
    let Some(start_idx) = graph.index_of(start) else {
        return vec![start];
    };

    let mut visited = vec![false; graph.vertex_count()];
    let mut order = vec![start];
    let mut stack = vec![Frame::new(start_idx)];
    visited[start_idx] = true;

    while let Some(frame) = stack.last_mut() {
        let neighbors = graph.neighbors_at(frame.vertex);
        if frame.cursor == neighbors.len() {
            stack.pop();
            continue;
        }
        let target = neighbors[frame.cursor].target;
        frame.cursor += 1;

        let Some(next) = graph.index_of(target) else {
            continue;
        };
        if !visited[next] {
            visited[next] = true;
            order.push(target);
            stack.push(Frame::new(next));
        }
    }

    debug!(start, visited = order.len(), "dfs complete");
    order
}

/// True if a DFS from any unvisited vertex meets an edge back into the
/// current DFS path. Self-loops count.
///
/// The test is applied the same way to undirected graphs, where the reverse
/// record of the edge just followed leads straight back to the parent. Any
/// undirected graph with at least one edge is therefore reported as cyclic.
pub fn detect_cycle(graph: &Graph) -> bool {
    let n = graph.vertex_count();
    let mut marks = vec![Mark::Unvisited; n];
    let mut stack: Vec<Frame> = Vec::new();

    for root in 0..n {
        if marks[root] != Mark::Unvisited {
            continue;
        }
        marks[root] = Mark::OnStack;
        stack.push(Frame::new(root));

        while let Some(frame) = stack.last_mut() {
            let neighbors = graph.neighbors_at(frame.vertex);
            if frame.cursor == neighbors.len() {
                marks[frame.vertex] = Mark::Done;
                stack.pop();
                continue;
            }
            let target = neighbors[frame.cursor].target;
            frame.cursor += 1;

            let Some(next) = graph.index_of(target) else {
                continue;
            };
            match marks[next] {
                Mark::Unvisited => {
                    marks[next] = Mark::OnStack;
                    stack.push(Frame::new(next));
                }
                Mark::OnStack => {
                    debug!(
                        from = graph.vertex_at(frame.vertex),
                        to = target,
                        "back edge found"
                    );
                    return true;
                }
                Mark::Done => {}
            }
        }
    }

    false
}

/// Topological order of a directed acyclic graph.
///
/// Vertices are emitted in reverse DFS post-order, with roots taken in
/// first-mention order and neighbors in insertion order. Fails with a
/// precondition error on an undirected graph or when a cycle exists.
pub fn topological_sort(graph: &Graph) -> GraphResult<Vec<VertexId>> {
    if !graph.is_directed() {
        debug!("topological_sort rejected: undirected graph");
        return Err(GraphError::RequiresDirected {
            operation: "topological_sort",
        });
    }
    if detect_cycle(graph) {
        debug!("topological_sort rejected: cycle present");
        return Err(GraphError::NotADag);
    }

    let n = graph.vertex_count();
    let mut visited = vec![false; n];
    let mut post_order = Vec::with_capacity(n);
    let mut stack: Vec<Frame> = Vec::new();

    for root in 0..n {
        if visited[root] {
            continue;
        }
        visited[root] = true;
        stack.push(Frame::new(root));

        while let Some(frame) = stack.last_mut() {
            let neighbors = graph.neighbors_at(frame.vertex);
            if frame.cursor == neighbors.len() {
                post_order.push(graph.vertex_at(frame.vertex));
                stack.pop();
                continue;
            }
            let target = neighbors[frame.cursor].target;
            frame.cursor += 1;

            if let Some(next) = graph.index_of(target) {
                if !visited[next] {
                    visited[next] = true;
                    stack.push(Frame::new(next));
                }
            }
        }
    }

    post_order.reverse();
    Ok(post_order)
}
