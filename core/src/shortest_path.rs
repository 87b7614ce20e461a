//! Single-source shortest paths: Dijkstra for non-negative weights,
//! Bellman-Ford for arbitrary integer weights.
//!
//! Both return a distance for every known vertex. Vertices that cannot be
//! reached from the start report [`Distance::Infinite`] rather than being
//! left out.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GraphError, GraphResult};
use crate::graph::{Graph, VertexId, Weight};

/// Tentative or final path length. Every finite distance orders below `Infinite`.
///
/// Serializes as a plain integer, or `null` for `Infinite`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Distance {
    Finite(Weight),
    Infinite,
}

impl Distance {
    pub fn is_finite(&self) -> bool {
        matches!(self, Distance::Finite(_))
    }

    /// The finite value, if any.
    pub fn finite(&self) -> Option<Weight> {
        match *self {
            Distance::Finite(d) => Some(d),
            Distance::Infinite => None,
        }
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distance::Finite(d) => write!(f, "{}", d),
            Distance::Infinite => f.write_str("inf"),
        }
    }
}

/// Distance per vertex, in first-mention order of the graph.
pub type DistanceMap = IndexMap<VertexId, Distance>;

/// Build the result map from dense per-index distances. An unknown `start`
/// is appended with distance 0.
fn collect_distances(graph: &Graph, start: VertexId, dist: &[Distance]) -> DistanceMap {
    let mut map: DistanceMap = dist
        .iter()
        .enumerate()
        .map(|(i, &d)| (graph.vertex_at(i), d))
        .collect();
    map.entry(start).or_insert(Distance::Finite(0));
    map
}

/// Dijkstra's algorithm with a binary min-heap and lazy deletion.
///
/// Only correct for non-negative weights; negative weights are not checked
/// for. A popped entry is skipped when it is stale, i.e. longer than the
/// recorded best. A vertex whose distance keeps dropping is re-expanded, at
/// most |V| times, so the call terminates even on a negative cycle.
pub fn dijkstra(graph: &Graph, start: VertexId) -> DistanceMap {
    let n = graph.vertex_count();
    let mut dist = vec![Distance::Infinite; n];

    let Some(start_idx) = graph.index_of(start) else {
        return collect_distances(graph, start, &dist);
    };

    let mut expansions = vec![0usize; n];
    let mut heap: BinaryHeap<Reverse<(Weight, usize)>> = BinaryHeap::new();

    dist[start_idx] = Distance::Finite(0);
    heap.push(Reverse((0, start_idx)));

    while let Some(Reverse((current_dist, current))) = heap.pop() {
        if Distance::Finite(current_dist) > dist[current] {
            continue;
        }
        if expansions[current] == n {
            continue;
        }
        expansions[current] += 1;

        for edge in graph.neighbors_at(current) {
            let Some(next) = graph.index_of(edge.target) else {
                continue;
            };
            let candidate = current_dist.saturating_add(edge.weight);
            if Distance::Finite(candidate) < dist[next] {
                dist[next] = Distance::Finite(candidate);
                heap.push(Reverse((candidate, next)));
            }
        }
    }

    debug!(
        start,
        reached = dist.iter().filter(|d| d.is_finite()).count(),
        expanded = expansions.iter().sum::<usize>(),
        "dijkstra complete"
    );
    collect_distances(graph, start, &dist)
}

/// One full pass over every edge. Returns true if any distance changed.
fn relax_all(graph: &Graph, dist: &mut [Distance]) -> bool {
    let mut changed = false;
    for u in 0..dist.len() {
        let Distance::Finite(du) = dist[u] else {
            continue;
        };
        for edge in graph.neighbors_at(u) {
            let Some(v) = graph.index_of(edge.target) else {
                continue;
            };
            let candidate = Distance::Finite(du.saturating_add(edge.weight));
            if candidate < dist[v] {
                dist[v] = candidate;
                changed = true;
            }
        }
    }
    changed
}

/// True if some edge out of a reached vertex can still shorten a distance.
fn any_relaxable(graph: &Graph, dist: &[Distance]) -> bool {
    (0..dist.len()).any(|u| match dist[u] {
        Distance::Finite(du) => graph.neighbors_at(u).iter().any(|edge| {
            graph
                .index_of(edge.target)
                .is_some_and(|v| Distance::Finite(du.saturating_add(edge.weight)) < dist[v])
        }),
        Distance::Infinite => false,
    })
}

/// Bellman-Ford: |V| - 1 full relaxation passes, then one verification pass.
///
/// Handles negative weights. Fails with [`GraphError::NegativeCycle`] if a
/// negative-weight cycle is reachable from `start`; no distances are returned
/// in that case.
pub fn bellman_ford(graph: &Graph, start: VertexId) -> GraphResult<DistanceMap> {
    let n = graph.vertex_count();
    let mut dist = vec![Distance::Infinite; n];

    let Some(start_idx) = graph.index_of(start) else {
        return Ok(collect_distances(graph, start, &dist));
    };
    dist[start_idx] = Distance::Finite(0);

    for _ in 1..n {
        // A pass that changes nothing means every later pass would too.
        if !relax_all(graph, &mut dist) {
            break;
        }
    }

    if any_relaxable(graph, &dist) {
        debug!(start, "bellman_ford found a negative cycle");
        return Err(GraphError::NegativeCycle { start });
    }

    debug!(
        start,
        reached = dist.iter().filter(|d| d.is_finite()).count(),
        "bellman_ford complete"
    );
    Ok(collect_distances(graph, start, &dist))
}
