//! Property tests for the graph algorithms against naive reference
//! computations on small random graphs.

use std::collections::BTreeSet;

use graph_kit_core::{mst_total_weight, Distance, Graph, GraphError, VertexId, Weight};
use proptest::prelude::*;

const MAX_VERTICES: VertexId = 12;

fn edge_list(max_edges: usize) -> impl Strategy<Value = Vec<(VertexId, VertexId)>> {
    prop::collection::vec((0..MAX_VERTICES, 0..MAX_VERTICES), 0..max_edges)
}

fn weighted_edge_list(
    max_edges: usize,
    weights: std::ops::Range<Weight>,
) -> impl Strategy<Value = Vec<(VertexId, VertexId, Weight)>> {
    prop::collection::vec((0..MAX_VERTICES, 0..MAX_VERTICES, weights), 0..max_edges)
}

/// Connected undirected graph on `n` vertices: a weighted path 0-1-..-(n-1)
/// plus a few arbitrary extra edges.
fn connected_weighted() -> impl Strategy<Value = (usize, Vec<(VertexId, VertexId, Weight)>)> {
    (2usize..=6)
        .prop_flat_map(|n| {
            let path = prop::collection::vec(-5i64..20, n - 1);
            let extra =
                prop::collection::vec((0..n as VertexId, 0..n as VertexId, -5i64..20), 0..6);
            (Just(n), path, extra)
        })
        .prop_map(|(n, path, extra)| {
            let mut edges: Vec<(VertexId, VertexId, Weight)> = path
                .into_iter()
                .enumerate()
                .map(|(i, w)| (i as VertexId, i as VertexId + 1, w))
                .collect();
            edges.extend(extra);
            (n, edges)
        })
}

fn build(directed: bool, edges: &[(VertexId, VertexId)]) -> Graph {
    let mut g = Graph::new(directed);
    for &(u, v) in edges {
        g.add_unweighted_edge(u, v);
    }
    g
}

fn build_weighted(directed: bool, edges: &[(VertexId, VertexId, Weight)]) -> Graph {
    let mut g = Graph::new(directed);
    for &(u, v, w) in edges {
        g.add_edge(u, v, w);
    }
    g
}

/// Fixpoint reachability over a plain edge list.
fn reachable(edges: &[(VertexId, VertexId)], directed: bool, start: VertexId) -> BTreeSet<VertexId> {
    let mut seen = BTreeSet::from([start]);
    loop {
        let before = seen.len();
        for &(u, v) in edges {
            if seen.contains(&u) {
                seen.insert(v);
            }
            if !directed && seen.contains(&v) {
                seen.insert(u);
            }
        }
        if seen.len() == before {
            return seen;
        }
    }
}

/// Minimum spanning tree weight by trying every (n-1)-edge subset.
fn brute_force_mst_weight(n: usize, edges: &[(VertexId, VertexId, Weight)]) -> Option<Weight> {
    fn find(parent: &[usize], x: usize) -> usize {
        let mut root = x;
        while parent[root] != root {
            root = parent[root];
        }
        root
    }

    let mut best: Option<Weight> = None;
    for mask in 0u32..(1 << edges.len()) {
        if mask.count_ones() as usize != n - 1 {
            continue;
        }
        let mut parent: Vec<usize> = (0..n).collect();
        let mut total = 0;
        let mut is_tree = true;
        for (i, &(u, v, w)) in edges.iter().enumerate() {
            if mask & (1 << i) == 0 {
                continue;
            }
            let (ru, rv) = (find(&parent, u as usize), find(&parent, v as usize));
            if ru == rv {
                is_tree = false;
                break;
            }
            parent[ru] = rv;
            total += w;
        }
        if is_tree {
            best = Some(best.map_or(total, |b| b.min(total)));
        }
    }
    best
}

fn normalize(u: VertexId, v: VertexId) -> (VertexId, VertexId) {
    (u.min(v), u.max(v))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn bfs_visits_exactly_the_reachable_set(
        directed in any::<bool>(),
        edges in edge_list(30),
        start in 0..MAX_VERTICES,
    ) {
        let g = build(directed, &edges);
        let order = g.bfs(start);
        let as_set: BTreeSet<VertexId> = order.iter().copied().collect();

        prop_assert_eq!(order[0], start);
        prop_assert_eq!(as_set.len(), order.len());
        prop_assert_eq!(as_set, reachable(&edges, directed, start));
    }

    #[test]
    fn dfs_visits_exactly_the_reachable_set(
        directed in any::<bool>(),
        edges in edge_list(30),
        start in 0..MAX_VERTICES,
    ) {
        let g = build(directed, &edges);
        let order = g.dfs(start);
        let as_set: BTreeSet<VertexId> = order.iter().copied().collect();

        prop_assert_eq!(order[0], start);
        prop_assert_eq!(as_set.len(), order.len());
        prop_assert_eq!(as_set, reachable(&edges, directed, start));
    }

    #[test]
    fn self_loop_always_means_cycle(
        directed in any::<bool>(),
        edges in edge_list(20),
        looped in 0..MAX_VERTICES,
    ) {
        let mut g = build(directed, &edges);
        g.add_unweighted_edge(looped, looped);
        prop_assert!(g.detect_cycle());
    }

    #[test]
    fn topological_sort_orders_every_edge_of_a_dag(edges in edge_list(30)) {
        let dag: Vec<(VertexId, VertexId)> = edges
            .into_iter()
            .filter(|(u, v)| u != v)
            .map(|(u, v)| normalize(u, v))
            .collect();
        let g = build(true, &dag);
        let order = g.topological_sort().unwrap();

        prop_assert_eq!(order.len(), g.vertex_count());
        let position = |v: VertexId| order.iter().position(|&x| x == v).unwrap();
        for &(u, v) in &dag {
            prop_assert!(position(u) < position(v));
        }
    }

    #[test]
    fn topological_sort_fails_exactly_when_cyclic(edges in edge_list(20)) {
        let g = build(true, &edges);
        match g.topological_sort() {
            Ok(_) => {
                prop_assert!(!g.detect_cycle());
            }
            Err(err) => {
                prop_assert_eq!(err, GraphError::NotADag);
                prop_assert!(g.detect_cycle());
            }
        }
    }

    #[test]
    fn dijkstra_matches_bellman_ford_on_non_negative_weights(
        directed in any::<bool>(),
        edges in weighted_edge_list(30, 0..50),
        start in 0..MAX_VERTICES,
    ) {
        let g = build_weighted(directed, &edges);
        let dj = g.dijkstra(start);
        let bf = g.bellman_ford(start).unwrap();
        prop_assert_eq!(dj.len(), bf.len());
        for (v, d) in &bf {
            prop_assert_eq!(dj.get(v), Some(d));
        }
        prop_assert_eq!(bf.get(&start), Some(&Distance::Finite(0)));
    }

    #[test]
    fn bellman_ford_distances_are_tight(
        edges in weighted_edge_list(25, -3..20),
        start in 0..MAX_VERTICES,
    ) {
        let g = build_weighted(true, &edges);
        if let Ok(dist) = g.bellman_ford(start) {
            for &(u, v, w) in &edges {
                if let Distance::Finite(du) = dist[&u] {
                    prop_assert!(dist[&v] <= Distance::Finite(du + w));
                }
            }
        }
    }

    #[test]
    fn prim_matches_brute_force((n, edges) in connected_weighted()) {
        let g = build_weighted(false, &edges);
        let mst = g.prim_mst().unwrap();
        prop_assert_eq!(mst.len(), n - 1);
        prop_assert_eq!(Some(mst_total_weight(&mst)), brute_force_mst_weight(n, &edges));
    }

    #[test]
    fn bridges_are_exactly_the_disconnecting_edges(edges in edge_list(20)) {
        let simple: Vec<(VertexId, VertexId)> = edges
            .into_iter()
            .filter(|(u, v)| u != v)
            .map(|(u, v)| normalize(u, v))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let g = build(false, &simple);

        let found: BTreeSet<(VertexId, VertexId)> = g
            .find_bridges()
            .unwrap()
            .into_iter()
            .map(|b| normalize(b.from, b.to))
            .collect();

        let expected: BTreeSet<(VertexId, VertexId)> = simple
            .iter()
            .copied()
            .filter(|&(u, v)| {
                let without: Vec<(VertexId, VertexId)> =
                    simple.iter().copied().filter(|&e| e != (u, v)).collect();
                !reachable(&without, false, u).contains(&v)
            })
            .collect();

        prop_assert_eq!(found, expected);
    }
}
