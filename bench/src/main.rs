use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use graph_kit_core::{mst_total_weight, EdgeRecord, Graph, VertexId};
use serde::Serialize;

/// Times every graph-kit-core algorithm on generated or loaded graphs.
#[derive(Parser, Debug)]
#[command(name = "graph-kit-bench", version, about)]
struct Args {
    /// Generator to run.
    #[arg(value_enum, default_value_t = Mode::All, env = "GRAPH_KIT_BENCH_MODE")]
    mode: Mode,

    /// Target vertex count for generated graphs.
    #[arg(default_value_t = 100_000, env = "GRAPH_KIT_BENCH_NODES")]
    node_count: u64,

    /// Load edge records from a JSON array instead of generating a graph.
    #[arg(long, env = "GRAPH_KIT_BENCH_EDGES")]
    edges: Option<PathBuf>,

    /// Treat loaded edge records as directed.
    #[arg(long)]
    directed: bool,

    /// Start vertex for BFS/DFS/shortest paths (default: first vertex).
    #[arg(long)]
    start: Option<VertexId>,

    /// Print a JSON report instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    /// Run all generators and benchmark each
    All,
    /// Branching tree, undirected (every edge is a bridge)
    Tree,
    /// Erdos-Renyi uniform random edges, directed
    Random,
    /// Watts-Strogatz ring lattice + shortcuts, undirected
    Smallworld,
    /// Two dense cliques connected by a thin bridge, undirected
    Barbell,
    /// Layered DAG, directed (topological sort succeeds)
    Dag,
}

/// Above this |V|·|E| product Bellman-Ford is skipped.
const BELLMAN_FORD_BUDGET: u128 = 500_000_000;

#[derive(Debug, Serialize)]
struct AlgorithmTiming {
    algorithm: &'static str,
    millis: f64,
    outcome: String,
}

#[derive(Debug, Serialize)]
struct GraphReport {
    name: String,
    directed: bool,
    vertices: usize,
    adjacency_records: usize,
    memory_bytes: usize,
    build_millis: f64,
    timings: Vec<AlgorithmTiming>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut reports = Vec::new();

    if let Some(path) = &args.edges {
        let t = Instant::now();
        let graph = load_graph(path, args.directed)?;
        let build = t.elapsed().as_secs_f64() * 1000.0;
        tracing::info!(path = %path.display(), vertices = graph.vertex_count(), "loaded edge records");
        reports.push(run_benchmark(&path.display().to_string(), &graph, build, args.start));
    } else {
        let generators: Vec<(&str, fn(u64) -> Graph)> = match args.mode {
            Mode::Tree => vec![("Branching tree", gen_tree)],
            Mode::Random => vec![("Erdos-Renyi random", gen_random)],
            Mode::Smallworld => vec![("Small-world (Watts-Strogatz)", gen_small_world)],
            Mode::Barbell => vec![("Barbell (clique-bridge-clique)", gen_barbell)],
            Mode::Dag => vec![("Layered DAG", gen_dag)],
            Mode::All => vec![
                ("Branching tree", gen_tree as fn(u64) -> Graph),
                ("Erdos-Renyi random", gen_random),
                ("Small-world (Watts-Strogatz)", gen_small_world),
                ("Barbell (clique-bridge-clique)", gen_barbell),
                ("Layered DAG", gen_dag),
            ],
        };

        if args.node_count < 32 {
            bail!("node_count must be at least 32, got {}", args.node_count);
        }

        for (name, generator) in generators {
            tracing::info!(generator = name, target = args.node_count, "generating");
            let t = Instant::now();
            let graph = generator(args.node_count);
            let build = t.elapsed().as_secs_f64() * 1000.0;
            reports.push(run_benchmark(name, &graph, build, args.start));
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            print_report(report);
        }
    }
    Ok(())
}

fn load_graph(path: &Path, directed: bool) -> Result<Graph> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading edge records from {}", path.display()))?;
    let records: Vec<EdgeRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing edge records in {}", path.display()))?;

    let mut graph = Graph::new(directed);
    graph.load_edges(records);
    Ok(graph)
}

/// Run `f`, returning its outcome description and elapsed milliseconds.
fn timed<F: FnOnce() -> String>(algorithm: &'static str, f: F) -> AlgorithmTiming {
    let t = Instant::now();
    let outcome = f();
    AlgorithmTiming {
        algorithm,
        millis: t.elapsed().as_secs_f64() * 1000.0,
        outcome,
    }
}

fn run_benchmark(name: &str, graph: &Graph, build_millis: f64, start: Option<VertexId>) -> GraphReport {
    let start = start.or_else(|| graph.vertices().next()).unwrap_or_default();
    let mut timings = Vec::new();

    timings.push(timed("bfs", || format!("{} reached", graph.bfs(start).len())));
    timings.push(timed("dfs", || format!("{} reached", graph.dfs(start).len())));
    timings.push(timed("detect_cycle", || graph.detect_cycle().to_string()));
    timings.push(timed("topological_sort", || match graph.topological_sort() {
        Ok(order) => format!("{} ordered", order.len()),
        Err(e) => format!("error: {}", e),
    }));
    timings.push(timed("dijkstra", || {
        let dist = graph.dijkstra(start);
        let reached = dist.values().filter(|d| d.is_finite()).count();
        let farthest = dist.values().filter_map(|d| d.finite()).max().unwrap_or(0);
        format!("{} reached, max distance {}", reached, farthest)
    }));

    let work = graph.vertex_count() as u128 * graph.edge_count() as u128;
    if work <= BELLMAN_FORD_BUDGET {
        timings.push(timed("bellman_ford", || match graph.bellman_ford(start) {
            Ok(dist) => format!("{} reached", dist.values().filter(|d| d.is_finite()).count()),
            Err(e) => format!("error: {}", e),
        }));
    } else {
        tracing::debug!(work = %work, "bellman_ford skipped: over budget");
        timings.push(AlgorithmTiming {
            algorithm: "bellman_ford",
            millis: 0.0,
            outcome: "skipped (|V|·|E| over budget)".to_string(),
        });
    }

    timings.push(timed("prim_mst", || match graph.prim_mst() {
        Ok(mst) => format!("{} edges, total weight {}", mst.len(), mst_total_weight(&mst)),
        Err(e) => format!("error: {}", e),
    }));
    timings.push(timed("find_bridges", || match graph.find_bridges() {
        Ok(bridges) => format!("{} bridges", bridges.len()),
        Err(e) => format!("error: {}", e),
    }));

    GraphReport {
        name: name.to_string(),
        directed: graph.is_directed(),
        vertices: graph.vertex_count(),
        adjacency_records: graph.edge_count(),
        memory_bytes: graph.memory_usage(),
        build_millis,
        timings,
    }
}

fn print_report(report: &GraphReport) {
    println!("--- {} ---", report.name);
    println!(
        "Built in {:.2}s — {} vertices, {} adjacency records, {}, ~{:.0}MB",
        report.build_millis / 1000.0,
        report.vertices,
        report.adjacency_records,
        if report.directed { "directed" } else { "undirected" },
        report.memory_bytes as f64 / 1_048_576.0
    );
    println!();
    println!("{:>18} {:>12}  {}", "algorithm", "time", "outcome");
    println!("{:->18} {:->12}  {:->30}", "", "", "");
    for t in &report.timings {
        println!("{:>18} {:>10.1}ms  {}", t.algorithm, t.millis, t.outcome);
    }
    println!();
}

// ---------------------------------------------------------------------------
// Generators — all O(n) or O(n + edges), single-threaded, deterministic
// ---------------------------------------------------------------------------

/// Simple LCG for deterministic, fast pseudo-random numbers.
struct FastRng(u64);

impl FastRng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next(&mut self, max: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 33) % max
    }
    fn next_f64(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
    /// Edge weight in 1..=100.
    fn weight(&mut self) -> i64 {
        self.next(100) as i64 + 1
    }
}

/// Branching tree: every vertex spawns three children until the target size.
///
/// Deep frontier with exponential width; every edge is a bridge.
fn gen_tree(node_count: u64) -> Graph {
    let mut graph = Graph::with_capacity(false, node_count as usize);
    let mut rng = FastRng::new(42);

    let branching = 3u64;
    let mut next_id: u64 = 1;
    let mut frontier: Vec<u64> = vec![0];

    while next_id < node_count && !frontier.is_empty() {
        let mut next_frontier = Vec::with_capacity(frontier.len() * branching as usize);
        for &parent in &frontier {
            for _ in 0..branching {
                if next_id >= node_count {
                    break;
                }
                let child = next_id;
                next_id += 1;
                let w = rng.weight();
                graph.add_edge(parent as i64, child as i64, w);
                next_frontier.push(child);
            }
        }
        frontier = next_frontier;
    }

    graph
}

/// Erdos-Renyi: ~10 uniform random directed edges per vertex.
fn gen_random(node_count: u64) -> Graph {
    let target_edges = node_count * 10;
    let mut graph = Graph::with_capacity(true, node_count as usize);
    let mut rng = FastRng::new(54321);

    for _ in 0..target_edges {
        let from = rng.next(node_count);
        let to = rng.next(node_count);
        if from != to {
            let w = rng.weight();
            graph.add_edge(from as i64, to as i64, w);
        }
    }

    graph
}

/// Small-world (Watts-Strogatz): ring lattice + random rewiring.
///
/// Each vertex links to its K forward neighbors on a ring; each link is
/// rewired to a random vertex with probability p.
fn gen_small_world(node_count: u64) -> Graph {
    let k = 5u64;
    let p = 0.05f64;
    let mut graph = Graph::with_capacity(false, node_count as usize);
    let mut rng = FastRng::new(67890);

    for i in 0..node_count {
        for j in 1..=k {
            let neighbor = (i + j) % node_count;
            let w = rng.weight();

            let target = if rng.next_f64() < p {
                let rewired = rng.next(node_count);
                if rewired != i {
                    rewired
                } else {
                    neighbor
                }
            } else {
                neighbor
            };
            graph.add_edge(i as i64, target as i64, w);
        }
    }

    graph
}

/// Barbell: two dense cliques joined by a chain of ~10 bridge vertices.
///
/// Every edge on the chain is a bridge; nothing inside a clique is.
fn gen_barbell(node_count: u64) -> Graph {
    let bridge_len = 10u64;
    let clique_size = (node_count - bridge_len) / 2;
    let mut graph = Graph::with_capacity(false, node_count as usize);
    let mut rng = FastRng::new(99999);

    let mut clique = |graph: &mut Graph, offset: u64| {
        // Ring first so the clique stays 2-edge-connected
        for i in 0..clique_size {
            let w = rng.weight();
            graph.add_edge((offset + i) as i64, (offset + (i + 1) % clique_size) as i64, w);
        }
        for i in 0..clique_size {
            for _ in 0..10u64.min(clique_size - 1) {
                let target = rng.next(clique_size);
                if target != i {
                    let w = rng.weight();
                    graph.add_edge((offset + i) as i64, (offset + target) as i64, w);
                }
            }
        }
    };

    clique(&mut graph, 0);

    let bridge_start = clique_size;
    graph.add_edge((clique_size - 1) as i64, bridge_start as i64, 1);
    for i in 1..bridge_len {
        let id = bridge_start + i;
        graph.add_edge((id - 1) as i64, id as i64, 1);
    }

    let b_start = bridge_start + bridge_len;
    graph.add_edge((b_start - 1) as i64, b_start as i64, 1);
    clique(&mut graph, b_start);

    graph
}

/// Layered DAG: vertices split into layers of ~100; each vertex points to a
/// few random vertices in later layers.
fn gen_dag(node_count: u64) -> Graph {
    let layer = 100u64;
    let mut graph = Graph::with_capacity(true, node_count as usize);
    let mut rng = FastRng::new(77777);

    for from in 0..node_count {
        let next_layer = (from / layer + 1) * layer;
        if next_layer >= node_count {
            break;
        }
        for _ in 0..4 {
            let to = next_layer + rng.next(node_count - next_layer);
            let w = rng.weight();
            graph.add_edge(from as i64, to as i64, w);
        }
    }

    graph
}
