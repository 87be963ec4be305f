//! k-shortest simple paths by physical length (Yen's algorithm) and the
//! per-topology route cache.

use std::cmp::Ordering;

use fxhash::{ FxHashMap, FxHashSet };
use petgraph::{
    algo::astar,
    stable_graph::{ EdgeReference, NodeIndex },
    visit::{ EdgeFiltered, EdgeRef },
};

use crate::eon_core::SD;

use super::{ EonGraph, Link, Route };

#[derive(Debug, Default)]
pub struct RouteCache {
    routes: FxHashMap<(SD, usize), Vec<Route>>,
}

impl RouteCache {
    pub fn get(&self, sd: &SD, k: usize) -> Option<&[Route]> {
        self.routes.get(&(sd.clone(), k)).map(|routes| routes.as_slice())
    }

    pub fn insert(&mut self, sd: SD, k: usize, routes: Vec<Route>) {
        self.routes.insert((sd, k), routes);
    }

    pub fn clear(&mut self) {
        self.routes.clear();
    }
}

type Path = (f64, Vec<NodeIndex>);

fn ordered(a: NodeIndex, b: NodeIndex) -> (NodeIndex, NodeIndex) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Ascending length, then node sequence, so that ties are deterministic.
fn compare_paths(a: &Path, b: &Path) -> Ordering {
    a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1))
}

fn path_length(graph: &EonGraph, path: &[NodeIndex]) -> f64 {
    path.windows(2)
        .filter_map(|pair| graph.find_edge(pair[0], pair[1]))
        .map(|edge_index| graph[edge_index].length)
        .sum()
}

fn shortest_path(
    graph: &EonGraph,
    src: NodeIndex,
    dst: NodeIndex,
    banned_nodes: &FxHashSet<NodeIndex>,
    banned_edges: &FxHashSet<(NodeIndex, NodeIndex)>
) -> Option<Path> {
    let filtered = EdgeFiltered::from_fn(graph, |e: EdgeReference<'_, Link>| {
        !banned_nodes.contains(&e.source())
            && !banned_nodes.contains(&e.target())
            && !banned_edges.contains(&ordered(e.source(), e.target()))
    });

    astar(&filtered, src, |n| n == dst, |e| e.weight().length, |_| 0.0)
}

/// Up to `k` loopless paths from `src` to `dst`, shortest first.
pub(crate) fn k_shortest_paths(graph: &EonGraph, src: NodeIndex, dst: NodeIndex, k: usize) -> Vec<Path> {
    if k == 0 || src == dst {
        return vec![];
    }

    let first = match shortest_path(graph, src, dst, &FxHashSet::default(), &FxHashSet::default()) {
        Some(path) => path,
        None => return vec![],
    };

    let mut found: Vec<Path> = vec![first];
    let mut candidates: Vec<Path> = vec![];

    while found.len() < k {
        let prev = found[found.len() - 1].1.clone();

        for spur_index in 0..prev.len() - 1 {
            let spur_node = prev[spur_index];
            let root = &prev[..=spur_index];

            let mut banned_edges = FxHashSet::default();
            for (_, path) in &found {
                if path.len() > spur_index + 1 && &path[..=spur_index] == root {
                    banned_edges.insert(ordered(path[spur_index], path[spur_index + 1]));
                }
            }
            let banned_nodes: FxHashSet<NodeIndex> = root[..spur_index].iter().copied().collect();

            if let Some((_, spur_path)) = shortest_path(graph, spur_node, dst, &banned_nodes, &banned_edges) {
                let mut total: Vec<NodeIndex> = root[..spur_index].to_vec();
                total.extend(spur_path);

                let known = found.iter().chain(candidates.iter()).any(|(_, p)| *p == total);
                if !known {
                    candidates.push((path_length(graph, &total), total));
                }
            }
        }

        if candidates.is_empty() {
            break;
        }

        candidates.sort_by(compare_paths);
        found.push(candidates.remove(0));
    }

    found
}
