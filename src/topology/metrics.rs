use std::collections::{ BTreeMap, VecDeque };

use fxhash::FxHashMap;
use petgraph::{ algo::dijkstra, stable_graph::NodeIndex, visit::EdgeRef };
use serde_derive::Serialize;

use crate::eon_core::NodeId;

use super::{ EonGraph, Topology };

/// Graph invariants of a topology, as written to the sweep reports.
///
/// Eccentricity based fields are `None` when the topology is disconnected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopologyReport {
    pub node_count: usize,
    pub link_count: usize,
    pub mean_degree: f64,
    pub degree_variance: f64,
    pub density: f64,
    pub radius_by_hops: Option<usize>,
    pub diameter_by_hops: Option<usize>,
    pub center_by_hops: Option<Vec<NodeId>>,
    pub periphery_by_hops: Option<Vec<NodeId>>,
    pub eccentricity_by_hops: Option<BTreeMap<NodeId, usize>>,
    pub radius_by_length: Option<f64>,
    pub diameter_by_length: Option<f64>,
    pub center_by_length: Option<Vec<NodeId>>,
    pub periphery_by_length: Option<Vec<NodeId>>,
    pub eccentricity_by_length: Option<BTreeMap<NodeId, f64>>,
    pub min_length: Option<f64>,
    pub max_length: Option<f64>,
    pub edge_connectivity: usize,
}

impl TopologyReport {
    pub fn new(topology: &Topology) -> TopologyReport {
        let graph = topology.graph();
        let degrees = degrees(topology);

        let hops = eccentricities(graph, |_| 1.0).map(|e| e.map_values(|hops| hops as usize));
        let lengths = eccentricities(graph, |length| length);

        let link_lengths: Vec<f64> = topology.links().map(|link| link.length).collect();

        TopologyReport {
            node_count: topology.node_count(),
            link_count: topology.link_count(),
            mean_degree: mean(&degrees),
            degree_variance: sample_variance(&degrees),
            density: density(topology),
            radius_by_hops: hops.as_ref().map(|e| e.radius),
            diameter_by_hops: hops.as_ref().map(|e| e.diameter),
            center_by_hops: hops.as_ref().map(Eccentricities::center),
            periphery_by_hops: hops.as_ref().map(Eccentricities::periphery),
            eccentricity_by_hops: hops.map(Eccentricities::into_map),
            radius_by_length: lengths.as_ref().map(|e| e.radius),
            diameter_by_length: lengths.as_ref().map(|e| e.diameter),
            center_by_length: lengths.as_ref().map(Eccentricities::center),
            periphery_by_length: lengths.as_ref().map(Eccentricities::periphery),
            eccentricity_by_length: lengths.map(Eccentricities::into_map),
            min_length: link_lengths.iter().copied().reduce(f64::min),
            max_length: link_lengths.iter().copied().reduce(f64::max),
            edge_connectivity: edge_connectivity(topology),
        }
    }
}

/// Eccentricity per node in node order, with its extremes.
struct Eccentricities<T> {
    by_node: Vec<(NodeId, T)>,
    radius: T,
    diameter: T,
}

impl<T: Copy + PartialEq> Eccentricities<T> {
    fn map_values<U: Copy + PartialEq>(self, f: impl Fn(T) -> U) -> Eccentricities<U> {
        Eccentricities {
            by_node: self.by_node.into_iter().map(|(id, e)| (id, f(e))).collect(),
            radius: f(self.radius),
            diameter: f(self.diameter),
        }
    }

    fn nodes_at(&self, value: T) -> Vec<NodeId> {
        self.by_node
            .iter()
            .filter(|(_, e)| *e == value)
            .map(|(id, _)| id.clone())
            .collect()
    }

    fn center(&self) -> Vec<NodeId> {
        self.nodes_at(self.radius)
    }

    fn periphery(&self) -> Vec<NodeId> {
        self.nodes_at(self.diameter)
    }

    fn into_map(self) -> BTreeMap<NodeId, T> {
        self.by_node.into_iter().collect()
    }
}

pub fn degrees(topology: &Topology) -> Vec<f64> {
    let graph = topology.graph();
    graph
        .node_indices()
        .map(|index| graph.neighbors(index).count() as f64)
        .collect()
}

/// `2m / (n (n - 1))`
pub fn density(topology: &Topology) -> f64 {
    let n = topology.node_count() as f64;
    if n < 2.0 {
        return 0.0;
    }
    2.0 * topology.link_count() as f64 / (n * (n - 1.0))
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn sample_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

fn min_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

fn max_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Eccentricity of every node, `None` if the graph is disconnected or empty.
fn eccentricities<F>(graph: &EonGraph, weight: F) -> Option<Eccentricities<f64>>
where
    F: Fn(f64) -> f64,
{
    let n = graph.node_count();
    if n == 0 {
        return None;
    }

    let mut by_node = Vec::with_capacity(n);
    for index in graph.node_indices() {
        let distances = dijkstra(graph, index, None, |e| weight(e.weight().length));
        if distances.len() < n {
            return None;
        }
        by_node.push((graph[index].id.clone(), max_of(&distances.into_values().collect::<Vec<_>>())));
    }

    let values: Vec<f64> = by_node.iter().map(|(_, e)| *e).collect();
    Some(Eccentricities {
        radius: min_of(&values),
        diameter: max_of(&values),
        by_node,
    })
}

/// Minimum number of links whose removal disconnects the topology.
///
/// Computed as the minimum over all `t` of the unit-capacity max flow from a
/// fixed node to `t`. Zero for disconnected or single-node topologies.
pub fn edge_connectivity(topology: &Topology) -> usize {
    let graph = topology.graph();
    let nodes: Vec<NodeIndex> = graph.node_indices().collect();
    if nodes.len() < 2 {
        return 0;
    }

    let position: FxHashMap<NodeIndex, usize> = nodes.iter().enumerate().map(|(i, n)| (*n, i)).collect();
    let mut adjacency: Vec<Vec<usize>> = vec![vec![]; nodes.len()];
    for (i, node) in nodes.iter().enumerate() {
        for neighbor in graph.neighbors(*node) {
            adjacency[i].push(position[&neighbor]);
        }
    }

    (1..nodes.len())
        .map(|t| max_flow(&adjacency, 0, t))
        .min()
        .unwrap_or(0)
}

/// Edmonds-Karp on an undirected graph where every link has capacity 1 in
/// both directions.
fn max_flow(adjacency: &[Vec<usize>], s: usize, t: usize) -> usize {
    let mut residual: FxHashMap<(usize, usize), i32> = FxHashMap::default();
    for (u, neighbors) in adjacency.iter().enumerate() {
        for &v in neighbors {
            residual.insert((u, v), 1);
        }
    }

    let mut flow = 0;
    loop {
        let mut parent: Vec<Option<usize>> = vec![None; adjacency.len()];
        let mut queue = VecDeque::from([s]);
        parent[s] = Some(s);

        while let Some(u) = queue.pop_front() {
            if u == t {
                break;
            }
            for &v in &adjacency[u] {
                if parent[v].is_none() && residual[&(u, v)] > 0 {
                    parent[v] = Some(u);
                    queue.push_back(v);
                }
            }
        }

        if parent[t].is_none() {
            return flow;
        }

        let mut v = t;
        while v != s {
            let u = parent[v].unwrap_or(s);
            *residual.entry((u, v)).or_insert(0) -= 1;
            *residual.entry((v, u)).or_insert(0) += 1;
            v = u;
        }
        flow += 1;
    }
}
