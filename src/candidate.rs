//! Enumeration of augmented topologies: the input topology plus `n` links
//! picked from the node pairs it does not connect yet.

use itertools::Itertools;

use crate::{
    eon_core::{ dist::great_circle_km, NodeId },
    error::EonResult,
    topology::{ metrics::edge_connectivity, Topology },
};

/// A link that could be added, with its great-circle length.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateLink {
    pub source: NodeId,
    pub target: NodeId,
    pub length: f64,
}

/// Every unlinked node pair no longer than `max_length` km (all of them
/// without a limit), in node insertion order.
pub fn candidate_links(topology: &Topology, max_length: Option<f64>) -> Vec<CandidateLink> {
    let nodes: Vec<_> = topology.nodes().collect();

    nodes
        .iter()
        .tuple_combinations()
        .filter(|(a, b)| !topology.has_link(&a.id, &b.id))
        .map(|(a, b)| CandidateLink {
            source: a.id.clone(),
            target: b.id.clone(),
            length: great_circle_km(a.coord(), b.coord()),
        })
        .filter(|link| max_length.map_or(true, |max| link.length <= max))
        .collect()
}

/// All `n`-element subsets of `links`, lazily.
pub fn candidate_link_sets(links: &[CandidateLink], n: usize) -> impl Iterator<Item = Vec<CandidateLink>> + '_ {
    links.iter().cloned().combinations(n)
}

/// Hamiltonian cycles over the nodes of `topology` whose every hop is within
/// `max_length`, as link sets.
///
/// The first node is fixed and mirror images are skipped, so each undirected
/// cycle shows up once. Fewer than three nodes have no cycle.
pub fn cycle_link_sets(topology: &Topology, max_length: Option<f64>) -> impl Iterator<Item = Vec<CandidateLink>> {
    let nodes: Vec<(NodeId, (f64, f64))> = topology.nodes().map(|node| (node.id.clone(), node.coord())).collect();
    let rest = if nodes.len() < 3 { 0 } else { nodes.len() - 1 };

    (1..=rest)
        .permutations(rest)
        .filter(|order| order.first() < order.last())
        .filter_map(move |order| {
            let cycle: Vec<usize> = std::iter::once(0).chain(order).chain(std::iter::once(0)).collect();

            let mut links = Vec::with_capacity(cycle.len() - 1);
            for pair in cycle.windows(2) {
                let (a, b) = (&nodes[pair[0]], &nodes[pair[1]]);
                let length = great_circle_km(a.1, b.1);
                if max_length.map_or(false, |max| length > max) {
                    return None;
                }
                links.push(CandidateLink {
                    source: a.0.clone(),
                    target: b.0.clone(),
                    length,
                });
            }

            Some(links)
        })
}

/// Inclusive edge connectivity range an augmented topology must fall in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectivityBounds {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl ConnectivityBounds {
    pub fn at_least(min: usize) -> ConnectivityBounds {
        ConnectivityBounds { min: Some(min), max: None }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn admits(&self, connectivity: usize) -> bool {
        self.min.map_or(true, |min| connectivity >= min) && self.max.map_or(true, |max| connectivity <= max)
    }
}

/// Lazily clones `topology` once per link set and adds the set's links.
///
/// Results whose edge connectivity is outside `bounds` are skipped. Every
/// yielded topology starts with an empty spectrum and an empty route cache.
pub fn augmented_topologies<'a, I>(
    topology: &'a Topology,
    link_sets: I,
    capacity: f64,
    cost: f64,
    bounds: ConnectivityBounds
) -> impl Iterator<Item = EonResult<Topology>> + 'a
where
    I: IntoIterator<Item = Vec<CandidateLink>>,
    I::IntoIter: 'a,
{
    link_sets.into_iter().filter_map(move |links| {
        let augmented = augment(topology, &links, capacity, cost);

        match augmented {
            Ok(augmented) => {
                let survives = bounds.is_unbounded() || bounds.admits(edge_connectivity(&augmented));
                survives.then_some(Ok(augmented))
            }
            Err(err) => Some(Err(err)),
        }
    })
}

fn augment(topology: &Topology, links: &[CandidateLink], capacity: f64, cost: f64) -> EonResult<Topology> {
    let mut augmented = topology.clone();
    for link in links {
        augmented.add_link(&link.source, &link.target, Some(link.length), capacity, cost)?;
    }
    augmented.reset_spectrum();
    augmented.name = format!("EON with {} links", augmented.link_count());

    Ok(augmented)
}
