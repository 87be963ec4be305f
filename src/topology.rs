use fxhash::FxHashMap;
use petgraph::stable_graph::{ EdgeIndex, NodeIndex, StableUnGraph };

use crate::{
    eon_core::{ dist::great_circle_km, Edge, NodeId, SlotMask, SD },
    error::{ EonError, EonResult },
};

pub mod metrics;
pub mod router;
pub mod spectrum;

use router::RouteCache;
pub use spectrum::{ SlotOccupant, SpectrumGrid };

pub(crate) type EonGraph = StableUnGraph<Node, Link>;

/// A network node. Immutable once added.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub lat: f64,
    pub lon: f64,
    pub node_type: String,
}

impl Node {
    pub fn coord(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}

/// A fiber link and its spectrum.
#[derive(Debug, Clone)]
pub struct Link {
    pub source: NodeId,
    pub target: NodeId,
    /// km
    pub length: f64,
    pub capacity: f64,
    pub cost: f64,
    pub spectrum: SpectrumGrid,
}

impl Link {
    pub fn edge(&self) -> Edge {
        Edge::new(self.source.clone(), self.target.clone())
    }
}

/// A route between two nodes: node sequence, link sequence and length in km.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub nodes: Vec<NodeId>,
    pub links: Vec<Edge>,
    pub length: f64,
}

impl Route {
    pub fn new(nodes: Vec<NodeId>, length: f64) -> Route {
        let links = nodes
            .windows(2)
            .map(|pair| Edge::new(pair[0].clone(), pair[1].clone()))
            .collect();

        Route { nodes, links, length }
    }

    pub fn hops(&self) -> usize {
        self.links.len()
    }
}

/// Undirected network of geo-located nodes whose links carry spectrum grids.
///
/// Every grid has `slot_count` slots. Routes are computed lazily and cached
/// until the link set changes.
#[derive(Debug)]
pub struct Topology {
    pub name: String,
    graph: EonGraph,
    node_indices: FxHashMap<NodeId, NodeIndex>,
    slot_count: usize,
    routes: RouteCache,
}

impl Clone for Topology {
    /// Deep copy with independent grids and an empty route cache.
    fn clone(&self) -> Self {
        Topology {
            name: self.name.clone(),
            graph: self.graph.clone(),
            node_indices: self.node_indices.clone(),
            slot_count: self.slot_count,
            routes: RouteCache::default(),
        }
    }
}

impl Topology {
    pub fn new(name: &str, slot_count: usize) -> EonResult<Topology> {
        if slot_count == 0 {
            return Err(EonError::InvalidSlotCount(slot_count));
        }

        Ok(Topology {
            name: name.to_string(),
            graph: EonGraph::default(),
            node_indices: FxHashMap::default(),
            slot_count,
            routes: RouteCache::default(),
        })
    }

    pub fn add_node(&mut self, id: NodeId, lat: f64, lon: f64, node_type: &str) -> EonResult<()> {
        if self.node_indices.contains_key(&id) {
            return Err(EonError::DuplicateNode(id));
        }

        let index = self.graph.add_node(Node {
            id: id.clone(),
            lat,
            lon,
            node_type: node_type.to_string(),
        });
        self.node_indices.insert(id, index);

        Ok(())
    }

    /// Adds a link with a fresh, all-free grid. Without a `length`, the
    /// great-circle distance between the endpoints is used.
    pub fn add_link(
        &mut self,
        source: &NodeId,
        target: &NodeId,
        length: Option<f64>,
        capacity: f64,
        cost: f64
    ) -> EonResult<()> {
        let a = self.index_of(source)?;
        let b = self.index_of(target)?;

        if a == b {
            return Err(EonError::SelfLoop(source.clone()));
        }
        if self.graph.find_edge(a, b).is_some() {
            return Err(EonError::DuplicateLink(Edge::new(source.clone(), target.clone())));
        }

        let length = match length {
            Some(length) => length,
            None => great_circle_km(self.graph[a].coord(), self.graph[b].coord()),
        };

        self.graph.add_edge(a, b, Link {
            source: source.clone(),
            target: target.clone(),
            length,
            capacity,
            cost,
            spectrum: SpectrumGrid::new(self.slot_count),
        });
        self.routes.clear();

        Ok(())
    }

    pub fn remove_link(&mut self, source: &NodeId, target: &NodeId) -> EonResult<Link> {
        let edge = Edge::new(source.clone(), target.clone());
        let edge_index = self.edge_index(&edge)?;

        let link = self.graph.remove_edge(edge_index).ok_or(EonError::MissingLink(edge))?;
        self.routes.clear();

        Ok(link)
    }

    /// Frees every slot of every link.
    pub fn reset_spectrum(&mut self) {
        let edge_indices: Vec<EdgeIndex> = self.graph.edge_indices().collect();
        for edge_index in edge_indices {
            self.graph[edge_index].spectrum.reset();
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn link_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.node_indices.contains_key(id)
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.node_indices.get(id).map(|index| &self.graph[*index])
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_indices().map(move |index| &self.graph[index])
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes().map(|node| node.id.clone()).collect()
    }

    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.graph.edge_indices().map(move |index| &self.graph[index])
    }

    pub fn has_link(&self, a: &NodeId, b: &NodeId) -> bool {
        self.link(a, b).is_some()
    }

    pub fn link(&self, a: &NodeId, b: &NodeId) -> Option<&Link> {
        let edge_index = self.edge_index(&Edge::new(a.clone(), b.clone())).ok()?;
        self.graph.edge_weight(edge_index)
    }

    /// Up to `k` simple routes from `source` to `target` by ascending length.
    /// An empty result means there is no route.
    pub fn k_shortest_paths(&mut self, source: &NodeId, target: &NodeId, k: usize) -> EonResult<Vec<Route>> {
        let src = self.index_of(source)?;
        let dst = self.index_of(target)?;

        let sd = SD::new(source.clone(), target.clone());
        if let Some(routes) = self.routes.get(&sd, k) {
            return Ok(routes.to_vec());
        }

        let routes: Vec<Route> = router::k_shortest_paths(&self.graph, src, dst, k)
            .into_iter()
            .map(|(length, path)| {
                let nodes = path.into_iter().map(|index| self.graph[index].id.clone()).collect();
                Route::new(nodes, length)
            })
            .collect();

        self.routes.insert(sd, k, routes.clone());

        Ok(routes)
    }

    /// Rebuilds a route from a node sequence, summing the link lengths.
    pub fn route_from_nodes(&self, nodes: Vec<NodeId>) -> EonResult<Route> {
        let mut length = 0.0;
        for pair in nodes.windows(2) {
            let edge = Edge::new(pair[0].clone(), pair[1].clone());
            length += self.graph[self.edge_index(&edge)?].length;
        }

        Ok(Route::new(nodes, length))
    }

    /// Union of the occupancy masks of every link of `route`.
    pub fn route_mask(&self, route: &Route) -> EonResult<SlotMask> {
        let mut mask = SlotMask::new(self.slot_count);
        for edge in &route.links {
            mask |= self.graph[self.edge_index(edge)?].spectrum.mask();
        }

        Ok(mask)
    }

    /// Occupies `[slot, slot + width)` on every link of `route`.
    ///
    /// Either every link is updated or none is.
    pub fn occupy(&mut self, route: &Route, slot: usize, width: usize, occupant: SlotOccupant) -> EonResult<()> {
        let mut edge_indices = Vec::with_capacity(route.links.len());
        for edge in &route.links {
            let edge_index = self.edge_index(edge)?;
            if !self.graph[edge_index].spectrum.are_slots_empty(slot, width) {
                return Err(EonError::SlotsOccupied(edge.clone(), slot));
            }
            edge_indices.push(edge_index);
        }

        for edge_index in edge_indices {
            self.graph[edge_index].spectrum.assign(slot, width, occupant);
        }

        Ok(())
    }

    pub(crate) fn graph(&self) -> &EonGraph {
        &self.graph
    }

    fn index_of(&self, id: &NodeId) -> EonResult<NodeIndex> {
        self.node_indices
            .get(id)
            .copied()
            .ok_or_else(|| EonError::UnknownNode(id.clone()))
    }

    fn edge_index(&self, edge: &Edge) -> EonResult<EdgeIndex> {
        let a = self.index_of(&edge.src)?;
        let b = self.index_of(&edge.dst)?;
        self.graph
            .find_edge(a, b)
            .ok_or_else(|| EonError::MissingLink(edge.clone()))
    }

    /// Links whose grid holds `demand`, derived from the spectrum itself.
    pub fn links_of_demand(&self, demand: crate::demand::DemandId) -> Vec<Edge> {
        self.links()
            .filter(|link| link.spectrum.holds(demand))
            .map(Link::edge)
            .collect()
    }
}
