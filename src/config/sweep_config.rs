use serde_derive::{ Deserialize, Serialize };

use crate::candidate::ConnectivityBounds;

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
/// Search over augmented topologies
pub struct SweepConfig {
    pub enabled: bool,
    /// Fewest links added to a seed topology
    pub min_links: usize,
    /// Most links added, 0: every missing link
    pub max_links: usize,
    /// km, candidate links longer than this are ignored
    pub max_length: Option<f64>,
    pub min_edge_connectivity: Option<usize>,
    pub max_edge_connectivity: Option<usize>,
    pub link_capacity: f64,
    pub link_cost: f64,
    /// 0: num_cpus
    pub threads: usize,
    /// Seed with Hamiltonian cycles instead of the loaded topology
    pub from_cycle: bool,
    pub max_cycles: usize,
    /// Output directory of an interrupted run to continue, empty: fresh run
    pub resume_dir: String,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            min_links: 0,
            max_links: 0,
            max_length: None,
            min_edge_connectivity: None,
            max_edge_connectivity: None,
            link_capacity: 1.0,
            link_cost: 1.0,
            threads: 0,
            from_cycle: false,
            max_cycles: 1,
            resume_dir: String::new(),
        }
    }
}

impl SweepConfig {
    pub fn connectivity_bounds(&self) -> ConnectivityBounds {
        ConnectivityBounds {
            min: self.min_edge_connectivity,
            max: self.max_edge_connectivity,
        }
    }
}
