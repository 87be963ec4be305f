use itertools::Itertools;
use rand::{ distributions::{ Distribution, WeightedIndex }, seq::SliceRandom, SeedableRng };
use rand_chacha::ChaCha8Rng;

use crate::{ eon_core::{ dist::triangular_weights, SD }, topology::Topology };

use super::{ Demand, DemandId };

/// One demand per unordered pair of distinct nodes, with a rate drawn from
/// `possible_rates` (lower rates more likely), in a shuffled order.
///
/// Ids follow the pair enumeration order, before shuffling. The same `rng`
/// state always yields the same sequence for the same topology.
pub fn random_demands(topology: &Topology, possible_rates: &[f64], rng: &mut ChaCha8Rng) -> Vec<Demand> {
    let weights = triangular_weights(possible_rates);
    let distribution = match WeightedIndex::new(&weights) {
        Ok(distribution) => distribution,
        Err(_) => return vec![],
    };

    let mut demand_list: Vec<Demand> = topology
        .node_ids()
        .into_iter()
        .tuple_combinations()
        .enumerate()
        .map(|(index, (src, dst))| {
            let data_rate = possible_rates[distribution.sample(rng)];
            Demand::new(DemandId(index), SD::new(src, dst), data_rate)
        })
        .collect();

    demand_list.shuffle(rng);

    demand_list
}

pub fn random_demands_from_seed(topology: &Topology, possible_rates: &[f64], seed: u64) -> Vec<Demand> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    random_demands(topology, possible_rates, &mut rng)
}
