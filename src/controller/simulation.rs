use serde_derive::Serialize;

use crate::{
    config::debug_config::DebugConfig,
    debugger,
    demand::{ BlockReason, Demand, DemandStatus },
    error::EonResult,
    modulation::ModulationCatalog,
    topology::Topology,
};

use super::rmsa;

/// Outcome counters of one simulation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimulationSummary {
    pub demands: usize,
    pub unresolved: usize,
    pub accepted: usize,
    pub blocked: usize,
    pub blocked_no_route: usize,
    pub blocked_no_modulation: usize,
    pub blocked_no_spectrum: usize,
    /// Gb/s carried by the accepted demands
    pub total_data_rate: f64,
    pub unresolved_rate: Option<f64>,
    pub success_rate: Option<f64>,
    pub block_rate: Option<f64>,
}

impl SimulationSummary {
    pub fn from_demands(demand_list: &[Demand]) -> SimulationSummary {
        let mut summary = SimulationSummary {
            demands: demand_list.len(),
            ..Default::default()
        };

        for demand in demand_list {
            match demand.status() {
                DemandStatus::Unresolved => summary.unresolved += 1,
                DemandStatus::Accepted => {
                    summary.accepted += 1;
                    summary.total_data_rate += demand.data_rate;
                }
                DemandStatus::Blocked(reason) => {
                    summary.blocked += 1;
                    match reason {
                        BlockReason::NoRoute => summary.blocked_no_route += 1,
                        BlockReason::NoModulation => summary.blocked_no_modulation += 1,
                        BlockReason::NoSpectrum => summary.blocked_no_spectrum += 1,
                    }
                }
            }
        }

        if summary.demands > 0 {
            let total = summary.demands as f64;
            summary.unresolved_rate = Some(summary.unresolved as f64 / total);
            summary.success_rate = Some(summary.accepted as f64 / total);
            summary.block_rate = Some(summary.blocked as f64 / total);
        }

        summary
    }

    /// blocked / total, zero for an empty demand list.
    pub fn blocking_ratio(&self) -> f64 {
        self.block_rate.unwrap_or(0.0)
    }

    pub fn blocked_by(&self, reason: BlockReason) -> usize {
        match reason {
            BlockReason::NoRoute => self.blocked_no_route,
            BlockReason::NoModulation => self.blocked_no_modulation,
            BlockReason::NoSpectrum => self.blocked_no_spectrum,
        }
    }
}

/// Resets the spectrum and the demands, then allocates every demand in the
/// given order. Earlier demands see an emptier spectrum.
pub fn simulate(
    topology: &mut Topology,
    demand_list: &mut [Demand],
    catalog: &ModulationCatalog,
    k: usize
) -> EonResult<SimulationSummary> {
    simulate_logged(topology, demand_list, catalog, k, &DebugConfig::default())
}

pub fn simulate_logged(
    topology: &mut Topology,
    demand_list: &mut [Demand],
    catalog: &ModulationCatalog,
    k: usize,
    debug: &DebugConfig
) -> EonResult<SimulationSummary> {
    topology.reset_spectrum();
    for demand in demand_list.iter_mut() {
        demand.reset();
    }

    for demand in demand_list.iter_mut() {
        match rmsa::allocate(topology, demand, catalog, k)? {
            DemandStatus::Accepted => debugger::log_demand_assign(debug, demand),
            _ => debugger::log_demand_block(debug, demand),
        }
    }

    debugger::log_spectrum(debug, topology);

    Ok(SimulationSummary::from_demands(demand_list))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ demand::DemandId, eon_core::SD, modulation::ModulationTier };

    #[test]
    fn summary_counts_every_status() {
        let sd = SD::new("A".into(), "B".into());
        let mut demand_list: Vec<Demand> = (0..4).map(|i| Demand::new(DemandId(i), sd.clone(), 100.0)).collect();
        demand_list[1].block(BlockReason::NoRoute);
        demand_list[2].block(BlockReason::NoSpectrum);
        demand_list[3].block(BlockReason::NoSpectrum);

        let summary = SimulationSummary::from_demands(&demand_list);
        assert_eq!(summary.unresolved, 1);
        assert_eq!(summary.blocked, 3);
        assert_eq!(summary.blocked_by(BlockReason::NoSpectrum), 2);
        assert_eq!(summary.blocked_by(BlockReason::NoModulation), 0);
        assert_eq!(summary.blocking_ratio(), 0.75);
        assert_eq!(summary.total_data_rate, 0.0);

        let empty = SimulationSummary::from_demands(&[]);
        assert_eq!(empty.block_rate, None);
        assert_eq!(empty.blocking_ratio(), 0.0);
    }

    #[test]
    fn simulate_resets_previous_state() {
        let mut topology = Topology::new("pair", 1).unwrap();
        topology.add_node("A".into(), 0.0, 0.0, "core").unwrap();
        topology.add_node("B".into(), 0.0, 0.0, "core").unwrap();
        topology.add_link(&"A".into(), &"B".into(), Some(10.0), 1.0, 1.0).unwrap();
        let catalog = ModulationCatalog::new(vec![ModulationTier::new("QPSK", 100.0, 100.0)]).unwrap();

        let sd = SD::new("A".into(), "B".into());
        let mut demand_list = vec![Demand::new(DemandId(0), sd, 100.0)];

        let first = simulate(&mut topology, &mut demand_list, &catalog, 2).unwrap();
        let second = simulate(&mut topology, &mut demand_list, &catalog, 2).unwrap();
        assert_eq!(first.accepted, 1);
        assert_eq!(first, second);
        assert_eq!(first.total_data_rate, 100.0);
    }
}
