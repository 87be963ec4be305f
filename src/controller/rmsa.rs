//! Routing, modulation and spectrum assignment for a single demand.

use crate::{
    demand::{ Allocation, BlockReason, Demand, DemandStatus },
    error::EonResult,
    modulation::{ ModulationCatalog, ModulationTier },
    topology::{ Route, SlotOccupant, Topology },
};

/// Where a demand fits: what `assign` commits to the spectrum.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentInstruction {
    pub route: Route,
    pub tier: ModulationTier,
    pub slot_head: usize,
    pub slot_width: usize,
}

/// First-fit search over the `k` shortest routes of the demand.
///
/// Returns the reason of the last failed attempt when nothing fits. Does not
/// touch the spectrum.
pub fn search(
    topology: &mut Topology,
    demand: &Demand,
    catalog: &ModulationCatalog,
    k: usize
) -> EonResult<Result<AssignmentInstruction, BlockReason>> {
    let route_cands = topology.k_shortest_paths(&demand.sd.src, &demand.sd.dst, k)?;

    let mut reason = BlockReason::NoRoute;

    for route_cand in route_cands.into_iter().take(k) {
        let tier = match catalog.best_for(route_cand.length) {
            Some(tier) => tier,
            None => {
                reason = BlockReason::NoModulation;
                continue;
            }
        };

        let slot_width = tier.slots_for(demand.data_rate);
        let route_mask = topology.route_mask(&route_cand)?;

        match route_mask.get_empty_contiguous_slots(slot_width) {
            Some(slot_head) => {
                return Ok(Ok(AssignmentInstruction {
                    route: route_cand,
                    tier: tier.clone(),
                    slot_head,
                    slot_width,
                }));
            }
            None => reason = BlockReason::NoSpectrum,
        }
    }

    Ok(Err(reason))
}

/// Commits an instruction found by `search` and records it on the demand.
pub fn assign(topology: &mut Topology, demand: &mut Demand, instruction: AssignmentInstruction) -> EonResult<()> {
    let occupant = SlotOccupant {
        demand: demand.id,
        data_rate: instruction.tier.data_rate,
    };
    topology.occupy(&instruction.route, instruction.slot_head, instruction.slot_width, occupant)?;

    demand.accept(Allocation {
        route: instruction.route,
        tier: instruction.tier,
        slot_start: instruction.slot_head,
        slot_count: instruction.slot_width,
    });

    Ok(())
}

/// Allocates `demand` on `topology` or blocks it.
///
/// Blocking is an outcome, not an error; `Err` means the topology and its
/// routes disagree.
pub fn allocate(
    topology: &mut Topology,
    demand: &mut Demand,
    catalog: &ModulationCatalog,
    k: usize
) -> EonResult<DemandStatus> {
    demand.reset();

    match search(topology, demand, catalog, k)? {
        Ok(instruction) => assign(topology, demand, instruction)?,
        Err(reason) => demand.block(reason),
    }

    Ok(demand.status())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ demand::DemandId, eon_core::SD };

    /// A - B - C with 80 km spans.
    fn line(slots: usize) -> Topology {
        let mut topology = Topology::new("line", slots).unwrap();
        for id in ["A", "B", "C"] {
            topology.add_node(id.into(), 0.0, 0.0, "core").unwrap();
        }
        topology.add_link(&"A".into(), &"B".into(), Some(80.0), 1.0, 1.0).unwrap();
        topology.add_link(&"B".into(), &"C".into(), Some(80.0), 1.0, 1.0).unwrap();
        topology
    }

    fn demand(id: usize, src: &str, dst: &str, rate: f64) -> Demand {
        Demand::new(DemandId(id), SD::new(src.into(), dst.into()), rate)
    }

    #[test]
    fn multi_slot_block_on_every_link() {
        let mut topology = line(8);
        let catalog = ModulationCatalog::new(vec![ModulationTier::new("QPSK", 25.0, 1000.0)]).unwrap();

        let mut d = demand(0, "A", "C", 100.0);
        assert_eq!(allocate(&mut topology, &mut d, &catalog, 2).unwrap(), DemandStatus::Accepted);

        let allocation = d.allocation().unwrap();
        assert_eq!(allocation.slot_range(), 0..4);
        assert_eq!(allocation.route.hops(), 2);

        for (a, b) in [("A", "B"), ("B", "C")] {
            let grid = &topology.link(&a.into(), &b.into()).unwrap().spectrum;
            assert_eq!(grid.occupied(), 4);
            assert_eq!(grid.get(3).unwrap().data_rate, 25.0);
        }

        let mut e = demand(1, "B", "C", 50.0);
        allocate(&mut topology, &mut e, &catalog, 2).unwrap();
        assert_eq!(e.allocation().unwrap().slot_range(), 4..6);
    }

    #[test]
    fn blocked_demand_leaves_no_trace() {
        let mut topology = line(2);
        let catalog = ModulationCatalog::new(vec![ModulationTier::new("QPSK", 25.0, 1000.0)]).unwrap();

        let mut d = demand(0, "A", "C", 100.0);
        assert_eq!(
            allocate(&mut topology, &mut d, &catalog, 2).unwrap(),
            DemandStatus::Blocked(BlockReason::NoSpectrum)
        );
        assert!(d.allocation().is_none());
        assert!(topology.links().all(|link| link.spectrum.occupied() == 0));
    }

    #[test]
    fn falls_back_to_the_second_route() {
        // A - B - C plus a long A - C shortcut: the long one is tried second.
        let mut topology = line(1);
        topology.add_link(&"A".into(), &"C".into(), Some(300.0), 1.0, 1.0).unwrap();
        let catalog = ModulationCatalog::new(vec![ModulationTier::new("QPSK", 100.0, 1000.0)]).unwrap();

        let mut first = demand(0, "A", "B", 100.0);
        allocate(&mut topology, &mut first, &catalog, 2).unwrap();

        let mut second = demand(1, "A", "C", 100.0);
        assert_eq!(allocate(&mut topology, &mut second, &catalog, 2).unwrap(), DemandStatus::Accepted);
        assert_eq!(second.allocation().unwrap().route.length, 300.0);

        // With k = 1 the alternate route is never tried.
        let mut third = demand(2, "C", "B", 100.0);
        let mut fourth = demand(3, "A", "C", 100.0);
        topology.reset_spectrum();
        allocate(&mut topology, &mut third, &catalog, 1).unwrap();
        assert_eq!(
            allocate(&mut topology, &mut fourth, &catalog, 1).unwrap(),
            DemandStatus::Blocked(BlockReason::NoSpectrum)
        );
    }

    #[test]
    fn unreachable_pair_is_no_route() {
        let mut topology = line(4);
        topology.add_node("D".into(), 0.0, 0.0, "core").unwrap();
        let catalog = ModulationCatalog::new(vec![ModulationTier::new("QPSK", 100.0, 1000.0)]).unwrap();

        let mut d = demand(0, "A", "D", 100.0);
        assert_eq!(
            allocate(&mut topology, &mut d, &catalog, 3).unwrap(),
            DemandStatus::Blocked(BlockReason::NoRoute)
        );
    }

    #[test]
    fn tier_is_chosen_per_route() {
        // Short route gets the fast tier, long one the slow tier.
        let mut topology = line(16);
        let catalog = ModulationCatalog::new(vec![
            ModulationTier::new("BPSK", 12.5, 4000.0),
            ModulationTier::new("16QAM", 50.0, 100.0),
        ]).unwrap();

        let mut short = demand(0, "A", "B", 100.0);
        allocate(&mut topology, &mut short, &catalog, 1).unwrap();
        assert_eq!(short.allocation().unwrap().tier.name, "16QAM");
        assert_eq!(short.allocation().unwrap().slot_count, 2);

        let mut long = demand(1, "A", "C", 100.0);
        allocate(&mut topology, &mut long, &catalog, 1).unwrap();
        assert_eq!(long.allocation().unwrap().tier.name, "BPSK");
        assert_eq!(long.allocation().unwrap().slot_range(), 2..10);
    }
}
