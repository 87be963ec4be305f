use std::fmt::Display;

use serde_derive::Serialize;
use strum_macros::{ EnumIter, IntoStaticStr };

use crate::{ eon_core::SD, modulation::ModulationTier, topology::Route };

mod generator;
pub use generator::{ random_demands, random_demands_from_seed };

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DemandId(pub usize);

impl Display for DemandId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:5}", self.0)
    }
}

/// Why a demand could not be allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum BlockReason {
    NoRoute,
    NoModulation,
    NoSpectrum,
}

impl Display for BlockReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name: &'static str = self.into();
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemandStatus {
    Unresolved,
    Accepted,
    Blocked(BlockReason),
}

impl Display for DemandStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DemandStatus::Unresolved => write!(f, "unresolved"),
            DemandStatus::Accepted => write!(f, "accepted"),
            DemandStatus::Blocked(_) => write!(f, "blocked"),
        }
    }
}

/// Route, tier and spectrum block held by an accepted demand.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub route: Route,
    pub tier: ModulationTier,
    pub slot_start: usize,
    pub slot_count: usize,
}

impl Allocation {
    pub fn slot_range(&self) -> std::ops::Range<usize> {
        self.slot_start..self.slot_start + self.slot_count
    }
}

/// A point-to-point bandwidth request. Only the RMSA engine changes its
/// outcome; `allocation` is set exactly when the status is `Accepted`.
#[derive(Debug, Clone, PartialEq)]
pub struct Demand {
    pub id: DemandId,
    pub sd: SD,
    /// Gb/s
    pub data_rate: f64,
    status: DemandStatus,
    allocation: Option<Allocation>,
}

impl Display for Demand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{} to {}: {} Gbps>", self.sd.src, self.sd.dst, self.data_rate)
    }
}

impl Demand {
    pub fn new(id: DemandId, sd: SD, data_rate: f64) -> Self {
        Self {
            id,
            sd,
            data_rate,
            status: DemandStatus::Unresolved,
            allocation: None,
        }
    }

    pub fn status(&self) -> DemandStatus {
        self.status
    }

    pub fn allocation(&self) -> Option<&Allocation> {
        self.allocation.as_ref()
    }

    pub fn is_accepted(&self) -> bool {
        self.status == DemandStatus::Accepted
    }

    pub fn block_reason(&self) -> Option<BlockReason> {
        match self.status {
            DemandStatus::Blocked(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        self.status = DemandStatus::Unresolved;
        self.allocation = None;
    }

    pub(crate) fn accept(&mut self, allocation: Allocation) {
        self.status = DemandStatus::Accepted;
        self.allocation = Some(allocation);
    }

    pub(crate) fn block(&mut self, reason: BlockReason) {
        self.status = DemandStatus::Blocked(reason);
        self.allocation = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demand_new_test() {
        let sd = SD::new("A".into(), "B".into());
        let mut demand = Demand::new(DemandId(0), sd, 100.0);
        assert_eq!(demand.status(), DemandStatus::Unresolved);
        assert!(demand.allocation().is_none());
        assert_eq!(format!("{demand}"), "<A to B: 100 Gbps>");

        demand.block(BlockReason::NoSpectrum);
        assert_eq!(demand.block_reason(), Some(BlockReason::NoSpectrum));
        assert_eq!(format!("{}", BlockReason::NoSpectrum), "no_spectrum");

        demand.reset();
        assert_eq!(demand.status(), DemandStatus::Unresolved);
    }
}
