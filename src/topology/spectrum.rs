use std::fmt::Display;

use crate::{ demand::DemandId, eon_core::SlotMask };

/// What a slot carries when it is not free.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotOccupant {
    pub demand: DemandId,
    /// Gb/s of the modulation tier chosen for the demand.
    pub data_rate: f64,
}

/// Per-link frequency slots, each either free or holding one demand.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumGrid(Vec<Option<SlotOccupant>>);

impl SpectrumGrid {
    pub fn new(slot_count: usize) -> SpectrumGrid {
        Self(vec![None; slot_count])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn reset(&mut self) {
        for s in self.0.iter_mut() {
            *s = None;
        }
    }

    pub fn get(&self, slot: usize) -> Option<&SlotOccupant> {
        self.0.get(slot).and_then(|s| s.as_ref())
    }

    pub fn mask(&self) -> SlotMask {
        let mut mask = SlotMask::new(self.0.len());
        for (index, s) in self.0.iter().enumerate() {
            mask[index] = s.is_some();
        }
        mask
    }

    pub fn are_slots_empty(&self, slot: usize, width: usize) -> bool {
        if slot + width > self.0.len() {
            return false;
        }
        self.0[slot..slot + width].iter().all(|s| s.is_none())
    }

    /// Caller checks `are_slots_empty` first.
    pub(crate) fn assign(&mut self, slot: usize, width: usize, occupant: SlotOccupant) {
        debug_assert!(self.are_slots_empty(slot, width));
        for s in &mut self.0[slot..slot + width] {
            *s = Some(occupant);
        }
    }

    pub fn holds(&self, demand: DemandId) -> bool {
        self.occupants().any(|(_, occupant)| occupant.demand == demand)
    }

    pub fn occupants(&self) -> impl Iterator<Item = (usize, &SlotOccupant)> {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(slot, s)| s.as_ref().map(|occupant| (slot, occupant)))
    }

    /// Number of occupied slots.
    pub fn occupied(&self) -> usize {
        self.0.iter().filter(|s| s.is_some()).count()
    }

    /// Sum of the rates tagged on the occupied slots.
    pub fn carried_rate(&self) -> f64 {
        self.occupants().map(|(_, occupant)| occupant.data_rate).sum()
    }
}

impl Display for SpectrumGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.mask())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_and_reset() {
        let mut grid = SpectrumGrid::new(6);
        let occupant = SlotOccupant { demand: DemandId(3), data_rate: 100.0 };
        grid.assign(1, 3, occupant);

        assert_eq!(grid.occupied(), 3);
        assert_eq!(grid.carried_rate(), 300.0);
        assert!(grid.holds(DemandId(3)));
        assert!(!grid.holds(DemandId(4)));
        assert!(grid.are_slots_empty(4, 2));
        assert!(!grid.are_slots_empty(3, 2));
        assert!(!grid.are_slots_empty(5, 2));
        assert_eq!(grid.get(2), Some(&occupant));
        assert_eq!(grid.mask().get_empty_contiguous_slots(2), Some(4));
        assert_eq!(format!("{grid}"), "▏███▏▏");

        grid.reset();
        assert_eq!(grid.occupied(), 0);
        assert!(grid.mask().is_empty());
    }
}
