use std::fmt::Display;

use serde_derive::{ Deserialize, Serialize };

use crate::error::{ EonError, EonResult };

/// One modulation level: the rate it carries per slot and how far it reaches.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ModulationTier {
    pub name: String,
    /// Gb/s per slot
    pub data_rate: f64,
    pub power_consumption: f64,
    /// km
    pub reach: f64,
    pub spectral_efficiency: f64,
}

impl Display for ModulationTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}>", self.name)
    }
}

impl ModulationTier {
    pub fn new(name: &str, data_rate: f64, reach: f64) -> ModulationTier {
        ModulationTier {
            name: name.to_string(),
            data_rate,
            power_consumption: 0.0,
            reach,
            spectral_efficiency: 0.0,
        }
    }

    /// Slots needed to carry `demand_rate`, never less than one.
    pub fn slots_for(&self, demand_rate: f64) -> usize {
        ((demand_rate / self.data_rate).ceil() as usize).max(1)
    }
}

/// Ordered, immutable set of modulation tiers.
#[derive(Debug, Clone, PartialEq)]
pub struct ModulationCatalog {
    tiers: Vec<ModulationTier>,
}

impl ModulationCatalog {
    pub fn new(tiers: Vec<ModulationTier>) -> EonResult<ModulationCatalog> {
        if tiers.is_empty() {
            return Err(EonError::EmptyCatalog);
        }
        Ok(ModulationCatalog { tiers })
    }

    pub fn tiers(&self) -> &[ModulationTier] {
        &self.tiers
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// The tier with the highest data rate whose reach covers `length`.
    /// On equal rates the tier listed first wins.
    pub fn best_for(&self, length: f64) -> Option<&ModulationTier> {
        let mut best: Option<&ModulationTier> = None;
        for tier in self.tiers.iter().filter(|tier| tier.reach >= length) {
            match best {
                Some(current) if tier.data_rate <= current.data_rate => (),
                _ => best = Some(tier),
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ModulationCatalog {
        ModulationCatalog::new(vec![
            ModulationTier::new("BPSK", 12.5, 4000.0),
            ModulationTier::new("QPSK", 25.0, 2000.0),
            ModulationTier::new("8QAM", 37.5, 1000.0),
            ModulationTier::new("16QAM", 50.0, 500.0),
        ]).unwrap()
    }

    #[test]
    fn best_tier_is_the_fastest_within_reach() {
        let catalog = catalog();
        assert_eq!(catalog.best_for(100.0).unwrap().name, "16QAM");
        assert_eq!(catalog.best_for(500.0).unwrap().name, "16QAM");
        assert_eq!(catalog.best_for(500.1).unwrap().name, "8QAM");
        assert_eq!(catalog.best_for(3999.0).unwrap().name, "BPSK");
        assert!(catalog.best_for(4000.1).is_none());
    }

    #[test]
    fn ties_go_to_catalog_order() {
        let catalog = ModulationCatalog::new(vec![
            ModulationTier::new("first", 100.0, 300.0),
            ModulationTier::new("second", 100.0, 900.0),
        ]).unwrap();
        assert_eq!(catalog.best_for(200.0).unwrap().name, "first");
        assert_eq!(catalog.best_for(600.0).unwrap().name, "second");
    }

    #[test]
    fn slot_count_rounds_up() {
        let tier = ModulationTier::new("QPSK", 25.0, 2000.0);
        assert_eq!(tier.slots_for(25.0), 1);
        assert_eq!(tier.slots_for(40.0), 2);
        assert_eq!(tier.slots_for(100.0), 4);
        assert_eq!(tier.slots_for(0.0), 1);
    }

    #[test]
    fn empty_catalog_is_rejected() {
        assert!(matches!(ModulationCatalog::new(vec![]), Err(EonError::EmptyCatalog)));
    }
}
