/// Frequency slots per link when the configuration does not say otherwise.
pub const DEFAULT_SLOT: usize = 320;
/// Candidate routes tried per demand.
pub const DEFAULT_K: usize = 2;
/// Offered demand rates in Gb/s.
pub const DEFAULT_DATA_RATES: [f64; 5] = [40.0, 100.0, 200.0, 400.0, 1000.0];

/// Mean earth radius in km.
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

// For progress bars
pub const PB_TEMPLATES: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta_precise}) \t{msg}";
pub const PB_CHARS: &str = "#9876543210>-";
