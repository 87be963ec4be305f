use super::parameters::EARTH_RADIUS_KM;

/// Great-circle distance in km between two `(lat, lon)` points given in
/// degrees.
///
/// Uses the haversine formula on a spherical earth.
///
/// # Example
///
/// ```
/// use eon_planner::eon_core::dist::great_circle_km;
///
/// let d = great_circle_km((0.0, 0.0), (0.0, 1.0));
/// assert!((d - 111.19).abs() < 0.1);
/// ```
///
/// # References
///
/// * [Wikipedia: Haversine formula](https://en.wikipedia.org/wiki/Haversine_formula)
pub fn great_circle_km(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (lat1, lon1) = (a.0.to_radians(), a.1.to_radians());
    let (lat2, lon2) = (b.0.to_radians(), b.1.to_radians());

    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Triangular-decreasing weights for `rates`.
///
/// The smallest rate gets weight `n`, the next `n - 1`, ..., the largest
/// `1`; the weights are normalized by `n (n + 1) / 2`. Equal rates share
/// the rank of their first occurrence in ascending order.
pub fn triangular_weights(rates: &[f64]) -> Vec<f64> {
    let n = rates.len();
    let total = (n * (n + 1)) as f64 / 2.0;

    let mut ascending: Vec<f64> = rates.to_vec();
    ascending.sort_by(|a, b| a.total_cmp(b));

    rates
        .iter()
        .map(|rate| {
            let rank = ascending.iter().position(|r| r == rate).unwrap_or(0) + 1;
            (n - rank + 1) as f64 / total
        })
        .collect()
}
