use serde::Serialize;

use crate::portfolio::Portfolio;
use crate::storm::Storm;
use crate::types::PropertyId;
use crate::vulnerability::{VulnerabilityParams, damage_ratio};

/// Default footprint coefficient: affected radius in km per mph of peak wind.
pub const DEFAULT_FOOTPRINT_COEFF: f64 = 0.5;

/// Affected radius of a storm: `wind × coeff` km. A linear proxy for
/// footprint size; everything inside the radius sees the full peak wind,
/// with no decay toward the edge.
pub fn footprint_radius_km(wind_mph: f64, coeff_km_per_mph: f64) -> f64 {
    wind_mph * coeff_km_per_mph
}

/// Per-property outcome of one storm, untouched properties included at
/// ratio 0. This is the record the map/heatmap shell renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyImpact {
    pub id: PropertyId,
    pub lat: f64,
    pub lon: f64,
    pub damage_ratio: f64,
    pub loss: f64,
}

/// One storm applied to one portfolio.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StormLoss {
    pub storm: Storm,
    pub total: f64,
    pub impacts: Vec<PropertyImpact>,
}

/// Total portfolio loss for one storm. The hot path of the simulation:
/// no allocation, one pass over the (read-only) portfolio.
pub fn storm_loss_total(
    portfolio: &Portfolio,
    storm: &Storm,
    vulnerability: &VulnerabilityParams,
    footprint_coeff: f64,
) -> f64 {
    let radius_km = footprint_radius_km(storm.wind_mph, footprint_coeff);
    portfolio
        .properties()
        .iter()
        .filter(|p| p.location.distance_km(&storm.center) <= radius_km)
        .map(|p| damage_ratio(storm.wind_mph, p.construction, vulnerability) * p.insured_value)
        .sum()
}

/// Full per-property detail for one storm, for the presentation layer.
/// Same arithmetic as [storm_loss_total]; deterministic given its inputs.
pub fn storm_impacts(
    portfolio: &Portfolio,
    storm: &Storm,
    vulnerability: &VulnerabilityParams,
    footprint_coeff: f64,
) -> StormLoss {
    let radius_km = footprint_radius_km(storm.wind_mph, footprint_coeff);
    let mut total = 0.0;
    let impacts = portfolio
        .properties()
        .iter()
        .map(|p| {
            let within = p.location.distance_km(&storm.center) <= radius_km;
            let ratio = if within {
                damage_ratio(storm.wind_mph, p.construction, vulnerability)
            } else {
                0.0
            };
            let loss = ratio * p.insured_value;
            total += loss;
            PropertyImpact {
                id: p.id,
                lat: p.location.lat,
                lon: p.location.lon,
                damage_ratio: ratio,
                loss,
            }
        })
        .collect();
    StormLoss { storm: *storm, total, impacts }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::{Construction, Property};
    use crate::types::LatLon;

    fn portfolio_of(props: Vec<(f64, Construction, f64, f64)>) -> Portfolio {
        let properties = props
            .into_iter()
            .enumerate()
            .map(|(i, (value, construction, lat, lon))| Property {
                id: PropertyId(i as u64),
                name: format!("p{i}"),
                insured_value: value,
                construction,
                location: LatLon::new(lat, lon),
            })
            .collect();
        Portfolio::new(properties).unwrap()
    }

    #[test]
    fn radius_is_half_the_wind_speed_by_default() {
        assert_eq!(footprint_radius_km(120.0, DEFAULT_FOOTPRINT_COEFF), 60.0);
    }

    #[test]
    fn property_at_center_always_hit() {
        let portfolio = portfolio_of(vec![(500_000.0, Construction::Wood, 26.0, -81.0)]);
        let storm = Storm { wind_mph: 74.0, center: LatLon::new(26.0, -81.0) };
        let total = storm_loss_total(
            &portfolio,
            &storm,
            &VulnerabilityParams::default(),
            DEFAULT_FOOTPRINT_COEFF,
        );
        assert!(total > 0.0, "distance 0 <= radius, so the property must incur loss");
    }

    #[test]
    fn property_beyond_radius_loses_exactly_zero() {
        // 100 mph storm → 50 km radius. One degree of latitude is 111 km.
        let portfolio = portfolio_of(vec![(500_000.0, Construction::Wood, 27.0, -81.0)]);
        let storm = Storm { wind_mph: 100.0, center: LatLon::new(26.0, -81.0) };
        let result = storm_impacts(
            &portfolio,
            &storm,
            &VulnerabilityParams::default(),
            DEFAULT_FOOTPRINT_COEFF,
        );
        assert_eq!(result.total, 0.0);
        assert_eq!(result.impacts[0].damage_ratio, 0.0);
        assert_eq!(result.impacts[0].loss, 0.0);
    }

    #[test]
    fn covering_storm_loss_is_count_times_value_times_ratio() {
        // Cluster of 4 identical concrete properties around the center; a
        // 150 mph storm (75 km radius) covers all of them.
        let n = 4;
        let value = 1_000_000.0;
        let portfolio = portfolio_of(
            (0..n).map(|i| (value, Construction::Concrete, 26.0 + 0.01 * i as f64, -81.0)).collect(),
        );
        let storm = Storm { wind_mph: 150.0, center: LatLon::new(26.0, -81.0) };
        let total = storm_loss_total(
            &portfolio,
            &storm,
            &VulnerabilityParams::default(),
            DEFAULT_FOOTPRINT_COEFF,
        );
        let expected = n as f64 * value * 0.75;
        assert!((total - expected).abs() < 1e-6, "total {total} != {expected}");
    }

    #[test]
    fn saturated_concrete_center_hit_is_three_quarters_of_value() {
        let value = 800_000.0;
        let portfolio = portfolio_of(vec![(value, Construction::Concrete, 26.0, -81.0)]);
        let storm = Storm { wind_mph: 150.0, center: LatLon::new(26.0, -81.0) };
        let result = storm_impacts(
            &portfolio,
            &storm,
            &VulnerabilityParams::default(),
            DEFAULT_FOOTPRINT_COEFF,
        );
        assert!((result.impacts[0].damage_ratio - 0.75).abs() < 1e-12);
        assert!((result.total - 0.75 * value).abs() < 1e-6);
    }

    #[test]
    fn impacts_cover_every_property_in_order() {
        let portfolio = portfolio_of(vec![
            (500_000.0, Construction::Wood, 26.0, -81.0),
            (750_000.0, Construction::Brick, 30.0, -84.0),
        ]);
        let storm = Storm { wind_mph: 100.0, center: LatLon::new(26.0, -81.0) };
        let result = storm_impacts(
            &portfolio,
            &storm,
            &VulnerabilityParams::default(),
            DEFAULT_FOOTPRINT_COEFF,
        );
        assert_eq!(result.impacts.len(), portfolio.len());
        assert_eq!(result.impacts[0].id, PropertyId(0));
        assert_eq!(result.impacts[1].id, PropertyId(1));
        assert!(result.impacts[0].damage_ratio > 0.0);
        assert_eq!(result.impacts[1].damage_ratio, 0.0, "far property recorded at ratio 0");
    }

    #[test]
    fn total_paths_agree() {
        let portfolio = portfolio_of(vec![
            (500_000.0, Construction::Wood, 25.76, -80.19),
            (750_000.0, Construction::Brick, 27.94, -82.45),
            (1_000_000.0, Construction::Concrete, 30.43, -84.28),
        ]);
        let storm = Storm { wind_mph: 130.0, center: LatLon::new(27.0, -82.0) };
        let params = VulnerabilityParams::default();
        let lean = storm_loss_total(&portfolio, &storm, &params, DEFAULT_FOOTPRINT_COEFF);
        let full = storm_impacts(&portfolio, &storm, &params, DEFAULT_FOOTPRINT_COEFF);
        assert!((lean - full.total).abs() < 1e-9);
        let impact_sum: f64 = full.impacts.iter().map(|i| i.loss).sum();
        assert!((full.total - impact_sum).abs() < 1e-9);
    }

    #[test]
    fn zero_value_property_is_hit_but_contributes_nothing() {
        let portfolio = portfolio_of(vec![(0.0, Construction::Wood, 26.0, -81.0)]);
        let storm = Storm { wind_mph: 120.0, center: LatLon::new(26.0, -81.0) };
        let result = storm_impacts(
            &portfolio,
            &storm,
            &VulnerabilityParams::default(),
            DEFAULT_FOOTPRINT_COEFF,
        );
        assert!(result.impacts[0].damage_ratio > 0.0);
        assert_eq!(result.total, 0.0);
    }
}
