//! Procedural city layout types

use serde::{Deserialize, Serialize};

use crate::errors::{ValidationResult, ensure_in_range};

/// Tallest building a request may ask for
pub const MAX_BUILDING_HEIGHT: i64 = 1000;

/// Body of `POST /api/city/generate`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CityParams {
    pub seed: i64,
    pub grid_size: i64,
    pub max_height: i64,
}

impl CityParams {
    pub fn validate(&self, max_grid_size: u32) -> ValidationResult<()> {
        ensure_in_range("grid_size", self.grid_size, 1..=max_grid_size as i64)?;
        ensure_in_range("max_height", self.max_height, 2..=MAX_BUILDING_HEIGHT)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildingKind {
    Residential,
    Commercial,
    Industrial,
    Green,
}

impl BuildingKind {
    pub const ALL: [BuildingKind; 4] = [
        BuildingKind::Residential,
        BuildingKind::Commercial,
        BuildingKind::Industrial,
        BuildingKind::Green,
    ];

    /// Sampling weight of each kind, aligned with `ALL`
    pub const WEIGHTS: [f64; 4] = [0.4, 0.3, 0.2, 0.1];

    /// Entry of `WEIGHTS` for this kind
    pub fn weight(&self) -> f64 {
        Self::WEIGHTS[*self as usize]
    }

    pub fn is_green(&self) -> bool {
        matches!(self, BuildingKind::Green)
    }
}

/// One grid cell
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub x: u32,
    pub z: u32,
    pub height: u32,
    #[serde(rename = "type")]
    pub kind: BuildingKind,
    pub solar_coverage: f64,
    pub energy_production: f64,
}

/// Aggregates over the whole grid; ratios are fractions in [0, 1]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CityStatistics {
    pub total_buildings: u32,
    pub green_spaces: u32,
    pub green_ratio: f64,
    pub total_energy_production: f64,
    pub avg_solar_coverage: f64,
    pub sustainability_score: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SustainableFeatures {
    pub solar_panels: String,
    pub green_buildings: String,
    pub energy_efficiency: String,
    pub carbon_neutral: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CityLayout {
    pub buildings: Vec<Building>,
    pub statistics: CityStatistics,
    pub sustainable_features: SustainableFeatures,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ValidationError;

    #[test]
    fn test_grid_size_bounds() {
        let params = CityParams { seed: 1, grid_size: 0, max_height: 10 };
        assert_eq!(params.validate(100).unwrap_err().field(), "grid_size");

        let params = CityParams { seed: 1, grid_size: 101, max_height: 10 };
        assert!(matches!(params.validate(100), Err(ValidationError::OutOfRange { field: "grid_size", .. })));

        let params = CityParams { seed: 1, grid_size: 1, max_height: 2 };
        assert!(params.validate(100).is_ok());
    }

    #[test]
    fn test_max_height_floor() {
        let params = CityParams { seed: 1, grid_size: 4, max_height: 1 };
        assert_eq!(params.validate(100).unwrap_err().field(), "max_height");
    }

    #[test]
    fn test_building_kind_serializes_as_type() {
        let building = Building {
            x: 0,
            z: 1,
            height: 5,
            kind: BuildingKind::Green,
            solar_coverage: 0.0,
            energy_production: 0.0,
        };
        let json = serde_json::to_value(&building).unwrap();
        assert_eq!(json["type"], "green");
    }

    #[test]
    fn test_weights_sum_to_one() {
        let total: f64 = BuildingKind::WEIGHTS.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }
}
