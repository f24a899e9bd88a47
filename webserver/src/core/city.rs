//! Procedural city generator
//!
//! Each call builds its own `ChaCha8Rng` from the request seed, so the same
//! `(seed, grid_size, max_height)` always yields the same layout and
//! concurrent calls never share random state.

use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use shared::{
    Building, BuildingKind, CityLayout, CityParams, CityStatistics, SustainableFeatures, ValidationResult,
    DEFAULT_MAX_GRID_SIZE,
};

use super::round_to;

const MIN_HEIGHT: u32 = 2;
const SOLAR_COVERAGE_RANGE: std::ops::Range<f64> = 0.3..0.9;
const ENERGY_PER_FLOOR: f64 = 10.0;

#[derive(Debug, Clone, Copy)]
pub struct CityGenerator {
    max_grid_size: u32,
}

impl Default for CityGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_GRID_SIZE)
    }
}

impl CityGenerator {
    pub fn new(max_grid_size: u32) -> Self {
        Self { max_grid_size }
    }

    pub fn max_grid_size(&self) -> u32 {
        self.max_grid_size
    }

    /// Validate `params` and generate the layout for its seed
    pub fn generate(&self, params: &CityParams) -> ValidationResult<CityLayout> {
        params.validate(self.max_grid_size)?;

        // negative seeds keep their bit pattern
        let mut rng = ChaCha8Rng::seed_from_u64(params.seed as u64);
        Ok(generate_layout(params.grid_size as u32, params.max_height as u32, &mut rng))
    }
}

/// Pick a building kind using `BuildingKind::WEIGHTS`
fn sample_kind<R: Rng + ?Sized>(rng: &mut R) -> BuildingKind {
    BuildingKind::ALL
        .choose_weighted(rng, BuildingKind::weight)
        .copied()
        .unwrap_or(BuildingKind::Green)
}

/// Sample every cell of a `grid_size` x `grid_size` grid, x-major
pub fn generate_layout<R: Rng + ?Sized>(grid_size: u32, max_height: u32, rng: &mut R) -> CityLayout {
    let max_height = max_height.max(MIN_HEIGHT);
    let mut buildings = Vec::with_capacity(grid_size as usize * grid_size as usize);
    let mut total_energy = 0.0;

    for x in 0..grid_size {
        for z in 0..grid_size {
            let height = rng.gen_range(MIN_HEIGHT..=max_height);
            let kind = sample_kind(rng);
            let solar_coverage = if kind.is_green() {
                0.0
            } else {
                rng.gen_range(SOLAR_COVERAGE_RANGE)
            };

            let energy_production = height as f64 * solar_coverage * ENERGY_PER_FLOOR;
            total_energy += energy_production;

            buildings.push(Building {
                x,
                z,
                height,
                kind,
                solar_coverage: round_to(solar_coverage, 2),
                energy_production: round_to(energy_production, 1),
            });
        }
    }

    let (statistics, sustainable_features) = summarize(&buildings, total_energy);
    CityLayout {
        buildings,
        statistics,
        sustainable_features,
    }
}

/// Aggregate statistics for a finished grid.
///
/// Average solar coverage only counts non-green cells and is 0 when every
/// cell is green.
pub fn summarize(buildings: &[Building], total_energy: f64) -> (CityStatistics, SustainableFeatures) {
    let total = buildings.len();
    let green_spaces = buildings.iter().filter(|b| b.kind.is_green()).count();

    let green_ratio = if total == 0 { 0.0 } else { green_spaces as f64 / total as f64 };

    let solar: Vec<f64> = buildings
        .iter()
        .filter(|b| !b.kind.is_green())
        .map(|b| b.solar_coverage)
        .collect();
    let avg_solar_coverage = if solar.is_empty() {
        0.0
    } else {
        solar.iter().sum::<f64>() / solar.len() as f64
    };

    let sustainability_score = green_ratio * 40.0 + avg_solar_coverage * 60.0;

    let statistics = CityStatistics {
        total_buildings: total as u32,
        green_spaces: green_spaces as u32,
        green_ratio: round_to(green_ratio, 3),
        total_energy_production: round_to(total_energy, 1),
        avg_solar_coverage: round_to(avg_solar_coverage, 3),
        sustainability_score: round_to(sustainability_score, 1),
    };

    let features = SustainableFeatures {
        solar_panels: format!("{:.1}% building coverage", avg_solar_coverage * 100.0),
        green_buildings: format!("{green_spaces} eco buildings"),
        energy_efficiency: if sustainability_score > 70.0 { "A" } else { "B" }.to_string(),
        carbon_neutral: sustainability_score > 80.0,
    };

    (statistics, features)
}
