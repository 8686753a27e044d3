//! Synthetic Climate Generator
//!
//! Seasonal sine curves with Gaussian noise. The description is ignored; the
//! output depends only on the day count and the random stream, so a fixed seed
//! reproduces the same series.
//!
//! For day d with phase φ = 2π·d/365:
//!   temp_min  = 15 + 5·sin φ + N(0,1)
//!   temp_max  = temp_min + 10 + 2·sin φ + N(0,1)
//!   radiation = 1800 + 400·sin φ + 100·N(0,1)

use super::{ClimateDay, ScenarioRequest, ScenarioSource};
use crate::error::ScenarioError;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::StandardNormal;
use std::f64::consts::PI;

const DAYS_PER_YEAR: f64 = 365.0;

/// Deterministic-under-seed fallback generator
#[derive(Debug, Clone)]
pub struct SyntheticGenerator {
    rng: StdRng,
}

impl SyntheticGenerator {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Generate `day_count` contiguous days starting at day 1
    pub fn generate_days(&mut self, day_count: usize) -> Vec<ClimateDay> {
        (1..=day_count as u32)
            .map(|d| {
                let seasonal = (2.0 * PI * d as f64 / DAYS_PER_YEAR).sin();

                // Draw order is part of the reproducibility contract.
                let temperature_min = 15.0 + 5.0 * seasonal + self.noise();
                let temperature_max = temperature_min + 10.0 + 2.0 * seasonal + self.noise();
                let solar_radiation = 1800.0 + 400.0 * seasonal + 100.0 * self.noise();

                ClimateDay {
                    day_index: d,
                    temperature_max,
                    temperature_min,
                    solar_radiation,
                    soil_moisture: None,
                }
            })
            .collect()
    }

    fn noise(&mut self) -> f64 {
        self.rng.sample(StandardNormal)
    }
}

impl Default for SyntheticGenerator {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl ScenarioSource for SyntheticGenerator {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn generate(&mut self, request: &ScenarioRequest) -> Result<Vec<ClimateDay>, ScenarioError> {
        Ok(self.generate_days(request.day_count))
    }
}
