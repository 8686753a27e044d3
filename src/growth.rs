//! Biological Growth Model
//!
//! Advances one plant by one day at a time. Each call:
//! 1. accumulates growing degree days above the base temperature
//! 2. re-evaluates the growth stage on the threshold ladder
//! 3. grows biomass from light and temperature factors
//! 4. counts heat-stress and water-stress days
//!
//! Input days are assumed valid (`ClimateDay::validate`); the model does not
//! re-check them.

use crate::climate::ClimateDay;
use crate::profile::{CropProfile, INITIAL_STAGE};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const INITIAL_BIOMASS: f64 = 0.1;

/// Daily biomass gain under perfect light and temperature
const MAX_DAILY_BIOMASS_GAIN: f64 = 0.05;

/// Deviation (°C) from the optimal midpoint at which growth stops
const TEMPERATURE_TOLERANCE_C: f64 = 15.0;

/// Mutable state of one plant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantState {
    pub current_stage: String,
    pub accumulated_thermal_units: f64,
    pub days_in_current_stage: u32,
    pub heat_stress_days: u32,
    pub water_stress_days: u32,
    pub biomass_index: f64,
}

impl Default for PlantState {
    fn default() -> Self {
        Self {
            current_stage: INITIAL_STAGE.to_string(),
            accumulated_thermal_units: 0.0,
            days_in_current_stage: 0,
            heat_stress_days: 0,
            water_stress_days: 0,
            biomass_index: INITIAL_BIOMASS,
        }
    }
}

/// Day-stepped model of one plant of one crop
#[derive(Debug, Clone)]
pub struct BiologicalGrowthModel {
    profile: Arc<CropProfile>,
    state: PlantState,
}

impl BiologicalGrowthModel {
    pub fn new(profile: Arc<CropProfile>) -> Self {
        Self {
            profile,
            state: PlantState::default(),
        }
    }

    /// Apply one day of climate to the plant
    pub fn advance(&mut self, conditions: &ClimateDay) {
        let profile = &*self.profile;
        let state = &mut self.state;

        let mean_temp = conditions.mean_temperature();
        let daily_units = (mean_temp - profile.base_temperature).max(0.0);
        state.accumulated_thermal_units += daily_units;

        // Keep the current stage until the first threshold is reached.
        let stage = profile
            .stages
            .stage_for(state.accumulated_thermal_units)
            .and_then(|i| profile.stages.get(i));
        match stage {
            Some(stage) if stage.name != state.current_stage => {
                tracing::debug!(
                    "Day {}: {} -> {} at {:.1} GDD",
                    conditions.day_index,
                    state.current_stage,
                    stage.name,
                    state.accumulated_thermal_units
                );
                state.current_stage = stage.name.clone();
                state.days_in_current_stage = 0;
            }
            _ => state.days_in_current_stage += 1,
        }

        let light_factor = (conditions.solar_radiation / profile.optimal_light.max).min(1.0);
        let temp_deviation = (mean_temp - profile.optimal_temperature.midpoint()).abs();
        let temp_factor = (1.0 - temp_deviation / TEMPERATURE_TOLERANCE_C).max(0.0);
        // Radiation is validated non-negative, so the gain is too.
        state.biomass_index += MAX_DAILY_BIOMASS_GAIN * light_factor.max(0.0) * temp_factor;

        if mean_temp > profile.critical_max_temperature {
            state.heat_stress_days += 1;
        }
        if conditions.effective_soil_moisture() < profile.critical_min_soil_moisture {
            state.water_stress_days += 1;
        }
    }

    /// Read-only copy of the current state
    pub fn snapshot(&self) -> PlantState {
        self.state.clone()
    }

    pub fn state(&self) -> &PlantState {
        &self.state
    }

    /// Harvest progress in percent, capped at 100
    pub fn harvest_percent(&self) -> f64 {
        harvest_percent(
            self.state.accumulated_thermal_units,
            self.profile.harvest_thermal_target,
        )
    }
}

/// `min(100, 100 · accumulated / target)`
pub fn harvest_percent(accumulated: f64, target: f64) -> f64 {
    (100.0 * accumulated / target).min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::climate::tests::day;
    use crate::profile::tests::TOMATO;
    use approx::assert_relative_eq;

    fn model() -> BiologicalGrowthModel {
        BiologicalGrowthModel::new(Arc::new(CropProfile::from_json_str(TOMATO).unwrap()))
    }

    #[test]
    fn test_initial_state() {
        let state = model().snapshot();
        assert_eq!(state.current_stage, "germination");
        assert_eq!(state.accumulated_thermal_units, 0.0);
        assert_eq!(state.biomass_index, 0.1);
        assert_eq!(state.heat_stress_days, 0);
        assert_eq!(state.water_stress_days, 0);
    }

    #[test]
    fn test_thermal_units_single_day() {
        // base 10, mean 15 -> 5 units
        let mut m = model();
        m.advance(&day(1, 20.0, 10.0));
        assert_relative_eq!(m.state().accumulated_thermal_units, 5.0);
    }

    #[test]
    fn test_cold_day_adds_nothing() {
        let mut m = model();
        m.advance(&day(1, 8.0, 2.0));
        assert_eq!(m.state().accumulated_thermal_units, 0.0);
    }

    #[test]
    fn test_heat_stress_threshold() {
        let mut m = model();
        m.advance(&day(1, 40.0, 32.0)); // mean 36
        assert_eq!(m.state().heat_stress_days, 1);
        m.advance(&day(2, 38.0, 30.0)); // mean 34
        assert_eq!(m.state().heat_stress_days, 1);
        m.advance(&day(3, 40.0, 30.0)); // mean 35, not above
        assert_eq!(m.state().heat_stress_days, 1);
    }

    #[test]
    fn test_water_stress() {
        let mut m = model();
        let mut dry = day(1, 25.0, 15.0);
        dry.soil_moisture = Some(20.0);
        m.advance(&dry);
        assert_eq!(m.state().water_stress_days, 1);

        // Missing reading counts as saturated soil
        m.advance(&day(2, 25.0, 15.0));
        assert_eq!(m.state().water_stress_days, 1);
    }

    #[test]
    fn test_stage_transition_resets_counter() {
        let mut m = model();
        m.advance(&day(1, 20.0, 10.0)); // 5 units, still germination
        assert_eq!(m.state().current_stage, "germination");
        assert_eq!(m.state().days_in_current_stage, 1);

        // +45 units per hot day
        m.advance(&day(2, 60.0, 50.0));
        m.advance(&day(3, 60.0, 50.0));
        assert_relative_eq!(m.state().accumulated_thermal_units, 95.0);
        assert_eq!(m.state().current_stage, "germination");
        assert_eq!(m.state().days_in_current_stage, 3);

        m.advance(&day(4, 60.0, 50.0));
        assert_eq!(m.state().current_stage, "vegetative");
        assert_eq!(m.state().days_in_current_stage, 0);

        m.advance(&day(5, 20.0, 10.0));
        assert_eq!(m.state().current_stage, "vegetative");
        assert_eq!(m.state().days_in_current_stage, 1);
    }

    #[test]
    fn test_stays_in_first_stage_before_its_threshold() {
        let mut sheet: serde_json::Value = serde_json::from_str(TOMATO).unwrap();
        sheet["stages"] = serde_json::json!([
            { "stage": "germination", "gdd": 20 },
            { "stage": "vegetative", "gdd": 100 }
        ]);
        let profile = Arc::new(CropProfile::from_json_str(&sheet.to_string()).unwrap());
        let mut m = BiologicalGrowthModel::new(Arc::clone(&profile));

        m.advance(&day(1, 20.0, 10.0)); // 5 units, below the first threshold
        assert_eq!(m.state().current_stage, "germination");
        assert_eq!(profile.stages.position(&m.state().current_stage), Some(0));
        assert_eq!(m.state().days_in_current_stage, 1);

        // 5 + 15 reaches the threshold of the stage it is already in
        m.advance(&day(2, 30.0, 20.0));
        assert_eq!(m.state().current_stage, "germination");
        assert_eq!(m.state().days_in_current_stage, 2);
    }

    #[test]
    fn test_biomass_at_optimum() {
        // mean 24 = optimal midpoint, radiation above band max
        let mut m = model();
        let mut d = day(1, 29.0, 19.0);
        d.solar_radiation = 2000.0;
        m.advance(&d);
        assert_relative_eq!(m.state().biomass_index, 0.15);
    }

    #[test]
    fn test_biomass_partial_factors() {
        // light 750/1500 = 0.5, temp 1 - |14 - 24|/15 = 1/3
        let mut m = model();
        let mut d = day(1, 19.0, 9.0);
        d.solar_radiation = 750.0;
        m.advance(&d);
        assert_relative_eq!(m.state().biomass_index, 0.1 + 0.05 * 0.5 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_biomass_never_decreases_far_from_optimum() {
        let mut m = model();
        m.advance(&day(1, -20.0, -30.0));
        assert_eq!(m.state().biomass_index, 0.1);
    }

    #[test]
    fn test_harvest_percent_clamped() {
        assert_eq!(harvest_percent(250.0, 500.0), 50.0);
        assert_eq!(harvest_percent(500.0, 500.0), 100.0);
        assert_eq!(harvest_percent(900.0, 500.0), 100.0);
    }
}
