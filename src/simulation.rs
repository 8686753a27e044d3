//! Simulation Orchestrator
//!
//! Drives one `BiologicalGrowthModel` across a climate scenario and records a
//! snapshot per day. A run is a two-state machine: `Running` until the day
//! harvest reaches 100%, then `Harvested`, after which no further day is
//! processed.

use crate::climate::{validate_scenario, ClimateDay};
use crate::error::SimulationError;
use crate::growth::{BiologicalGrowthModel, PlantState};
use crate::profile::CropProfile;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// One simulated day: climate inputs merged with end-of-day plant state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRecord {
    pub day_index: u32,
    pub temperature_max: f64,
    pub temperature_min: f64,
    pub solar_radiation: f64,
    pub soil_moisture: Option<f64>,
    pub stage: String,
    pub accumulated_thermal_units: f64,
    pub days_in_current_stage: u32,
    pub heat_stress_days: u32,
    pub water_stress_days: u32,
    pub biomass_index: f64,
    pub harvest_percent: f64,
}

impl SimulationRecord {
    fn merge(day: &ClimateDay, state: PlantState, harvest_percent: f64) -> Self {
        Self {
            day_index: day.day_index,
            temperature_max: day.temperature_max,
            temperature_min: day.temperature_min,
            solar_radiation: day.solar_radiation,
            soil_moisture: day.soil_moisture,
            stage: state.current_stage,
            accumulated_thermal_units: state.accumulated_thermal_units,
            days_in_current_stage: state.days_in_current_stage,
            heat_stress_days: state.heat_stress_days,
            water_stress_days: state.water_stress_days,
            biomass_index: state.biomass_index,
            harvest_percent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    Running,
    Harvested,
}

/// Append-only day history of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationHistory {
    crop_name: String,
    records: Vec<SimulationRecord>,
    status: RunStatus,
}

impl SimulationHistory {
    fn new(crop_name: &str, capacity: usize) -> Self {
        Self {
            crop_name: crop_name.to_string(),
            records: Vec::with_capacity(capacity),
            status: RunStatus::Running,
        }
    }

    pub fn crop_name(&self) -> &str {
        &self.crop_name
    }

    pub fn records(&self) -> &[SimulationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&SimulationRecord> {
        self.records.last()
    }

    /// `Harvested` once harvest reached 100%; `Running` if the scenario ran out first
    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// Day on which harvest was reached, if it was
    pub fn harvest_day(&self) -> Option<u32> {
        match self.status {
            RunStatus::Harvested => self.last().map(|r| r.day_index),
            RunStatus::Running => None,
        }
    }
}

/// Runs a crop through climate scenarios
#[derive(Debug, Clone)]
pub struct SimulationOrchestrator {
    profile: Arc<CropProfile>,
}

impl SimulationOrchestrator {
    pub fn new(profile: Arc<CropProfile>) -> Self {
        Self { profile }
    }

    /// Load the crop parameter sheet; a missing or invalid sheet is fatal
    pub fn from_path(path: &Path) -> Result<Self, SimulationError> {
        let profile = CropProfile::load(path)?;
        Ok(Self::new(Arc::new(profile)))
    }

    pub fn profile(&self) -> &Arc<CropProfile> {
        &self.profile
    }

    /// Simulate `scenario` day by day from a fresh plant.
    ///
    /// The whole scenario is validated first, so an invalid day rejects the
    /// run before anything is simulated. Stops right after the first day whose
    /// harvest percent reaches 100; remaining days are not processed.
    pub fn run(&self, scenario: &[ClimateDay]) -> Result<SimulationHistory, SimulationError> {
        validate_scenario(scenario)?;

        tracing::info!(
            "Starting simulation for '{}' ({} scenario days)",
            self.profile.name,
            scenario.len()
        );

        let mut model = BiologicalGrowthModel::new(Arc::clone(&self.profile));
        let mut history = SimulationHistory::new(&self.profile.name, scenario.len());

        for day in scenario {
            model.advance(day);
            let harvest = model.harvest_percent();
            history
                .records
                .push(SimulationRecord::merge(day, model.snapshot(), harvest));

            if harvest >= 100.0 {
                history.status = RunStatus::Harvested;
                tracing::info!("Harvest reached on day {}", day.day_index);
                break;
            }
        }

        if history.status == RunStatus::Running {
            tracing::info!(
                "Scenario ended after {} days before harvest",
                history.len()
            );
        }

        Ok(history)
    }
}
