//! Crop Growth Simulation
//!
//! Day-stepped crop growth engine: a crop parameter sheet plus a daily climate
//! series in, a day-by-day history of stage, thermal time, biomass, stress and
//! harvest progress out.
//!
//! Layout:
//! - `profile`: crop parameter sheets and the stage threshold ladder
//! - `climate/`: climate days and scenario strategies (synthetic, remote, fallback)
//! - `growth`: the one-plant biological model
//! - `simulation`: the orchestrator that drives a run to harvest
//! - `report`, `batch`, `config`: export, parallel runs, binary configuration

pub mod batch;
pub mod climate;
pub mod config;
pub mod error;
pub mod growth;
pub mod profile;
pub mod report;
pub mod simulation;

// Re-export commonly used types
pub use climate::{ClimateDay, ClimateScenarioProvider, ScenarioSource, SyntheticGenerator};
pub use error::{ClimateError, ProfileError, SimulationError};
pub use growth::{BiologicalGrowthModel, PlantState};
pub use profile::CropProfile;
pub use report::SimulationSummary;
pub use simulation::{RunStatus, SimulationHistory, SimulationOrchestrator, SimulationRecord};
