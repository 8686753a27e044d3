//! Batch Simulation
//!
//! Independent runs share nothing mutable: each job gets its own model and
//! history, and profiles are shared read-only through `Arc`. Jobs run in
//! parallel on the Rayon pool.

use crate::climate::ClimateDay;
use crate::error::SimulationError;
use crate::profile::CropProfile;
use crate::simulation::{SimulationHistory, SimulationOrchestrator};
use rayon::prelude::*;
use std::sync::Arc;

/// One crop/scenario pair to simulate
#[derive(Debug, Clone)]
pub struct SimulationJob {
    pub label: String,
    pub profile: Arc<CropProfile>,
    pub scenario: Vec<ClimateDay>,
}

/// Result of one job, tagged with its label
#[derive(Debug)]
pub struct JobOutcome {
    pub label: String,
    pub result: Result<SimulationHistory, SimulationError>,
}

/// Run every job in parallel; outcomes keep the input order
pub fn run_batch(jobs: &[SimulationJob]) -> Vec<JobOutcome> {
    tracing::info!("Running {} simulations in parallel", jobs.len());

    jobs.par_iter()
        .map(|job| JobOutcome {
            label: job.label.clone(),
            result: SimulationOrchestrator::new(Arc::clone(&job.profile)).run(&job.scenario),
        })
        .collect()
}

/// Sequential equivalent of `run_batch`, for comparison and debugging
pub fn run_batch_sequential(jobs: &[SimulationJob]) -> Vec<JobOutcome> {
    jobs.iter()
        .map(|job| JobOutcome {
            label: job.label.clone(),
            result: SimulationOrchestrator::new(Arc::clone(&job.profile)).run(&job.scenario),
        })
        .collect()
}
