// Crop growth simulation entry point
//
// Purpose: Generate a climate scenario and run one crop through it to harvest
// Usage: SCENARIO_SEED=42 cargo run --bin simulate
//        SCENARIO_ONLINE=1 GEMINI_API_KEY=... cargo run --features remote --bin simulate

use anyhow::Context;
use crop_growth_sim::config::RunConfig;
use crop_growth_sim::report::{self, SimulationSummary};
use crop_growth_sim::{ClimateScenarioProvider, SimulationOrchestrator, SyntheticGenerator};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crop_growth_sim=info,simulate=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = RunConfig::from_env();
    tracing::info!("Configuration:");
    tracing::info!("  CROP_PROFILE: {:?}", config.profile_path);
    tracing::info!("  SCENARIO_DAYS: {}", config.days);
    tracing::info!("  SCENARIO_ONLINE: {}", config.online);
    tracing::info!("  SCENARIO_SEED: {:?}", config.seed);

    // Profile problems abort before any scenario is requested
    let orchestrator = SimulationOrchestrator::from_path(&config.profile_path).with_context(|| {
        format!("Cannot start simulation with profile {:?}", config.profile_path)
    })?;
    let profile = orchestrator.profile();
    tracing::info!(
        "Crop '{}': {} stages, harvest at {} GDD",
        profile.name,
        profile.stages.len(),
        profile.harvest_thermal_target
    );

    let synthetic = match config.seed {
        Some(seed) => SyntheticGenerator::with_seed(seed),
        None => SyntheticGenerator::from_entropy(),
    };
    let mut provider = attach_remote(ClimateScenarioProvider::new(synthetic), &config);
    if config.online && !provider.has_remote() {
        tracing::warn!("SCENARIO_ONLINE is set but no remote service is configured");
    }
    let scenario = provider.generate(&config.description, config.days, config.online);

    let history = orchestrator.run(&scenario)?;

    println!("\n=====================================================");
    println!("=               SIMULATION RESULTS                  =");
    println!("=====================================================");
    match SimulationSummary::from_history(&history) {
        Some(summary) => {
            println!("{}", summary);
            println!("Outcome: {}", report::status_label(history.status()));
            println!("\n--- Last 10 days ---");
            println!("{}", report::tail_preview(&history, 10)?);
        }
        None => println!("The simulation produced no results."),
    }

    if let Some(path) = &config.report_csv {
        report::write_csv(&history, path)?;
    }

    Ok(())
}

#[cfg(feature = "remote")]
fn attach_remote(
    provider: ClimateScenarioProvider,
    config: &RunConfig,
) -> ClimateScenarioProvider {
    use crop_growth_sim::climate::gemini::{GeminiTransport, DEFAULT_MODEL};
    use crop_growth_sim::climate::RemoteGenerator;

    let Some(api_key) = config.api_key.clone() else {
        return provider;
    };
    let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);
    match GeminiTransport::new(api_key, model, config.remote_timeout) {
        Ok(transport) => provider.with_remote(RemoteGenerator::new(transport)),
        Err(e) => {
            tracing::warn!("Remote scenario service unavailable: {}", e);
            provider
        }
    }
}

#[cfg(not(feature = "remote"))]
fn attach_remote(
    provider: ClimateScenarioProvider,
    _config: &RunConfig,
) -> ClimateScenarioProvider {
    tracing::debug!("Built without the 'remote' feature");
    provider
}
