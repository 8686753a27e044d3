//! Crop Parameter Sheets
//!
//! Loads the biological parameter sheet of one crop from JSON and validates it
//! into an immutable `CropProfile`. Stage thresholds are kept as an ordered
//! ladder so the "last stage whose threshold has been reached" lookup never
//! depends on map iteration order.

use crate::error::ProfileError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Stage every plant starts in before any thermal units accumulate.
pub const INITIAL_STAGE: &str = "germination";

/// Closed `[min, max]` interval from the parameter sheet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub min: f64,
    pub max: f64,
}

impl Band {
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

/// One rung of the stage ladder
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    pub name: String,
    /// Cumulative thermal units at which the stage begins
    pub threshold: f64,
}

/// Growth stages in definition order, thresholds non-decreasing
#[derive(Debug, Clone, PartialEq)]
pub struct StageLadder {
    stages: Vec<Stage>,
}

impl StageLadder {
    /// Build a ladder, rejecting empty lists, thresholds that go backwards,
    /// repeated names, and ladders that do not start at `INITIAL_STAGE`.
    pub fn new(stages: Vec<Stage>) -> Result<Self, ProfileError> {
        if stages.is_empty() {
            return Err(ProfileError::EmptyStages);
        }

        let mut previous = f64::NEG_INFINITY;
        for stage in &stages {
            if stage.name.trim().is_empty() {
                return Err(ProfileError::InvalidValue {
                    field: "stages.stage",
                    reason: "stage name is empty".to_string(),
                });
            }
            if !stage.threshold.is_finite() || stage.threshold < 0.0 {
                return Err(ProfileError::InvalidValue {
                    field: "stages.gdd",
                    reason: format!("'{}' has threshold {}", stage.name, stage.threshold),
                });
            }
            if stage.threshold < previous {
                return Err(ProfileError::NonMonotonicStages {
                    stage: stage.name.clone(),
                    threshold: stage.threshold,
                    previous,
                });
            }
            previous = stage.threshold;
        }

        // Plants start in the initial stage, so it must lead the ladder.
        if stages[0].name != INITIAL_STAGE {
            return Err(ProfileError::InvalidValue {
                field: "stages.stage",
                reason: format!(
                    "first stage is '{}', expected '{}'",
                    stages[0].name, INITIAL_STAGE
                ),
            });
        }

        for (i, stage) in stages.iter().enumerate() {
            if stages[..i].iter().any(|s| s.name == stage.name) {
                return Err(ProfileError::InvalidValue {
                    field: "stages.stage",
                    reason: format!("'{}' is listed more than once", stage.name),
                });
            }
        }

        Ok(Self { stages })
    }

    /// Index of the last stage whose threshold is `<= accumulated`.
    ///
    /// `None` while no threshold has been reached yet.
    pub fn stage_for(&self, accumulated: f64) -> Option<usize> {
        // Thresholds are sorted, so the qualifying stages form a prefix.
        let reached = self.stages.partition_point(|s| s.threshold <= accumulated);
        reached.checked_sub(1)
    }

    pub fn get(&self, index: usize) -> Option<&Stage> {
        self.stages.get(index)
    }

    /// Position of a stage name in definition order
    pub fn position(&self, name: &str) -> Option<usize> {
        self.stages.iter().position(|s| s.name == name)
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stage> {
        self.stages.iter()
    }
}

/// Biological parameter sheet of one crop, read-only for the whole run
#[derive(Debug, Clone, PartialEq)]
pub struct CropProfile {
    pub name: String,

    /// °C below which no thermal units accumulate
    pub base_temperature: f64,

    pub stages: StageLadder,

    /// Thermal units at which harvest is 100% complete
    pub harvest_thermal_target: f64,

    /// Photosynthetically active radiation band
    pub optimal_light: Band,

    /// °C band; only its midpoint drives growth
    pub optimal_temperature: Band,

    /// Mean temperature (°C) above which a day counts as heat stress
    pub critical_max_temperature: f64,

    /// Soil moisture (%) below which a day counts as water stress
    pub critical_min_soil_moisture: f64,
}

// Raw sheet layout. Every field is optional so a missing key can be reported
// by its path instead of serde's generic message.
#[derive(Debug, Deserialize)]
struct RawProfile {
    crop_name: Option<String>,
    gdd: Option<RawGdd>,
    stages: Option<Vec<RawStage>>,
    optimal: Option<RawOptimal>,
    critical: Option<RawCritical>,
}

#[derive(Debug, Deserialize)]
struct RawGdd {
    base_temperature_c: Option<f64>,
    harvest_target: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawStage {
    stage: String,
    gdd: f64,
}

#[derive(Debug, Deserialize)]
struct RawOptimal {
    par_light: Option<[f64; 2]>,
    day_temperature_c: Option<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct RawCritical {
    max_temperature_c: Option<f64>,
    min_soil_moisture_pct: Option<f64>,
}

impl CropProfile {
    /// Load and validate a parameter sheet from a JSON file
    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let contents = fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let raw: RawProfile =
            serde_json::from_str(&contents).map_err(|source| ProfileError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let profile = Self::from_raw(raw)?;
        tracing::debug!(
            "Loaded crop profile '{}' ({} stages) from {:?}",
            profile.name,
            profile.stages.len(),
            path
        );
        Ok(profile)
    }

    /// Parse and validate a parameter sheet held in memory
    pub fn from_json_str(json: &str) -> Result<Self, ProfileError> {
        let raw: RawProfile =
            serde_json::from_str(json).map_err(|source| ProfileError::Parse {
                path: "<inline>".into(),
                source,
            })?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawProfile) -> Result<Self, ProfileError> {
        let name = raw.crop_name.ok_or(ProfileError::MissingKey("crop_name"))?;
        if name.trim().is_empty() {
            return Err(ProfileError::InvalidValue {
                field: "crop_name",
                reason: "name is empty".to_string(),
            });
        }

        let gdd = raw.gdd.ok_or(ProfileError::MissingKey("gdd"))?;
        let base_temperature = finite(
            "gdd.base_temperature_c",
            gdd.base_temperature_c
                .ok_or(ProfileError::MissingKey("gdd.base_temperature_c"))?,
        )?;
        let harvest_thermal_target = finite(
            "gdd.harvest_target",
            gdd.harvest_target
                .ok_or(ProfileError::MissingKey("gdd.harvest_target"))?,
        )?;
        if harvest_thermal_target <= 0.0 {
            return Err(ProfileError::InvalidValue {
                field: "gdd.harvest_target",
                reason: format!("must be positive, got {}", harvest_thermal_target),
            });
        }

        let stages = raw
            .stages
            .ok_or(ProfileError::MissingKey("stages"))?
            .into_iter()
            .map(|s| Stage {
                name: s.stage,
                threshold: s.gdd,
            })
            .collect();
        let stages = StageLadder::new(stages)?;

        let optimal = raw.optimal.ok_or(ProfileError::MissingKey("optimal"))?;
        let optimal_light = band(
            "optimal.par_light",
            optimal
                .par_light
                .ok_or(ProfileError::MissingKey("optimal.par_light"))?,
        )?;
        if optimal_light.max <= 0.0 {
            return Err(ProfileError::InvalidValue {
                field: "optimal.par_light",
                reason: "upper bound must be positive".to_string(),
            });
        }
        let optimal_temperature = band(
            "optimal.day_temperature_c",
            optimal
                .day_temperature_c
                .ok_or(ProfileError::MissingKey("optimal.day_temperature_c"))?,
        )?;

        let critical = raw.critical.ok_or(ProfileError::MissingKey("critical"))?;
        let critical_max_temperature = finite(
            "critical.max_temperature_c",
            critical
                .max_temperature_c
                .ok_or(ProfileError::MissingKey("critical.max_temperature_c"))?,
        )?;
        let critical_min_soil_moisture = finite(
            "critical.min_soil_moisture_pct",
            critical
                .min_soil_moisture_pct
                .ok_or(ProfileError::MissingKey("critical.min_soil_moisture_pct"))?,
        )?;

        Ok(Self {
            name,
            base_temperature,
            stages,
            harvest_thermal_target,
            optimal_light,
            optimal_temperature,
            critical_max_temperature,
            critical_min_soil_moisture,
        })
    }
}

fn finite(field: &'static str, value: f64) -> Result<f64, ProfileError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ProfileError::InvalidValue {
            field,
            reason: format!("{} is not finite", value),
        })
    }
}

fn band(field: &'static str, [min, max]: [f64; 2]) -> Result<Band, ProfileError> {
    finite(field, min)?;
    finite(field, max)?;
    if min > max {
        return Err(ProfileError::InvalidValue {
            field,
            reason: format!("min {} exceeds max {}", min, max),
        });
    }
    Ok(Band { min, max })
}
