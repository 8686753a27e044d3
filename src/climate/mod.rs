//! Climate Scenarios
//!
//! Daily climate records and the strategies that produce an ordered series of
//! them:
//! - `synthetic`: deterministic seasonal generator (always available)
//! - `remote`: external generative service behind an injected transport
//! - `fallback`: decorator that degrades from one strategy to another
//! - `provider`: the `generate(description, days, use_external)` entry point

pub mod fallback;
pub mod provider;
pub mod remote;
pub mod synthetic;

#[cfg(feature = "remote")]
pub mod gemini;

pub use fallback::FallbackSource;
pub use provider::ClimateScenarioProvider;
pub use remote::{parse_scenario_csv, scenario_prompt, RemoteGenerator, ScenarioTransport};
pub use synthetic::SyntheticGenerator;

#[cfg(feature = "remote")]
pub use gemini::GeminiTransport;

use crate::error::{ClimateError, ScenarioError};
use serde::{Deserialize, Serialize};

/// Soil moisture assumed when a day carries no reading (no water stress).
pub const DEFAULT_SOIL_MOISTURE: f64 = 100.0;

const TEMPERATURE_RANGE_C: (f64, f64) = (-90.0, 60.0);

/// Climate conditions for one simulated day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateDay {
    /// 1-based, contiguous within a scenario
    pub day_index: u32,
    pub temperature_max: f64,
    pub temperature_min: f64,
    /// Same units as the crop's optimal light band
    pub solar_radiation: f64,
    /// Percent; `None` reads as `DEFAULT_SOIL_MOISTURE`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil_moisture: Option<f64>,
}

impl ClimateDay {
    pub fn mean_temperature(&self) -> f64 {
        (self.temperature_max + self.temperature_min) / 2.0
    }

    pub fn effective_soil_moisture(&self) -> f64 {
        self.soil_moisture.unwrap_or(DEFAULT_SOIL_MOISTURE)
    }

    /// Reject non-finite and physically implausible values.
    pub fn validate(&self) -> Result<(), ClimateError> {
        let day = self.day_index;
        let check_finite = |field: &'static str, value: f64| {
            if value.is_finite() {
                Ok(())
            } else {
                Err(ClimateError::NonFinite { day, field })
            }
        };

        check_finite("temperature_max", self.temperature_max)?;
        check_finite("temperature_min", self.temperature_min)?;
        check_finite("solar_radiation", self.solar_radiation)?;
        if let Some(moisture) = self.soil_moisture {
            check_finite("soil_moisture", moisture)?;
        }

        let (low, high) = TEMPERATURE_RANGE_C;
        for (field, value) in [
            ("temperature_max", self.temperature_max),
            ("temperature_min", self.temperature_min),
        ] {
            if !(low..=high).contains(&value) {
                return Err(ClimateError::OutOfRange { day, field, value });
            }
        }
        if self.temperature_max < self.temperature_min {
            return Err(ClimateError::InvertedRange { day });
        }
        if self.solar_radiation < 0.0 {
            return Err(ClimateError::OutOfRange {
                day,
                field: "solar_radiation",
                value: self.solar_radiation,
            });
        }
        if let Some(moisture) = self.soil_moisture {
            if !(0.0..=100.0).contains(&moisture) {
                return Err(ClimateError::OutOfRange {
                    day,
                    field: "soil_moisture",
                    value: moisture,
                });
            }
        }

        Ok(())
    }
}

/// Validate every day and require day indices `1, 2, 3, ...` in order.
pub fn validate_scenario(days: &[ClimateDay]) -> Result<(), ClimateError> {
    for (position, day) in days.iter().enumerate() {
        let expected = position as u32 + 1;
        if day.day_index != expected {
            return Err(ClimateError::NonContiguous {
                expected,
                found: day.day_index,
            });
        }
        day.validate()?;
    }
    Ok(())
}

/// What a scenario strategy is asked to produce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioRequest {
    /// Natural-language description, e.g. "a hot dry summer in Arequipa"
    pub description: String,
    pub day_count: usize,
}

impl ScenarioRequest {
    pub fn new(description: impl Into<String>, day_count: usize) -> Self {
        Self {
            description: description.into(),
            day_count,
        }
    }
}

/// A strategy that produces an ordered daily climate series
pub trait ScenarioSource {
    /// Short label used in log lines
    fn name(&self) -> &str;

    fn generate(&mut self, request: &ScenarioRequest) -> Result<Vec<ClimateDay>, ScenarioError>;
}

impl<S: ScenarioSource + ?Sized> ScenarioSource for &mut S {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn generate(&mut self, request: &ScenarioRequest) -> Result<Vec<ClimateDay>, ScenarioError> {
        (**self).generate(request)
    }
}

impl<S: ScenarioSource + ?Sized> ScenarioSource for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn generate(&mut self, request: &ScenarioRequest) -> Result<Vec<ClimateDay>, ScenarioError> {
        (**self).generate(request)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn day(day_index: u32, temperature_max: f64, temperature_min: f64) -> ClimateDay {
        ClimateDay {
            day_index,
            temperature_max,
            temperature_min,
            solar_radiation: 1500.0,
            soil_moisture: None,
        }
    }

    #[test]
    fn test_mean_and_default_moisture() {
        let d = day(1, 20.0, 10.0);
        assert_eq!(d.mean_temperature(), 15.0);
        assert_eq!(d.effective_soil_moisture(), 100.0);
    }

    #[test]
    fn test_rejects_non_finite() {
        let mut d = day(3, 20.0, 10.0);
        d.solar_radiation = f64::NAN;
        assert_eq!(
            d.validate(),
            Err(ClimateError::NonFinite {
                day: 3,
                field: "solar_radiation",
            })
        );
    }

    #[test]
    fn test_rejects_implausible_values() {
        assert!(matches!(
            day(1, 75.0, 10.0).validate(),
            Err(ClimateError::OutOfRange { field: "temperature_max", .. })
        ));
        assert_eq!(
            day(1, 10.0, 20.0).validate(),
            Err(ClimateError::InvertedRange { day: 1 })
        );

        let mut d = day(1, 20.0, 10.0);
        d.soil_moisture = Some(140.0);
        assert!(matches!(
            d.validate(),
            Err(ClimateError::OutOfRange { field: "soil_moisture", .. })
        ));
    }

    #[test]
    fn test_scenario_must_be_contiguous() {
        let days = vec![day(1, 20.0, 10.0), day(3, 20.0, 10.0)];
        assert_eq!(
            validate_scenario(&days),
            Err(ClimateError::NonContiguous {
                expected: 2,
                found: 3,
            })
        );
        assert!(validate_scenario(&days[..1]).is_ok());
        assert!(validate_scenario(&[]).is_ok());
    }
}
