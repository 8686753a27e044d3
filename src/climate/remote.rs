//! Remote Scenario Generator
//!
//! Asks an external generative service for a climate series and parses its
//! CSV reply strictly. The HTTP client and credentials live in an injected
//! `ScenarioTransport`, so the generator can be tested without a network.

use super::{validate_scenario, ClimateDay, ScenarioRequest, ScenarioSource};
use crate::error::{ClimateError, ScenarioError, TransportError};

/// One round-trip to the scenario service.
///
/// Implementations make a single bounded attempt and return the raw CSV text.
pub trait ScenarioTransport {
    fn fetch(&self, description: &str, day_count: usize) -> Result<String, TransportError>;
}

/// Prompt sent to text-generation services
pub fn scenario_prompt(description: &str, day_count: usize) -> String {
    format!(
        "Act as an expert meteorologist and data scientist. Generate a daily climate \
         time series of {days} days for the following scenario: '{description}'.\n\
         The result must be CSV text with no header and exactly 4 columns: \
         day, temp_max_celsius, temp_min_celsius, solar_radiation_par.\n\
         Days run from 1 to {days}. Values must be numeric and realistic for the scenario. \
         Do not include any other text, only the CSV.\n\
         Example line: 1,28.5,15.2,2100",
        days = day_count,
        description = description,
    )
}

/// Parse `day,temp_max,temp_min,radiation` rows.
///
/// Blank lines and surrounding whitespace are ignored. Anything else that
/// deviates from the schema is an error: wrong column count, non-numeric
/// fields, a row count other than `expected_rows`, or day indices that are not
/// `1..=expected_rows` in order.
pub fn parse_scenario_csv(
    text: &str,
    expected_rows: usize,
) -> Result<Vec<ClimateDay>, ClimateError> {
    let mut days = Vec::with_capacity(expected_rows);

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let line_no = line_no + 1;

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != 4 {
            return Err(ClimateError::ColumnCount {
                line: line_no,
                found: fields.len(),
            });
        }

        let mut values = [0.0_f64; 4];
        for (slot, field) in values.iter_mut().zip(&fields) {
            *slot = field.parse().map_err(|_| ClimateError::NotNumeric {
                line: line_no,
                value: field.to_string(),
            })?;
        }

        let [day, temperature_max, temperature_min, solar_radiation] = values;
        if day.fract() != 0.0 || day < 1.0 || day > u32::MAX as f64 {
            return Err(ClimateError::NotNumeric {
                line: line_no,
                value: fields[0].to_string(),
            });
        }

        days.push(ClimateDay {
            day_index: day as u32,
            temperature_max,
            temperature_min,
            solar_radiation,
            soil_moisture: None,
        });
    }

    if days.len() != expected_rows {
        return Err(ClimateError::RowCount {
            expected: expected_rows,
            found: days.len(),
        });
    }
    validate_scenario(&days)?;

    Ok(days)
}

/// Scenario strategy backed by an external service
pub struct RemoteGenerator<T> {
    transport: T,
}

impl<T: ScenarioTransport> RemoteGenerator<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }
}

impl<T: ScenarioTransport> ScenarioSource for RemoteGenerator<T> {
    fn name(&self) -> &str {
        "remote"
    }

    fn generate(&mut self, request: &ScenarioRequest) -> Result<Vec<ClimateDay>, ScenarioError> {
        tracing::info!(
            "Requesting {}-day climate scenario for '{}'",
            request.day_count,
            request.description
        );
        let text = self.transport.fetch(&request.description, request.day_count)?;
        let days = parse_scenario_csv(&text, request.day_count)?;
        tracing::info!("Remote climate scenario parsed ({} days)", days.len());
        Ok(days)
    }
}
