//! Reporting
//!
//! Turns a simulation history into the flat table consumed by plotting and
//! yield-model training, plus the end-of-run summary.

use crate::simulation::{RunStatus, SimulationHistory};
use anyhow::{Context, Result};
use polars::prelude::*;
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::path::Path;

/// End-of-run figures
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationSummary {
    pub crop_name: String,
    pub days_simulated: usize,
    pub harvest_day: Option<u32>,
    pub final_stage: String,
    pub final_biomass: f64,
    pub heat_stress_days: u32,
    pub water_stress_days: u32,
    pub final_harvest_percent: f64,
}

impl SimulationSummary {
    /// `None` for an empty history
    pub fn from_history(history: &SimulationHistory) -> Option<Self> {
        let last = history.last()?;
        Some(Self {
            crop_name: history.crop_name().to_string(),
            days_simulated: history.len(),
            harvest_day: history.harvest_day(),
            final_stage: last.stage.clone(),
            final_biomass: last.biomass_index,
            heat_stress_days: last.heat_stress_days,
            water_stress_days: last.water_stress_days,
            final_harvest_percent: last.harvest_percent,
        })
    }
}

impl fmt::Display for SimulationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Crop: {}", self.crop_name)?;
        match self.harvest_day {
            Some(day) => writeln!(f, "Days to harvest: {}", day)?,
            None => writeln!(
                f,
                "Harvest not reached after {} days ({:.1}%)",
                self.days_simulated, self.final_harvest_percent
            )?,
        }
        writeln!(f, "Final stage: {}", self.final_stage)?;
        writeln!(f, "Final biomass index: {:.2}", self.final_biomass)?;
        writeln!(f, "Heat stress days: {}", self.heat_stress_days)?;
        write!(f, "Water stress days: {}", self.water_stress_days)
    }
}

/// One column per `SimulationRecord` field, one row per day
pub fn to_dataframe(history: &SimulationHistory) -> Result<DataFrame> {
    let records = history.records();

    let df = df!(
        "day_index" => records.iter().map(|r| r.day_index).collect::<Vec<_>>(),
        "temperature_max" => records.iter().map(|r| r.temperature_max).collect::<Vec<_>>(),
        "temperature_min" => records.iter().map(|r| r.temperature_min).collect::<Vec<_>>(),
        "solar_radiation" => records.iter().map(|r| r.solar_radiation).collect::<Vec<_>>(),
        "soil_moisture" => records.iter().map(|r| r.soil_moisture).collect::<Vec<_>>(),
        "stage" => records.iter().map(|r| r.stage.as_str()).collect::<Vec<_>>(),
        "accumulated_thermal_units" => records
            .iter()
            .map(|r| r.accumulated_thermal_units)
            .collect::<Vec<_>>(),
        "days_in_current_stage" => records
            .iter()
            .map(|r| r.days_in_current_stage)
            .collect::<Vec<_>>(),
        "heat_stress_days" => records.iter().map(|r| r.heat_stress_days).collect::<Vec<_>>(),
        "water_stress_days" => records.iter().map(|r| r.water_stress_days).collect::<Vec<_>>(),
        "biomass_index" => records.iter().map(|r| r.biomass_index).collect::<Vec<_>>(),
        "harvest_percent" => records.iter().map(|r| r.harvest_percent).collect::<Vec<_>>(),
    )
    .with_context(|| "Failed to build history DataFrame")?;

    Ok(df)
}

/// Last `n` days, reduced to day, max temperature, stage and harvest progress.
///
/// Numeric columns are rounded to one decimal for display.
pub fn tail_preview(history: &SimulationHistory, n: usize) -> Result<DataFrame> {
    let records = history.records();
    let tail = &records[records.len().saturating_sub(n)..];

    let preview = df!(
        "day_index" => tail.iter().map(|r| r.day_index).collect::<Vec<_>>(),
        "temperature_max" => tail.iter().map(|r| round1(r.temperature_max)).collect::<Vec<_>>(),
        "stage" => tail.iter().map(|r| r.stage.as_str()).collect::<Vec<_>>(),
        "harvest_percent" => tail.iter().map(|r| round1(r.harvest_percent)).collect::<Vec<_>>(),
    )
    .with_context(|| "Failed to build preview DataFrame")?;

    Ok(preview)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Write the full history as CSV with a header row
pub fn write_csv(history: &SimulationHistory, path: &Path) -> Result<()> {
    let mut df = to_dataframe(history)?;
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create report file: {:?}", path))?;

    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)
        .with_context(|| format!("Failed to write report CSV: {:?}", path))?;

    tracing::info!("Wrote {} history rows to {:?}", df.height(), path);
    Ok(())
}

/// Report outcome label used in logs and previews
pub fn status_label(status: RunStatus) -> &'static str {
    match status {
        RunStatus::Running => "not harvested",
        RunStatus::Harvested => "harvested",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::climate::tests::day;
    use crate::profile::{tests::TOMATO, CropProfile};
    use crate::simulation::SimulationOrchestrator;
    use std::sync::Arc;

    fn history(days: u32) -> SimulationHistory {
        let profile = Arc::new(CropProfile::from_json_str(TOMATO).unwrap());
        let scenario: Vec<_> = (1..=days).map(|d| day(d, 30.0, 20.0)).collect();
        SimulationOrchestrator::new(profile).run(&scenario).unwrap()
    }

    #[test]
    fn test_dataframe_shape() {
        let df = to_dataframe(&history(12)).unwrap();
        assert_eq!(df.height(), 12);
        assert_eq!(df.width(), 12);
        assert_eq!(df.column("soil_moisture").unwrap().null_count(), 12);
    }

    #[test]
    fn test_tail_preview() {
        let preview = tail_preview(&history(30), 10).unwrap();
        assert_eq!(preview.height(), 10);
        assert_eq!(preview.width(), 4);
        assert_eq!(preview.get_column_names()[3].as_str(), "harvest_percent");
    }

    #[test]
    fn test_tail_preview_rounds_to_one_decimal() {
        let profile = Arc::new(CropProfile::from_json_str(TOMATO).unwrap());
        // mean 25.185 -> 15.185 units/day; 45.555 after 3 days = 9.111%
        let scenario: Vec<_> = (1..=3).map(|d| day(d, 30.37, 20.0)).collect();
        let history = SimulationOrchestrator::new(profile).run(&scenario).unwrap();

        let preview = tail_preview(&history, 2).unwrap();
        assert_eq!(preview.height(), 2);
        let temperature = preview
            .column("temperature_max")
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .get(1);
        let harvest = preview
            .column("harvest_percent")
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .get(1);
        assert_eq!(temperature, Some(30.4));
        assert_eq!(harvest, Some(9.1));

        // The full table keeps the raw values
        assert_eq!(history.last().unwrap().temperature_max, 30.37);
    }

    #[test]
    fn test_summary() {
        // 15 units/day: 450 after 30 days, target 500
        let summary = SimulationSummary::from_history(&history(30)).unwrap();
        assert_eq!(summary.days_simulated, 30);
        assert_eq!(summary.harvest_day, None);
        assert_eq!(summary.final_stage, "fruiting");
        assert_eq!(summary.final_harvest_percent, 90.0);
        assert!(summary.to_string().contains("Harvest not reached"));
    }

    #[test]
    fn test_summary_of_empty_history() {
        assert!(SimulationSummary::from_history(&history(0)).is_none());
    }

    #[test]
    fn test_write_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        write_csv(&history(5), &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert!(lines.next().unwrap().starts_with("day_index,temperature_max"));
        assert_eq!(lines.count(), 5);
    }
}
