//! Fallback Decorator
//!
//! Wraps a primary strategy and a fallback strategy. Any primary failure is
//! logged and answered by the fallback, so callers never see it.

use super::{ClimateDay, ScenarioRequest, ScenarioSource};
use crate::error::ScenarioError;

pub struct FallbackSource<P, F> {
    primary: P,
    fallback: F,
}

impl<P: ScenarioSource, F: ScenarioSource> FallbackSource<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P: ScenarioSource, F: ScenarioSource> ScenarioSource for FallbackSource<P, F> {
    fn name(&self) -> &str {
        self.primary.name()
    }

    fn generate(&mut self, request: &ScenarioRequest) -> Result<Vec<ClimateDay>, ScenarioError> {
        match self.primary.generate(request) {
            Ok(days) => Ok(days),
            Err(e) => {
                tracing::warn!("{} scenario generation failed: {}", self.primary.name(), e);
                tracing::info!("Using {} fallback climate data", self.fallback.name());
                self.fallback.generate(request)
            }
        }
    }
}
