//! Climate Scenario Provider
//!
//! Entry point used by simulation callers. Owns the synthetic generator and,
//! optionally, a remote strategy. Always returns a series: remote failures
//! degrade to synthetic data with an informational log line.

use super::{ClimateDay, FallbackSource, ScenarioRequest, ScenarioSource, SyntheticGenerator};

pub struct ClimateScenarioProvider {
    synthetic: SyntheticGenerator,
    remote: Option<Box<dyn ScenarioSource + Send>>,
}

impl ClimateScenarioProvider {
    /// Provider with only the synthetic generator
    pub fn new(synthetic: SyntheticGenerator) -> Self {
        Self {
            synthetic,
            remote: None,
        }
    }

    /// Attach the strategy used when `use_external` is requested
    pub fn with_remote<S>(mut self, remote: S) -> Self
    where
        S: ScenarioSource + Send + 'static,
    {
        self.remote = Some(Box::new(remote));
        self
    }

    /// Whether `use_external` can reach a remote strategy
    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Produce `day_count` days of climate, contiguous from day 1.
    ///
    /// With `use_external == false` no network access happens. With
    /// `use_external == true` the remote strategy gets one attempt; on any
    /// failure the synthetic series is returned instead.
    pub fn generate(
        &mut self,
        description: &str,
        day_count: usize,
        use_external: bool,
    ) -> Vec<ClimateDay> {
        if day_count == 0 {
            return Vec::new();
        }
        let request = ScenarioRequest::new(description, day_count);

        let remote = match self.remote.as_mut() {
            Some(remote) if use_external => remote,
            Some(_) => {
                tracing::info!("Offline mode: using synthetic climate data");
                return self.synthetic.generate_days(day_count);
            }
            None => {
                if use_external {
                    tracing::info!(
                        "No remote scenario service configured: using synthetic climate data"
                    );
                } else {
                    tracing::info!("Offline mode: using synthetic climate data");
                }
                return self.synthetic.generate_days(day_count);
            }
        };

        let result = FallbackSource::new(remote, &mut self.synthetic).generate(&request);
        match result {
            Ok(days) => days,
            // Synthetic generation cannot fail; keep the contract total anyway.
            Err(e) => {
                tracing::warn!("Scenario generation failed: {}", e);
                self.synthetic.generate_days(day_count)
            }
        }
    }
}

impl Default for ClimateScenarioProvider {
    fn default() -> Self {
        Self::new(SyntheticGenerator::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::climate::remote::tests::CannedTransport;
    use crate::climate::RemoteGenerator;

    #[test]
    fn test_offline_matches_synthetic() {
        let mut provider = ClimateScenarioProvider::new(SyntheticGenerator::with_seed(1));
        let days = provider.generate("ignored", 45, false);
        assert_eq!(days, SyntheticGenerator::with_seed(1).generate_days(45));
    }

    #[test]
    fn test_failing_remote_equals_offline() {
        let mut online = ClimateScenarioProvider::new(SyntheticGenerator::with_seed(8))
            .with_remote(RemoteGenerator::new(CannedTransport::status(502)));
        let mut offline = ClimateScenarioProvider::new(SyntheticGenerator::with_seed(8));
        assert!(online.has_remote());
        assert!(!offline.has_remote());
        assert_eq!(online.generate("desc", 60, true), offline.generate("desc", 60, false));
    }

    #[test]
    fn test_remote_success() {
        let mut provider = ClimateScenarioProvider::new(SyntheticGenerator::with_seed(8))
            .with_remote(RemoteGenerator::new(CannedTransport::ok(
                "1,30,20,2000\n2,31,21,2100",
            )));
        let days = provider.generate("desc", 2, true);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].temperature_max, 30.0);
    }

    #[test]
    fn test_remote_not_called_offline() {
        let transport = std::sync::Arc::new(CountingTransport::default());
        let mut provider = ClimateScenarioProvider::new(SyntheticGenerator::with_seed(8))
            .with_remote(RemoteGenerator::new(transport.clone()));
        provider.generate("desc", 5, false);
        assert_eq!(transport.calls.load(std::sync::atomic::Ordering::SeqCst), 0);
        provider.generate("desc", 5, true);
        assert_eq!(transport.calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[test]
    fn test_zero_days() {
        let mut provider = ClimateScenarioProvider::new(SyntheticGenerator::with_seed(8));
        assert!(provider.generate("desc", 0, false).is_empty());
    }

    #[derive(Default)]
    struct CountingTransport {
        calls: std::sync::atomic::AtomicUsize,
    }

    impl crate::climate::ScenarioTransport for std::sync::Arc<CountingTransport> {
        fn fetch(&self, _: &str, _: usize) -> Result<String, crate::error::TransportError> {
            self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Err(crate::error::TransportError::Http("unreachable".into()))
        }
    }
}
