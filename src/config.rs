//! Run Configuration
//!
//! Inputs for the `simulate` binary, read from environment variables with
//! defaults. The library itself never reads the environment.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PROFILE: &str = "crops/tomato_rio_grande.json";
pub const DEFAULT_DESCRIPTION: &str =
    "A standard summer on the coast of Lima, Peru, with high humidity and mild nights.";
pub const DEFAULT_DAYS: usize = 120;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// CROP_PROFILE
    pub profile_path: PathBuf,
    /// SCENARIO_DESCRIPTION
    pub description: String,
    /// SCENARIO_DAYS
    pub days: usize,
    /// SCENARIO_ONLINE
    pub online: bool,
    /// SCENARIO_SEED
    pub seed: Option<u64>,
    /// GEMINI_API_KEY
    pub api_key: Option<String>,
    /// GEMINI_MODEL
    pub model: Option<String>,
    /// REMOTE_TIMEOUT_SECS
    pub remote_timeout: Duration,
    /// REPORT_CSV
    pub report_csv: Option<PathBuf>,
}

impl RunConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unparsable values fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            profile_path: non_empty("CROP_PROFILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PROFILE)),
            description: non_empty("SCENARIO_DESCRIPTION")
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            days: non_empty("SCENARIO_DAYS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_DAYS),
            online: non_empty("SCENARIO_ONLINE")
                .map(|v| {
                    matches!(
                        v.trim().to_ascii_lowercase().as_str(),
                        "1" | "true" | "yes" | "on"
                    )
                })
                .unwrap_or(false),
            seed: non_empty("SCENARIO_SEED").and_then(|v| v.trim().parse().ok()),
            api_key: non_empty("GEMINI_API_KEY"),
            model: non_empty("GEMINI_MODEL"),
            remote_timeout: Duration::from_secs(
                non_empty("REMOTE_TIMEOUT_SECS")
                    .and_then(|v| v.trim().parse().ok())
                    .filter(|secs| *secs > 0)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            report_csv: non_empty("REPORT_CSV").map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> RunConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RunConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]);
        assert_eq!(cfg.profile_path, PathBuf::from(DEFAULT_PROFILE));
        assert_eq!(cfg.days, 120);
        assert!(!cfg.online);
        assert_eq!(cfg.seed, None);
        assert_eq!(cfg.remote_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            ("SCENARIO_DAYS", "200"),
            ("SCENARIO_ONLINE", "TRUE"),
            ("SCENARIO_SEED", "42"),
            ("REMOTE_TIMEOUT_SECS", "5"),
            ("REPORT_CSV", "out/history.csv"),
        ]);
        assert_eq!(cfg.days, 200);
        assert!(cfg.online);
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.remote_timeout, Duration::from_secs(5));
        assert_eq!(cfg.report_csv, Some(PathBuf::from("out/history.csv")));
    }

    #[test]
    fn test_bad_values_fall_back() {
        let cfg = config(&[
            ("SCENARIO_DAYS", "many"),
            ("REMOTE_TIMEOUT_SECS", "0"),
            ("GEMINI_API_KEY", " "),
        ]);
        assert_eq!(cfg.days, DEFAULT_DAYS);
        assert_eq!(cfg.remote_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(cfg.api_key, None);
    }
}
