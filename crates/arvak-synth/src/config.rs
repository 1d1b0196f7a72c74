//! Optimizer configuration.
//!
//! Every knob has a default, so an empty YAML/JSON document deserializes to
//! [`SynthesisConfig::default`]. Keys are kebab-case:
//!
//! ```yaml
//! threshold: 1.0e-9
//! max-iters: 100000
//! slowdown-factor: 0.0
//! reinit-interval: 1000
//! log-interval: 100
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{SynthError, SynthResult};

/// Knobs of the alternating-sweep optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SynthesisConfig {
    /// Stop once two consecutive costs differ by at most this much.
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Hard cap on the number of sweep pairs.
    #[serde(default = "default_max_iters")]
    pub max_iters: usize,

    /// Weight of the current block added to its environment before the
    /// SVD projection. Zero disables damping.
    #[serde(default)]
    pub slowdown_factor: f64,

    /// Rebuild the circuit tensor from scratch every this many iterations.
    #[serde(default = "default_reinit_interval")]
    pub reinit_interval: usize,

    /// Report progress to the observer every this many iterations.
    #[serde(default = "default_log_interval")]
    pub log_interval: usize,
}

fn default_threshold() -> f64 {
    1e-9
}

fn default_max_iters() -> usize {
    100_000
}

fn default_reinit_interval() -> usize {
    1000
}

fn default_log_interval() -> usize {
    100
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            max_iters: default_max_iters(),
            slowdown_factor: 0.0,
            reinit_interval: default_reinit_interval(),
            log_interval: default_log_interval(),
        }
    }
}

impl SynthesisConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the convergence threshold.
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the iteration cap.
    #[must_use]
    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Set the damping weight.
    #[must_use]
    pub fn with_slowdown_factor(mut self, slowdown_factor: f64) -> Self {
        self.slowdown_factor = slowdown_factor;
        self
    }

    /// Set the re-synchronization interval.
    #[must_use]
    pub fn with_reinit_interval(mut self, reinit_interval: usize) -> Self {
        self.reinit_interval = reinit_interval;
        self
    }

    /// Set the progress reporting interval.
    #[must_use]
    pub fn with_log_interval(mut self, log_interval: usize) -> Self {
        self.log_interval = log_interval;
        self
    }

    /// Check that every knob is in range.
    pub fn validate(&self) -> SynthResult<()> {
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(SynthError::InvalidConfig(format!(
                "threshold must be positive and finite, got {}",
                self.threshold
            )));
        }
        if self.max_iters == 0 {
            return Err(SynthError::InvalidConfig(
                "max-iters must be at least 1".into(),
            ));
        }
        if !self.slowdown_factor.is_finite() || self.slowdown_factor < 0.0 {
            return Err(SynthError::InvalidConfig(format!(
                "slowdown-factor must be non-negative and finite, got {}",
                self.slowdown_factor
            )));
        }
        if self.reinit_interval == 0 {
            return Err(SynthError::InvalidConfig(
                "reinit-interval must be at least 1".into(),
            ));
        }
        if self.log_interval == 0 {
            return Err(SynthError::InvalidConfig(
                "log-interval must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = SynthesisConfig::default();
        assert_eq!(cfg.threshold, 1e-9);
        assert_eq!(cfg.max_iters, 100_000);
        assert_eq!(cfg.slowdown_factor, 0.0);
        assert_eq!(cfg.reinit_interval, 1000);
        assert_eq!(cfg.log_interval, 100);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let cfg: SynthesisConfig = serde_json::from_str(r#"{"max-iters": 50}"#).unwrap();
        assert_eq!(cfg.max_iters, 50);
        assert_eq!(cfg.threshold, 1e-9);
        assert_eq!(cfg.reinit_interval, 1000);
    }

    #[test]
    fn test_invalid_knobs() {
        assert!(SynthesisConfig::new().with_threshold(0.0).validate().is_err());
        assert!(
            SynthesisConfig::new()
                .with_threshold(f64::NAN)
                .validate()
                .is_err()
        );
        assert!(SynthesisConfig::new().with_max_iters(0).validate().is_err());
        assert!(
            SynthesisConfig::new()
                .with_slowdown_factor(-1.0)
                .validate()
                .is_err()
        );
        assert!(
            SynthesisConfig::new()
                .with_reinit_interval(0)
                .validate()
                .is_err()
        );
        assert!(SynthesisConfig::new().with_log_interval(0).validate().is_err());
    }
}
