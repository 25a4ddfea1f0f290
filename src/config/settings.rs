//! Engine and logging settings
//!
//! These are the knobs read once at startup from `settings.toml`. Every field
//! has a default, so a partial file (or none at all) is valid.
//!
//! # Main Types
//!
//! - [`EngineSettings`] - Sample rate, reconnect policy and evaluation fallback
//! - [`ReconnectPolicy`] - What `connect` does with an input that is already linked
//! - [`LoggingConfig`] - Log filter and optional log file

use crate::graph::components::scope::DEFAULT_SCOPE_CAPACITY;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default sample rate in Hz
pub const DEFAULT_SAMPLE_RATE: f64 = 48_000.0;

/// Value published by a component whose evaluation failed
pub const DEFAULT_FALLBACK_VALUE: f64 = 0.0;

/// Default tracing filter directive
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Behaviour of `connect` when the target input already has a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ReconnectPolicy {
    /// Drop the existing link and create the new one in a single step
    /// (drag-to-reconnect).
    #[default]
    Replace,
    /// Refuse with `InputAlreadyBound`; the caller must disconnect first.
    Reject,
}

impl std::fmt::Display for ReconnectPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReconnectPolicy::Replace => write!(f, "Replace"),
            ReconnectPolicy::Reject => write!(f, "Reject"),
        }
    }
}

/// Settings for a [`Graph`](crate::graph::Graph).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Ticks per second, used for component time and phase
    #[serde(default = "default_sample_rate")]
    pub sample_rate: f64,

    /// Policy for linking into an already-bound input
    #[serde(default)]
    pub reconnect_policy: ReconnectPolicy,

    /// Value published by a failing component
    #[serde(default)]
    pub fallback_value: f64,

    /// Samples kept by each scope component
    #[serde(default = "default_scope_capacity")]
    pub scope_capacity: usize,
}

fn default_sample_rate() -> f64 {
    DEFAULT_SAMPLE_RATE
}

fn default_scope_capacity() -> usize {
    DEFAULT_SCOPE_CAPACITY
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            reconnect_policy: ReconnectPolicy::default(),
            fallback_value: DEFAULT_FALLBACK_VALUE,
            scope_capacity: DEFAULT_SCOPE_CAPACITY,
        }
    }
}

impl EngineSettings {
    /// Check that the settings can drive a graph.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(format!("sample_rate must be positive, got {}", self.sample_rate));
        }
        if !self.fallback_value.is_finite() {
            return Err(format!(
                "fallback_value must be finite, got {}",
                self.fallback_value
            ));
        }
        if self.scope_capacity == 0 {
            return Err("scope_capacity must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn with_policy(mut self, policy: ReconnectPolicy) -> Self {
        self.reconnect_policy = policy;
        self
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set
    #[serde(default = "default_log_filter")]
    pub filter: String,

    /// Also write logs to this file (non-blocking)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            file: None,
        }
    }
}
