// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Construction-time knobs for the coherence optimiser.
//!
//! Every section implements [`Default`] and missing keys fall back to those
//! defaults, so a TOML layer only needs to spell out what it overrides:
//!
//! ```toml
//! [weights]
//! alpha = 0.0
//! gamma = 2.0
//!
//! [stall]
//! window = 8
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Weights applied to the four uncoherence components.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UncoherenceWeights {
    /// Velocity magnitude weight (α).
    pub alpha: f64,
    /// Velocity reversal weight (β).
    pub beta: f64,
    /// Manifold drift weight (γ).
    pub gamma: f64,
    /// Holonomy weight (η).
    pub eta: f64,
}

impl Default for UncoherenceWeights {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            beta: 1.0,
            gamma: 1.0,
            eta: 1.0,
        }
    }
}

impl UncoherenceWeights {
    /// Weights that only keep the drift term, handy for pure potential descent.
    pub const fn drift_only(gamma: f64) -> Self {
        Self {
            alpha: 0.0,
            beta: 0.0,
            gamma,
            eta: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GradientConfig {
    /// Forward-difference step `h`.
    pub step: f64,
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self { step: 1e-5 }
    }
}

/// Plateau thresholds consumed by [`crate::StallDetector`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StallThresholds {
    /// Stall when the trajectory energy drops below this value.
    pub energy: f64,
    /// Projected gradient norm considered flat.
    pub gradient: f64,
    /// Uncoherence that still counts as "far" while the gradient is flat.
    pub uncoherence: f64,
    /// Minimum mean reduction over the window.
    pub epsilon: f64,
    /// Number of trailing records inspected (`k_stall`).
    pub window: usize,
}

impl Default for StallThresholds {
    fn default() -> Self {
        Self {
            energy: 0.05,
            gradient: 1e-3,
            uncoherence: 0.1,
            epsilon: 1e-4,
            window: 5,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LiftConfig {
    /// Scale applied to the self-dual reflection plus carrier boost (λ_lift).
    pub lambda: f64,
}

impl Default for LiftConfig {
    fn default() -> Self {
        Self { lambda: 0.1 }
    }
}

/// Candidate strides are `min(cap, energy * energy_factor) * multiplier`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StrideConfig {
    /// Ordered multipliers; ties resolve to the earliest entry.
    pub multipliers: Vec<f64>,
    pub cap: f64,
    pub energy_factor: f64,
}

impl Default for StrideConfig {
    fn default() -> Self {
        Self {
            multipliers: vec![0.1, 0.5, 1.0, 2.0],
            cap: 1.0,
            energy_factor: 0.1,
        }
    }
}

/// Penalty weights used by [`crate::RiskAssessor`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RiskConfig {
    /// Added when the predicted state is not feasible.
    pub infeasible_penalty: f64,
    /// Multiplies `max(0, -energy)` of the predicted state.
    pub energy_penalty: f64,
    /// Multiplies the predicted total uncoherence.
    pub uncoherence_weight: f64,
    /// Risk reported when the manifold refuses the predicted step.
    pub failure_risk: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            infeasible_penalty: 50.0,
            energy_penalty: 10.0,
            uncoherence_weight: 1.0,
            failure_risk: 100.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CheckpointConfig {
    /// Pre-step states are cached when the committed move's risk exceeds this.
    pub risk_threshold: f64,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            risk_threshold: 10.0,
        }
    }
}

/// Full optimiser configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OptimizerConfig {
    pub weights: UncoherenceWeights,
    pub gradient: GradientConfig,
    pub stall: StallThresholds,
    pub lift: LiftConfig,
    pub stride: StrideConfig,
    pub risk: RiskConfig,
    pub checkpoint: CheckpointConfig,
}

impl OptimizerConfig {
    pub fn with_weights(mut self, weights: UncoherenceWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_stall(mut self, stall: StallThresholds) -> Self {
        self.stall = stall;
        self
    }

    pub fn with_stride(mut self, stride: StrideConfig) -> Self {
        self.stride = stride;
        self
    }

    pub fn with_risk(mut self, risk: RiskConfig) -> Self {
        self.risk = risk;
        self
    }

    pub fn with_lift_lambda(mut self, lambda: f64) -> Self {
        self.lift.lambda = lambda;
        self
    }

    pub fn with_checkpoint_threshold(mut self, threshold: f64) -> Self {
        self.checkpoint.risk_threshold = threshold;
        self
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file. `.json` files are parsed as JSON, anything
    /// else as TOML.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_toml_str(&text)
        }
    }

    /// Checks every knob for values the optimiser cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.weights;
        for (field, value) in [
            ("weights.alpha", w.alpha),
            ("weights.beta", w.beta),
            ("weights.gamma", w.gamma),
            ("weights.eta", w.eta),
        ] {
            non_negative(field, value)?;
        }

        if !(self.gradient.step.is_finite() && self.gradient.step > 0.0) {
            return Err(ConfigError::invalid(
                "gradient.step",
                format!("expected a positive finite step, got {}", self.gradient.step),
            ));
        }

        let s = &self.stall;
        for (field, value) in [
            ("stall.energy", s.energy),
            ("stall.gradient", s.gradient),
            ("stall.uncoherence", s.uncoherence),
            ("stall.epsilon", s.epsilon),
        ] {
            finite(field, value)?;
        }
        if s.window == 0 {
            return Err(ConfigError::invalid("stall.window", "window must be at least 1"));
        }

        finite("lift.lambda", self.lift.lambda)?;

        let stride = &self.stride;
        if stride.multipliers.is_empty() {
            return Err(ConfigError::invalid(
                "stride.multipliers",
                "at least one candidate multiplier is required",
            ));
        }
        if let Some(bad) = stride
            .multipliers
            .iter()
            .copied()
            .find(|m| !(m.is_finite() && *m > 0.0))
        {
            return Err(ConfigError::invalid(
                "stride.multipliers",
                format!("multipliers must be positive and finite, got {bad}"),
            ));
        }
        positive("stride.cap", stride.cap)?;
        positive("stride.energy_factor", stride.energy_factor)?;

        let r = &self.risk;
        for (field, value) in [
            ("risk.infeasible_penalty", r.infeasible_penalty),
            ("risk.energy_penalty", r.energy_penalty),
            ("risk.uncoherence_weight", r.uncoherence_weight),
            ("risk.failure_risk", r.failure_risk),
        ] {
            non_negative(field, value)?;
        }

        finite("checkpoint.risk_threshold", self.checkpoint.risk_threshold)?;
        Ok(())
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("expected a finite value, got {value}")))
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(ConfigError::invalid(
            field,
            format!("expected a non-negative value, got {value}"),
        ));
    }
    Ok(())
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value <= 0.0 {
        return Err(ConfigError::invalid(
            field,
            format!("expected a positive value, got {value}"),
        ));
    }
    Ok(())
}
