// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoherenceError>;

/// Errors surfaced by the coherence optimiser.
///
/// Only the risk assessor recovers from a failed manifold step (by scoring the
/// candidate with the failure sentinel). Every other variant propagates out of
/// `step` and `run_sequence` and terminates the run.
#[derive(Debug, Error)]
pub enum CoherenceError {
    #[error("dimension mismatch in {context}: expected {expected}, found {found}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("manifold drift must be finite and non-negative (got {value})")]
    InvalidDrift { value: f64 },
    #[error("non-finite value for {label}: {value}")]
    NonFinite { label: &'static str, value: f64 },
    #[error("manifold step failed: {0}")]
    Manifold(#[from] ManifoldError),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("run_sequence requires at least one step")]
    ZeroStepBudget,
}

/// Failure half of [`crate::ManifoldAdapter::exponential_map`].
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ManifoldError {
    #[error("step leaves the feasible region: {reason}")]
    Infeasible { reason: String },
    #[error("geodesic is undefined at this point: {reason}")]
    Singular { reason: String },
    #[error("{0}")]
    Other(String),
}

impl ManifoldError {
    pub fn infeasible(reason: impl Into<String>) -> Self {
        Self::Infeasible {
            reason: reason.into(),
        }
    }

    pub fn singular(reason: impl Into<String>) -> Self {
        Self::Singular {
            reason: reason.into(),
        }
    }
}

/// Errors raised while loading or validating an [`crate::OptimizerConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

pub(crate) fn ensure_same_dim(context: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(CoherenceError::DimensionMismatch {
            context,
            expected,
            found,
        });
    }
    Ok(())
}

pub(crate) fn ensure_finite(label: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CoherenceError::NonFinite { label, value })
    }
}
