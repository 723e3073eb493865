// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Uncoherence potential.
//!
//! The scalar the optimiser descends is the sum of four weighted terms:
//!
//! * `gradient_norm = α·|v|`
//! * `paradox_level = β·max(0, −cos(v_prev, v))`, zero until two records exist
//! * `manifold_drift = γ·drift_from_goal(state)`
//! * `holonomy = η·|Σ |∠(dᵢ, dᵢ₊₁) − ∠(dᵢ₋₁, dᵢ)||`, zero until three records exist
//!
//! The holonomy sum walks the whole history on every evaluation, so a run of
//! `n` steps costs `O(n²)` direction comparisons in total.

use serde::{Deserialize, Serialize};

use crate::config::UncoherenceWeights;
use crate::error::{ensure_finite, CoherenceError, Result};
use crate::state::{StepRecord, TrajectoryPoint};
use crate::vector;

/// Weighted uncoherence components. `total` is always their sum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UncoherenceMetrics {
    pub gradient_norm: f64,
    pub paradox_level: f64,
    pub manifold_drift: f64,
    pub holonomy: f64,
    pub total: f64,
}

impl UncoherenceMetrics {
    fn from_components(
        gradient_norm: f64,
        paradox_level: f64,
        manifold_drift: f64,
        holonomy: f64,
    ) -> Self {
        Self {
            gradient_norm,
            paradox_level,
            manifold_drift,
            holonomy,
            total: gradient_norm + paradox_level + manifold_drift + holonomy,
        }
    }
}

/// Evaluates [`UncoherenceMetrics`] for a point given the step history.
#[derive(Clone, Copy, Debug, Default)]
pub struct UncoherenceEvaluator {
    weights: UncoherenceWeights,
}

impl UncoherenceEvaluator {
    pub fn new(weights: UncoherenceWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &UncoherenceWeights {
        &self.weights
    }

    /// Fresh evaluation; nothing is cached between calls.
    pub fn evaluate(
        &self,
        state: &TrajectoryPoint,
        history: &[StepRecord],
    ) -> Result<UncoherenceMetrics> {
        state.check_dims()?;
        let w = &self.weights;

        let speed = vector::norm(&state.velocity);
        let paradox = paradox(state, history);

        let drift = state.manifold().drift_from_goal(state);
        if !drift.is_finite() || drift < 0.0 {
            return Err(CoherenceError::InvalidDrift { value: drift });
        }

        let holonomy = if history.len() >= 3 {
            holonomy_estimate(history)
        } else {
            0.0
        };

        let metrics = UncoherenceMetrics::from_components(
            w.alpha * speed,
            w.beta * paradox,
            w.gamma * drift,
            w.eta * holonomy,
        );
        ensure_finite("uncoherence.total", metrics.total)?;
        Ok(metrics)
    }

    /// Convenience for callers that only need the scalar.
    pub fn total(&self, state: &TrajectoryPoint, history: &[StepRecord]) -> Result<f64> {
        self.evaluate(state, history).map(|metrics| metrics.total)
    }
}

/// Velocity reversal against the most recent post-step velocity, in `[0, 1]`.
///
/// Invariant under positive rescaling of either velocity.
pub fn paradox(state: &TrajectoryPoint, history: &[StepRecord]) -> f64 {
    if history.len() < 2 {
        return 0.0;
    }
    let Some(last) = history.last() else {
        return 0.0;
    };
    (-vector::cos_angle(&last.state_post.velocity, &state.velocity)).max(0.0)
}

/// Total turning variation over every consecutive triple of recorded
/// directions. A sum of absolute differences, so never negative.
pub fn holonomy_estimate(history: &[StepRecord]) -> f64 {
    history
        .windows(3)
        .map(|triple| {
            let before = vector::angle(&triple[0].direction, &triple[1].direction);
            let after = vector::angle(&triple[1].direction, &triple[2].direction);
            (after - before).abs()
        })
        .sum()
}
