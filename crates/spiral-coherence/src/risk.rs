// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use tracing::warn;

use crate::config::RiskConfig;
use crate::error::Result;
use crate::state::{StepRecord, TrajectoryPoint};
use crate::uncoherence::UncoherenceEvaluator;
use crate::vector;

/// Scores a prospective move `(state, direction, stride)`.
///
/// A manifold refusal is the one failure recovered here: the candidate is
/// scored with [`RiskConfig::failure_risk`] instead of aborting the run.
/// Evaluation failures on the predicted point still propagate.
#[derive(Clone, Copy, Debug, Default)]
pub struct RiskAssessor {
    config: RiskConfig,
    evaluator: UncoherenceEvaluator,
}

impl RiskAssessor {
    pub fn new(config: RiskConfig, evaluator: UncoherenceEvaluator) -> Self {
        Self { config, evaluator }
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    pub fn assess(
        &self,
        state: &TrajectoryPoint,
        direction: &[f64],
        stride: f64,
        history: &[StepRecord],
    ) -> Result<f64> {
        let tangent = vector::scaled(direction, stride);
        let next = match state.manifold().exponential_map(state, &tangent) {
            Ok(next) => next,
            Err(err) => {
                warn!(
                    manifold = state.manifold().name(),
                    stride,
                    error = %err,
                    "predicted step refused; scoring with failure risk"
                );
                return Ok(self.config.failure_risk);
            }
        };

        let feasibility = if state.manifold().is_feasible(&next) {
            0.0
        } else {
            self.config.infeasible_penalty
        };
        let energy = self.config.energy_penalty * (-next.energy).max(0.0);
        let uncoherence = self.config.uncoherence_weight * self.evaluator.total(&next, history)?;
        Ok(feasibility + energy + uncoherence)
    }
}
