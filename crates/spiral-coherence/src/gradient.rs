// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use crate::config::GradientConfig;
use crate::error::{ensure_finite, Result};
use crate::state::{StepRecord, TrajectoryPoint};
use crate::uncoherence::UncoherenceEvaluator;

/// Forward-difference estimate of the uncoherence gradient with respect to
/// position.
#[derive(Clone, Copy, Debug)]
pub struct GradientEstimator {
    step: f64,
}

impl Default for GradientEstimator {
    fn default() -> Self {
        Self::new(GradientConfig::default())
    }
}

impl GradientEstimator {
    pub fn new(config: GradientConfig) -> Self {
        Self { step: config.step }
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// `∇U` at `state`, reusing the caller's `baseline = U(state)`.
    ///
    /// Performs exactly one evaluation per coordinate. Only the position is
    /// perturbed; velocity, energy, timestamp, metadata, and manifold stay put.
    pub fn gradient(
        &self,
        evaluator: &UncoherenceEvaluator,
        state: &TrajectoryPoint,
        history: &[StepRecord],
        baseline: f64,
    ) -> Result<Vec<f64>> {
        let mut probe = state.clone();
        let mut gradient = Vec::with_capacity(state.dim());
        for i in 0..state.dim() {
            probe.position[i] = state.position[i] + self.step;
            let perturbed = evaluator.total(&probe, history)?;
            probe.position[i] = state.position[i];
            gradient.push(ensure_finite(
                "gradient component",
                (perturbed - baseline) / self.step,
            )?);
        }
        Ok(gradient)
    }

    /// Steepest-descent direction `−∇U`.
    pub fn descent_direction(
        &self,
        evaluator: &UncoherenceEvaluator,
        state: &TrajectoryPoint,
        history: &[StepRecord],
        baseline: f64,
    ) -> Result<Vec<f64>> {
        let mut direction = self.gradient(evaluator, state, history, baseline)?;
        for component in direction.iter_mut() {
            *component = -*component;
        }
        Ok(direction)
    }
}
