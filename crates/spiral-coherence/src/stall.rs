// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use serde::{Deserialize, Serialize};

use crate::config::StallThresholds;
use crate::state::{StepRecord, TrajectoryPoint};

/// Which plateau clauses fired for a step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StallSignal {
    pub low_energy: bool,
    pub low_progress: bool,
    pub flat_gradient: bool,
}

impl StallSignal {
    pub fn is_stalled(&self) -> bool {
        self.low_energy || self.low_progress || self.flat_gradient
    }
}

/// Plateau test over energy, recent progress, and the projected gradient.
#[derive(Clone, Copy, Debug, Default)]
pub struct StallDetector {
    thresholds: StallThresholds,
}

impl StallDetector {
    pub fn new(thresholds: StallThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &StallThresholds {
        &self.thresholds
    }

    /// Evaluates every clause. Nothing fires until the history holds at least
    /// `window` records.
    pub fn inspect(
        &self,
        state: &TrajectoryPoint,
        history: &[StepRecord],
        projected_gradient_norm: f64,
        total_uncoherence: f64,
    ) -> StallSignal {
        let t = &self.thresholds;
        if history.len() < t.window {
            return StallSignal::default();
        }

        let recent = &history[history.len() - t.window..];
        let mean_reduction =
            recent.iter().map(|r| r.uncoherence_reduction).sum::<f64>() / recent.len() as f64;

        StallSignal {
            low_energy: state.energy < t.energy,
            low_progress: mean_reduction < t.epsilon,
            flat_gradient: projected_gradient_norm < t.gradient
                && total_uncoherence > t.uncoherence,
        }
    }

    pub fn detect(
        &self,
        state: &TrajectoryPoint,
        history: &[StepRecord],
        projected_gradient_norm: f64,
        total_uncoherence: f64,
    ) -> bool {
        self.inspect(state, history, projected_gradient_norm, total_uncoherence)
            .is_stalled()
    }
}
