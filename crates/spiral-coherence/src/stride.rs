// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use crate::config::StrideConfig;
use crate::error::Result;
use crate::risk::RiskAssessor;
use crate::state::{StepRecord, TrajectoryPoint};

/// Outcome of a minimal-risk stride search.
#[derive(Clone, Debug, PartialEq)]
pub struct StrideSelection {
    pub stride: f64,
    /// Risk of the chosen candidate; `None` when no candidate was assessed.
    pub risk: Option<f64>,
    /// `(stride, risk)` for every candidate in evaluation order.
    pub candidates: Vec<(f64, f64)>,
}

impl StrideSelection {
    fn idle() -> Self {
        Self {
            stride: 0.0,
            risk: None,
            candidates: Vec::new(),
        }
    }
}

/// Picks the stride with the lowest assessed risk among
/// `min(cap, energy·factor) × multipliers`.
#[derive(Clone, Debug, Default)]
pub struct StrideSelector {
    config: StrideConfig,
}

impl StrideSelector {
    pub fn new(config: StrideConfig) -> Self {
        Self { config }
    }

    pub fn base_stride(&self, state: &TrajectoryPoint) -> f64 {
        self.config.cap.min(state.energy * self.config.energy_factor)
    }

    /// An exactly zero direction short-circuits to stride `0` without
    /// consulting the assessor; arbitrarily small directions are still
    /// searched. Ties keep the earliest candidate.
    pub fn select(
        &self,
        assessor: &RiskAssessor,
        state: &TrajectoryPoint,
        direction: &[f64],
        history: &[StepRecord],
    ) -> Result<StrideSelection> {
        if direction.iter().all(|component| *component == 0.0) {
            return Ok(StrideSelection::idle());
        }

        let base = self.base_stride(state);
        let mut candidates = Vec::with_capacity(self.config.multipliers.len());
        let mut best: Option<(f64, f64)> = None;
        for multiplier in &self.config.multipliers {
            let stride = base * multiplier;
            let risk = assessor.assess(state, direction, stride, history)?;
            candidates.push((stride, risk));
            match best {
                Some((_, best_risk)) if risk >= best_risk => {}
                _ => best = Some((stride, risk)),
            }
        }

        Ok(match best {
            Some((stride, risk)) => StrideSelection {
                stride,
                risk: Some(risk),
                candidates,
            },
            None => StrideSelection::idle(),
        })
    }
}
