// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::state::StepRecord;
use crate::uncoherence::UncoherenceMetrics;

/// Number of trailing records summarised by the report.
pub const REPORT_WINDOW: usize = 10;

/// Aggregate over the most recent steps.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub total_steps: usize,
    pub latest: UncoherenceMetrics,
    /// Records actually summarised (`min(10, total_steps)`).
    pub window: usize,
    pub mean_reduction: f64,
    pub lift_rate: f64,
    pub mean_stride: f64,
    pub mean_risk: f64,
    pub cached_checkpoints: usize,
    pub carriers: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StatusReport {
    /// Sentinel for an optimiser that has not stepped yet.
    NoSteps,
    Active(StatusSummary),
}

impl StatusReport {
    pub fn summarise(history: &[StepRecord], cached_checkpoints: usize, carriers: usize) -> Self {
        let Some(last) = history.last() else {
            return Self::NoSteps;
        };
        let recent = &history[history.len().saturating_sub(REPORT_WINDOW)..];
        let n = recent.len() as f64;
        let mean = |f: fn(&StepRecord) -> f64| recent.iter().map(f).sum::<f64>() / n;

        Self::Active(StatusSummary {
            total_steps: history.len(),
            latest: last.metrics_post,
            window: recent.len(),
            mean_reduction: mean(|r| r.uncoherence_reduction),
            lift_rate: mean(|r| if r.lift_applied { 1.0 } else { 0.0 }),
            mean_stride: mean(|r| r.stride),
            mean_risk: mean(|r| r.risk_level),
            cached_checkpoints,
            carriers,
        })
    }

    pub fn summary(&self) -> Option<&StatusSummary> {
        match self {
            Self::NoSteps => None,
            Self::Active(summary) => Some(summary),
        }
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSteps => write!(f, "no steps taken"),
            Self::Active(s) => write!(
                f,
                "steps={} uncoherence={:.4} (grad={:.4} paradox={:.4} drift={:.4} holonomy={:.4}) \
                 last{}: reduction={:.4} lift={:.0}% stride={:.4} risk={:.4} cairns={} carriers={}",
                s.total_steps,
                s.latest.total,
                s.latest.gradient_norm,
                s.latest.paradox_level,
                s.latest.manifold_drift,
                s.latest.holonomy,
                s.window,
                s.mean_reduction,
                s.lift_rate * 100.0,
                s.mean_stride,
                s.mean_risk,
                s.cached_checkpoints,
                s.carriers,
            ),
        }
    }
}
