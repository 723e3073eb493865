// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Coherence optimisation on constrained manifolds.
//!
//! A [`CoherenceOptimizer`] walks a [`TrajectoryPoint`] downhill on a scalar
//! "uncoherence" potential made of four terms: gradient magnitude, paradox
//! (reversal against the previous velocity), drift from the goal reported by
//! the point's [`ManifoldAdapter`], and holonomy accumulated along the step
//! history. Each step estimates the gradient by finite differences, projects
//! it onto the tangent space, lifts the direction through a self-dual
//! reflection and optional [`Carrier`] assist when progress stalls, then picks
//! the stride with minimal assessed risk before committing the move through
//! the manifold's exponential map.
//!
//! Risky steps leave a checkpoint ("cairn") of the pre-step state behind, and
//! [`CoherenceOptimizer::get_status_report`] summarises the recent history.

pub mod carrier;
pub mod checkpoint;
pub mod config;
pub mod error;
pub mod gradient;
pub mod lift;
pub mod manifold;
pub mod optimizer;
pub mod report;
pub mod risk;
pub mod stall;
pub mod state;
pub mod stride;
pub mod telemetry;
pub mod uncoherence;
pub mod vector;

#[cfg(test)]
mod testing;

pub use carrier::{Assist, AssistLog, Carrier};
pub use checkpoint::{CheckpointCache, CheckpointKey};
pub use config::{
    CheckpointConfig, GradientConfig, LiftConfig, OptimizerConfig, RiskConfig, StallThresholds,
    StrideConfig, UncoherenceWeights,
};
pub use error::{CoherenceError, ConfigError, ManifoldError, Result};
pub use gradient::GradientEstimator;
pub use lift::{Lift, LiftEngine};
pub use manifold::ManifoldAdapter;
pub use optimizer::CoherenceOptimizer;
pub use report::{StatusReport, StatusSummary, REPORT_WINDOW};
pub use risk::RiskAssessor;
pub use stall::{StallDetector, StallSignal};
pub use state::{StepRecord, TrajectoryPoint};
pub use stride::{StrideSelection, StrideSelector};
pub use telemetry::{init_tracing, InitError};
pub use uncoherence::{UncoherenceEvaluator, UncoherenceMetrics};
