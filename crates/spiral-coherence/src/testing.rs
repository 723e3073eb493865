// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Fixtures shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::carrier::{Assist, AssistLog, Carrier};
use crate::error::ManifoldError;
use crate::manifold::ManifoldAdapter;
use crate::stall::StallSignal;
use crate::state::{StepRecord, TrajectoryPoint};
use crate::uncoherence::UncoherenceMetrics;
use crate::vector;

fn translate(state: &TrajectoryPoint, tangent: &[f64]) -> Result<TrajectoryPoint, ManifoldError> {
    state
        .translated(tangent)
        .map_err(|err| ManifoldError::Other(err.to_string()))
}

/// Identity geometry with a constant drift.
#[derive(Default)]
pub struct FlatManifold {
    drift: f64,
}

impl FlatManifold {
    pub fn with_drift(drift: f64) -> Self {
        Self { drift }
    }
}

impl ManifoldAdapter for FlatManifold {
    fn project_to_tangent(&self, _state: &TrajectoryPoint, direction: &[f64]) -> Vec<f64> {
        direction.to_vec()
    }

    fn exponential_map(
        &self,
        state: &TrajectoryPoint,
        tangent: &[f64],
    ) -> Result<TrajectoryPoint, ManifoldError> {
        translate(state, tangent)
    }

    fn drift_from_goal(&self, _state: &TrajectoryPoint) -> f64 {
        self.drift
    }

    fn is_feasible(&self, _state: &TrajectoryPoint) -> bool {
        true
    }
}

/// Identity geometry whose drift is `|x|²`, counting the calls it receives.
#[derive(Default)]
pub struct CountingWell {
    pub drift_calls: AtomicUsize,
    pub exp_calls: AtomicUsize,
}

impl ManifoldAdapter for CountingWell {
    fn project_to_tangent(&self, _state: &TrajectoryPoint, direction: &[f64]) -> Vec<f64> {
        direction.to_vec()
    }

    fn exponential_map(
        &self,
        state: &TrajectoryPoint,
        tangent: &[f64],
    ) -> Result<TrajectoryPoint, ManifoldError> {
        self.exp_calls.fetch_add(1, Ordering::SeqCst);
        translate(state, tangent)
    }

    fn drift_from_goal(&self, state: &TrajectoryPoint) -> f64 {
        self.drift_calls.fetch_add(1, Ordering::SeqCst);
        vector::dot(&state.position, &state.position)
    }

    fn is_feasible(&self, _state: &TrajectoryPoint) -> bool {
        true
    }
}

/// `|x|²` well that refuses steps landing beyond `step_limit` and reports
/// points beyond `feasible_radius` as infeasible.
pub struct FencedWell {
    step_limit: f64,
    feasible_radius: f64,
}

impl ManifoldAdapter for FencedWell {
    fn name(&self) -> &str {
        "fenced-well"
    }

    fn project_to_tangent(&self, _state: &TrajectoryPoint, direction: &[f64]) -> Vec<f64> {
        direction.to_vec()
    }

    fn exponential_map(
        &self,
        state: &TrajectoryPoint,
        tangent: &[f64],
    ) -> Result<TrajectoryPoint, ManifoldError> {
        let next = translate(state, tangent)?;
        if vector::norm(&next.position) > self.step_limit {
            return Err(ManifoldError::infeasible("step crosses the fence"));
        }
        Ok(next)
    }

    fn drift_from_goal(&self, state: &TrajectoryPoint) -> f64 {
        vector::dot(&state.position, &state.position)
    }

    fn is_feasible(&self, state: &TrajectoryPoint) -> bool {
        vector::norm(&state.position) <= self.feasible_radius
    }
}

/// `|x|²` well that refuses any single move longer than `max_step`.
pub struct Leash {
    max_step: f64,
}

impl ManifoldAdapter for Leash {
    fn name(&self) -> &str {
        "leash"
    }

    fn project_to_tangent(&self, _state: &TrajectoryPoint, direction: &[f64]) -> Vec<f64> {
        direction.to_vec()
    }

    fn exponential_map(
        &self,
        state: &TrajectoryPoint,
        tangent: &[f64],
    ) -> Result<TrajectoryPoint, ManifoldError> {
        if vector::norm(tangent) > self.max_step {
            return Err(ManifoldError::infeasible("move exceeds the leash"));
        }
        translate(state, tangent)
    }

    fn drift_from_goal(&self, state: &TrajectoryPoint) -> f64 {
        vector::dot(&state.position, &state.position)
    }

    fn is_feasible(&self, _state: &TrajectoryPoint) -> bool {
        true
    }
}

pub fn flat_point(position: Vec<f64>) -> TrajectoryPoint {
    TrajectoryPoint::new(position, Arc::new(FlatManifold::default()))
}

pub fn quadratic_point(position: Vec<f64>) -> TrajectoryPoint {
    TrajectoryPoint::new(position, Arc::new(CountingWell::default()))
}

pub fn fenced_point(position: Vec<f64>, step_limit: f64, feasible_radius: f64) -> TrajectoryPoint {
    TrajectoryPoint::new(
        position,
        Arc::new(FencedWell {
            step_limit,
            feasible_radius,
        }),
    )
}

pub fn leashed_point(position: Vec<f64>, max_step: f64) -> TrajectoryPoint {
    TrajectoryPoint::new(position, Arc::new(Leash { max_step }))
}

/// Record whose only meaningful fields are `direction` and the post velocity.
pub fn record_with(direction: Vec<f64>, post_velocity: Vec<f64>) -> StepRecord {
    let dim = direction.len();
    let pre = flat_point(vec![0.0; dim]);
    let post = flat_point(vec![0.0; dim]).with_velocity(post_velocity);
    StepRecord {
        state_pre: pre,
        state_post: post,
        direction,
        stride: 0.0,
        lift_applied: false,
        carrier_used: None,
        uncoherence_reduction: 0.0,
        risk_level: 0.0,
        metrics_pre: UncoherenceMetrics::default(),
        metrics_post: UncoherenceMetrics::default(),
        stall: StallSignal::default(),
    }
}

/// Carrier with a fixed eligibility answer and boost.
pub struct ScriptedCarrier {
    id: String,
    eligible: bool,
    boost: Vec<f64>,
    pub consulted: AtomicUsize,
    pub applied: AtomicUsize,
    pub released: AtomicUsize,
}

impl ScriptedCarrier {
    pub fn new(id: &str, eligible: bool, boost: Vec<f64>) -> Self {
        Self {
            id: id.to_string(),
            eligible,
            boost,
            consulted: AtomicUsize::new(0),
            applied: AtomicUsize::new(0),
            released: AtomicUsize::new(0),
        }
    }
}

impl Carrier for ScriptedCarrier {
    fn id(&self) -> &str {
        &self.id
    }

    fn can_assist(&self, _state: &TrajectoryPoint) -> bool {
        self.consulted.fetch_add(1, Ordering::SeqCst);
        self.eligible
    }

    fn apply_assist(&self, _state: &TrajectoryPoint, _direction: &[f64]) -> Assist {
        self.applied.fetch_add(1, Ordering::SeqCst);
        Assist {
            boost: self.boost.clone(),
            log: AssistLog::new(self.id.clone()),
        }
    }

    fn release(&self, log: AssistLog) {
        assert_eq!(log.carrier, self.id);
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}
