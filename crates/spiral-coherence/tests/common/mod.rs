#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use spiral_coherence::vector;
use spiral_coherence::{
    Assist, AssistLog, Carrier, ManifoldAdapter, ManifoldError, OptimizerConfig, TrajectoryPoint,
    UncoherenceWeights,
};

/// Flat space with drift `|x − goal|²`.
pub struct Paraboloid {
    pub goal: Vec<f64>,
    pub exp_calls: AtomicUsize,
}

impl Paraboloid {
    pub fn centred(dim: usize) -> Self {
        Self::around(vec![0.0; dim])
    }

    pub fn around(goal: Vec<f64>) -> Self {
        Self {
            goal,
            exp_calls: AtomicUsize::new(0),
        }
    }
}

impl ManifoldAdapter for Paraboloid {
    fn name(&self) -> &str {
        "paraboloid"
    }

    fn project_to_tangent(&self, _state: &TrajectoryPoint, direction: &[f64]) -> Vec<f64> {
        direction.to_vec()
    }

    fn exponential_map(
        &self,
        state: &TrajectoryPoint,
        tangent: &[f64],
    ) -> Result<TrajectoryPoint, ManifoldError> {
        self.exp_calls.fetch_add(1, Ordering::SeqCst);
        state
            .translated(tangent)
            .map_err(|err| ManifoldError::Other(err.to_string()))
    }

    fn drift_from_goal(&self, state: &TrajectoryPoint) -> f64 {
        state
            .position
            .iter()
            .zip(&self.goal)
            .map(|(x, g)| (x - g) * (x - g))
            .sum()
    }

    fn is_feasible(&self, _state: &TrajectoryPoint) -> bool {
        true
    }
}

/// Paraboloid whose feasible region is the ball of radius `radius`; moves are
/// never refused, only flagged.
pub struct Ball {
    pub radius: f64,
}

impl ManifoldAdapter for Ball {
    fn name(&self) -> &str {
        "ball"
    }

    fn project_to_tangent(&self, _state: &TrajectoryPoint, direction: &[f64]) -> Vec<f64> {
        direction.to_vec()
    }

    fn exponential_map(
        &self,
        state: &TrajectoryPoint,
        tangent: &[f64],
    ) -> Result<TrajectoryPoint, ManifoldError> {
        state
            .translated(tangent)
            .map_err(|err| ManifoldError::Other(err.to_string()))
    }

    fn drift_from_goal(&self, state: &TrajectoryPoint) -> f64 {
        vector::dot(&state.position, &state.position)
    }

    fn is_feasible(&self, state: &TrajectoryPoint) -> bool {
        vector::norm(&state.position) <= self.radius
    }
}

/// Manifold that refuses every move.
pub struct Wall;

impl ManifoldAdapter for Wall {
    fn project_to_tangent(&self, _state: &TrajectoryPoint, direction: &[f64]) -> Vec<f64> {
        direction.to_vec()
    }

    fn exponential_map(
        &self,
        _state: &TrajectoryPoint,
        _tangent: &[f64],
    ) -> Result<TrajectoryPoint, ManifoldError> {
        Err(ManifoldError::singular("wall"))
    }

    fn drift_from_goal(&self, state: &TrajectoryPoint) -> f64 {
        vector::dot(&state.position, &state.position)
    }

    fn is_feasible(&self, _state: &TrajectoryPoint) -> bool {
        false
    }
}

/// `|x|²` well whose tangent space is empty: every projected direction is zero.
#[derive(Default)]
pub struct Pinned {
    pub exp_calls: AtomicUsize,
}

impl ManifoldAdapter for Pinned {
    fn name(&self) -> &str {
        "pinned"
    }

    fn project_to_tangent(&self, _state: &TrajectoryPoint, direction: &[f64]) -> Vec<f64> {
        vec![0.0; direction.len()]
    }

    fn exponential_map(
        &self,
        state: &TrajectoryPoint,
        tangent: &[f64],
    ) -> Result<TrajectoryPoint, ManifoldError> {
        self.exp_calls.fetch_add(1, Ordering::SeqCst);
        state
            .translated(tangent)
            .map_err(|err| ManifoldError::Other(err.to_string()))
    }

    fn drift_from_goal(&self, state: &TrajectoryPoint) -> f64 {
        vector::dot(&state.position, &state.position)
    }

    fn is_feasible(&self, _state: &TrajectoryPoint) -> bool {
        true
    }
}

/// Carrier that always assists with a fixed boost and counts its calls.
pub struct Tug {
    id: String,
    boost: Vec<f64>,
    pub assists: AtomicUsize,
    pub releases: AtomicUsize,
}

impl Tug {
    pub fn new(id: &str, boost: Vec<f64>) -> Self {
        Self {
            id: id.to_string(),
            boost,
            assists: AtomicUsize::new(0),
            releases: AtomicUsize::new(0),
        }
    }
}

impl Carrier for Tug {
    fn id(&self) -> &str {
        &self.id
    }

    fn can_assist(&self, _state: &TrajectoryPoint) -> bool {
        true
    }

    fn apply_assist(&self, _state: &TrajectoryPoint, _direction: &[f64]) -> Assist {
        self.assists.fetch_add(1, Ordering::SeqCst);
        Assist {
            boost: self.boost.clone(),
            log: AssistLog::new(self.id.clone()).with_payload(self.boost.clone()),
        }
    }

    fn release(&self, _log: AssistLog) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn drift_only_config() -> OptimizerConfig {
    OptimizerConfig::default().with_weights(UncoherenceWeights::drift_only(1.0))
}

pub fn point_on(manifold: Arc<dyn ManifoldAdapter>, position: Vec<f64>) -> TrajectoryPoint {
    TrajectoryPoint::new(position, manifold)
}
