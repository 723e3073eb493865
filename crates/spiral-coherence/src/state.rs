// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{ensure_same_dim, Result};
use crate::manifold::ManifoldAdapter;
use crate::stall::StallSignal;
use crate::uncoherence::UncoherenceMetrics;

/// Point on the optimised trajectory.
///
/// Points are never mutated once handed to the optimiser; the manifold's
/// exponential map produces the successor.
#[derive(Clone)]
pub struct TrajectoryPoint {
    pub position: Vec<f64>,
    pub velocity: Vec<f64>,
    manifold: Arc<dyn ManifoldAdapter>,
    pub energy: f64,
    pub timestamp: f64,
    pub metadata: BTreeMap<String, Value>,
}

impl TrajectoryPoint {
    /// Creates a point at rest with unit energy at time zero.
    pub fn new(position: Vec<f64>, manifold: Arc<dyn ManifoldAdapter>) -> Self {
        let velocity = vec![0.0; position.len()];
        Self {
            position,
            velocity,
            manifold,
            energy: 1.0,
            timestamp: 0.0,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_velocity(mut self, velocity: Vec<f64>) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_energy(mut self, energy: f64) -> Self {
        self.energy = energy;
        self
    }

    pub fn with_timestamp(mut self, timestamp: f64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Same point with a different position; everything else is carried over.
    pub fn with_position(&self, position: Vec<f64>) -> Self {
        Self {
            position,
            ..self.clone()
        }
    }

    pub fn dim(&self) -> usize {
        self.position.len()
    }

    pub fn manifold(&self) -> &Arc<dyn ManifoldAdapter> {
        &self.manifold
    }

    /// Successor used by flat manifolds: the position moves by `tangent`, the
    /// velocity becomes `tangent`, and the clock advances by one tick.
    pub fn translated(&self, tangent: &[f64]) -> Result<Self> {
        ensure_same_dim("tangent", self.dim(), tangent.len())?;
        let position = self
            .position
            .iter()
            .zip(tangent)
            .map(|(p, t)| p + t)
            .collect();
        Ok(Self {
            position,
            velocity: tangent.to_vec(),
            manifold: Arc::clone(&self.manifold),
            energy: self.energy,
            timestamp: self.timestamp + 1.0,
            metadata: self.metadata.clone(),
        })
    }

    /// Position and velocity must agree on dimensionality.
    pub fn check_dims(&self) -> Result<()> {
        ensure_same_dim("velocity", self.dim(), self.velocity.len())
    }
}

impl fmt::Debug for TrajectoryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrajectoryPoint")
            .field("position", &self.position)
            .field("velocity", &self.velocity)
            .field("manifold", &self.manifold.name())
            .field("energy", &self.energy)
            .field("timestamp", &self.timestamp)
            .field("metadata", &self.metadata)
            .finish()
    }
}

/// Immutable record of one optimiser transition.
#[derive(Clone, Debug)]
pub struct StepRecord {
    pub state_pre: TrajectoryPoint,
    pub state_post: TrajectoryPoint,
    /// Direction after tangent projection and (when stalled) the lift.
    pub direction: Vec<f64>,
    pub stride: f64,
    pub lift_applied: bool,
    pub carrier_used: Option<String>,
    /// Pre-step total minus post-step total; negative when the step hurt.
    pub uncoherence_reduction: f64,
    pub risk_level: f64,
    pub metrics_pre: UncoherenceMetrics,
    pub metrics_post: UncoherenceMetrics,
    pub stall: StallSignal,
}
