// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use crate::error::ManifoldError;
use crate::state::TrajectoryPoint;

/// Goal manifold supplied by the caller.
///
/// The optimiser never owns a concrete manifold; each [`TrajectoryPoint`]
/// carries a shared handle and every step routes its geometry through it.
/// Implementations shared between optimiser instances must be safe to call
/// concurrently; no locking happens on this side.
pub trait ManifoldAdapter: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &str {
        "manifold"
    }

    /// Restricts a raw descent direction to the admissible directions at `state`.
    fn project_to_tangent(&self, state: &TrajectoryPoint, direction: &[f64]) -> Vec<f64>;

    /// Moves `state` along `tangent`, producing a fresh point. A refusal is
    /// reported through the error half rather than by panicking.
    fn exponential_map(
        &self,
        state: &TrajectoryPoint,
        tangent: &[f64],
    ) -> Result<TrajectoryPoint, ManifoldError>;

    /// Distance of `state` from the goal. Must be finite and non-negative.
    fn drift_from_goal(&self, state: &TrajectoryPoint) -> f64;

    fn is_feasible(&self, state: &TrajectoryPoint) -> bool;
}
