// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Escape booster applied when the optimiser stalls.
//!
//! The lifted direction is `d + λ·(s + b)` where `s` is the self-dual
//! reflection offset of the position and `b` the boost of the first eligible
//! carrier (or zero). The reflection axis comes from the velocity or, at rest,
//! the unprojected gradient, so a tangent projection that flattens the
//! gradient still leaves an escape direction.

use std::sync::Arc;

use tracing::debug;

use crate::carrier::Carrier;
use crate::config::LiftConfig;
use crate::error::{ensure_same_dim, Result};
use crate::state::TrajectoryPoint;
use crate::vector;

/// Lifted direction and the id of the carrier that assisted, if any.
#[derive(Clone, Debug, PartialEq)]
pub struct Lift {
    pub direction: Vec<f64>,
    pub carrier: Option<String>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LiftEngine {
    lambda: f64,
}

impl LiftEngine {
    pub fn new(config: LiftConfig) -> Self {
        Self {
            lambda: config.lambda,
        }
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Boosts the projected `direction` with the self-dual reflection and at
    /// most one carrier. `gradient` is the raw (unprojected) descent
    /// direction; only its axis is used.
    pub fn apply_koriel_lift(
        &self,
        state: &TrajectoryPoint,
        direction: &[f64],
        gradient: &[f64],
        carriers: &[Arc<dyn Carrier>],
    ) -> Result<Lift> {
        ensure_same_dim("lift direction", state.dim(), direction.len())?;
        ensure_same_dim("lift gradient", state.dim(), gradient.len())?;
        let mut offset = self_dual(state, gradient);

        let mut used = None;
        if let Some(carrier) = carriers.iter().find(|c| c.can_assist(state)) {
            let assist = carrier.apply_assist(state, direction);
            carrier.release(assist.log);
            ensure_same_dim("carrier boost", direction.len(), assist.boost.len())?;
            debug!(
                carrier = carrier.id(),
                boost = vector::norm(&assist.boost),
                "carrier assisted lift"
            );
            offset = vector::add(&offset, &assist.boost);
            used = Some(carrier.id().to_string());
        }

        let lifted = vector::add(direction, &vector::scaled(&offset, self.lambda));
        Ok(Lift {
            direction: lifted,
            carrier: used,
        })
    }
}

/// Offset from the position to its mirror image across the hyperplane normal
/// to the unit velocity (falling back to the unit gradient).
///
/// For a unit normal `n` the reflection is `p − 2(p·n)n`, so the offset is
/// `−2(p·n)n`. Both axes vanishing yields the zero vector.
pub fn self_dual(state: &TrajectoryPoint, gradient: &[f64]) -> Vec<f64> {
    let axis = vector::unit(&state.velocity).or_else(|| vector::unit(gradient));
    match axis {
        Some(normal) => {
            let projection = vector::dot(&state.position, &normal);
            vector::scaled(&normal, -2.0 * projection)
        }
        None => vec![0.0; state.dim()],
    }
}
