// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

// Run with `SPIRAL_COHERENCE_LOG=debug cargo run -p spiral-coherence --example sphere_descent`
// to watch every committed step.

use std::sync::Arc;

use spiral_coherence::vector;
use spiral_coherence::{
    init_tracing, Assist, AssistLog, Carrier, CoherenceOptimizer, ManifoldAdapter, ManifoldError,
    OptimizerConfig, TrajectoryPoint, UncoherenceWeights,
};

/// Unit sphere with a fixed goal point; drift is the squared chord distance.
struct Sphere {
    goal: Vec<f64>,
}

impl ManifoldAdapter for Sphere {
    fn name(&self) -> &str {
        "sphere"
    }

    fn project_to_tangent(&self, state: &TrajectoryPoint, direction: &[f64]) -> Vec<f64> {
        let radial = vector::dot(direction, &state.position);
        vector::add(direction, &vector::scaled(&state.position, -radial))
    }

    fn exponential_map(
        &self,
        state: &TrajectoryPoint,
        tangent: &[f64],
    ) -> Result<TrajectoryPoint, ManifoldError> {
        let moved = vector::add(&state.position, tangent);
        let position = vector::unit(&moved)
            .ok_or_else(|| ManifoldError::singular("step passes through the origin"))?;
        let velocity = vector::add(&position, &vector::scaled(&state.position, -1.0));
        let mut next = state.with_position(position).with_velocity(velocity);
        next.timestamp += 1.0;
        Ok(next)
    }

    fn drift_from_goal(&self, state: &TrajectoryPoint) -> f64 {
        let gap = vector::add(&state.position, &vector::scaled(&self.goal, -1.0));
        vector::dot(&gap, &gap)
    }

    fn is_feasible(&self, state: &TrajectoryPoint) -> bool {
        (vector::norm(&state.position) - 1.0).abs() < 1e-9
    }
}

/// Pushes towards the goal whenever the walker is far from it.
struct Beacon {
    goal: Vec<f64>,
}

impl Carrier for Beacon {
    fn id(&self) -> &str {
        "beacon"
    }

    fn can_assist(&self, state: &TrajectoryPoint) -> bool {
        vector::dot(&state.position, &self.goal) < 0.5
    }

    fn apply_assist(&self, state: &TrajectoryPoint, _direction: &[f64]) -> Assist {
        let pull = vector::add(&self.goal, &vector::scaled(&state.position, -1.0));
        Assist {
            log: AssistLog::new("beacon").with_payload(vector::norm(&pull)),
            boost: pull,
        }
    }

    fn release(&self, log: AssistLog) {
        tracing::debug!(payload = %log.payload, "beacon released");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;

    let goal = vec![0.0, 0.0, 1.0];
    let config = OptimizerConfig::default()
        .with_weights(UncoherenceWeights {
            alpha: 0.05,
            beta: 0.1,
            gamma: 1.0,
            eta: 0.01,
        })
        .with_checkpoint_threshold(1.5);
    let mut optimizer = CoherenceOptimizer::new(config)?.with_carrier(Arc::new(Beacon {
        goal: goal.clone(),
    }));

    let start = TrajectoryPoint::new(vec![1.0, 0.0, 0.0], Arc::new(Sphere { goal }))
        .with_energy(5.0)
        .with_metadata("run", "sphere-demo");
    let records = optimizer.run_sequence(start, 200, 1e-3)?;

    if let Some(last) = records.last() {
        println!("final position: {:?}", last.state_post.position);
    }
    println!("{}", optimizer.get_status_report());
    Ok(())
}
