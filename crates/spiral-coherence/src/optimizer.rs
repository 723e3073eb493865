// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, debug_span, info, info_span};

use crate::carrier::Carrier;
use crate::checkpoint::CheckpointCache;
use crate::config::OptimizerConfig;
use crate::error::{ensure_same_dim, CoherenceError, Result};
use crate::gradient::GradientEstimator;
use crate::lift::LiftEngine;
use crate::report::StatusReport;
use crate::risk::RiskAssessor;
use crate::stall::StallDetector;
use crate::state::{StepRecord, TrajectoryPoint};
use crate::stride::StrideSelector;
use crate::uncoherence::UncoherenceEvaluator;
use crate::vector;

/// Manifold-constrained descent on the uncoherence potential.
///
/// The optimiser owns its step history and checkpoint cache. Both are
/// append-only and live as long as the instance, so long runs grow memory
/// linearly, and [`Self::run_sequence`] keeps appending to the same history
/// across calls.
pub struct CoherenceOptimizer {
    config: OptimizerConfig,
    evaluator: UncoherenceEvaluator,
    gradient: GradientEstimator,
    stall: StallDetector,
    lift: LiftEngine,
    risk: RiskAssessor,
    stride: StrideSelector,
    carriers: Vec<Arc<dyn Carrier>>,
    cache: CheckpointCache,
    history: Vec<StepRecord>,
}

impl fmt::Debug for CoherenceOptimizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoherenceOptimizer")
            .field("config", &self.config)
            .field(
                "carriers",
                &self.carriers.iter().map(|c| c.id()).collect::<Vec<_>>(),
            )
            .field("history_len", &self.history.len())
            .field("cached_checkpoints", &self.cache.len())
            .finish()
    }
}

impl CoherenceOptimizer {
    /// Validates `config` and wires the components.
    pub fn new(config: OptimizerConfig) -> Result<Self> {
        config.validate()?;
        let evaluator = UncoherenceEvaluator::new(config.weights);
        Ok(Self {
            evaluator,
            gradient: GradientEstimator::new(config.gradient),
            stall: StallDetector::new(config.stall),
            lift: LiftEngine::new(config.lift),
            risk: RiskAssessor::new(config.risk, evaluator),
            stride: StrideSelector::new(config.stride.clone()),
            carriers: Vec::new(),
            cache: CheckpointCache::new(),
            history: Vec::new(),
            config,
        })
    }

    /// Appends a carrier; registration order is consultation order.
    pub fn with_carrier(mut self, carrier: Arc<dyn Carrier>) -> Self {
        self.carriers.push(carrier);
        self
    }

    pub fn with_carriers(mut self, carriers: impl IntoIterator<Item = Arc<dyn Carrier>>) -> Self {
        self.carriers.extend(carriers);
        self
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &UncoherenceEvaluator {
        &self.evaluator
    }

    pub fn history(&self) -> &[StepRecord] {
        &self.history
    }

    pub fn checkpoints(&self) -> &CheckpointCache {
        &self.cache
    }

    pub fn carrier_count(&self) -> usize {
        self.carriers.len()
    }

    /// Performs one transition from `state` and records it.
    ///
    /// Only the risk assessor's candidate probes recover from manifold
    /// refusals; a refusal of the committed move is returned as
    /// [`CoherenceError::Manifold`] and nothing is recorded.
    pub fn step(&mut self, state: &TrajectoryPoint) -> Result<StepRecord> {
        let span = debug_span!("coherence.step", index = self.history.len());
        let _guard = span.enter();
        let manifold = Arc::clone(state.manifold());

        let metrics_pre = self.evaluator.evaluate(state, &self.history)?;
        let raw = self.gradient.descent_direction(
            &self.evaluator,
            state,
            &self.history,
            metrics_pre.total,
        )?;
        let projected = manifold.project_to_tangent(state, &raw);
        ensure_same_dim("projected direction", state.dim(), projected.len())?;

        let stall = self.stall.inspect(
            state,
            &self.history,
            vector::norm(&projected),
            metrics_pre.total,
        );
        let (direction, carrier_used) = if stall.is_stalled() {
            debug!(?stall, "stall detected; lifting");
            let lift = self
                .lift
                .apply_koriel_lift(state, &projected, &raw, &self.carriers)?;
            (lift.direction, lift.carrier)
        } else {
            (projected, None)
        };

        let selection = self
            .stride
            .select(&self.risk, state, &direction, &self.history)?;
        let stride = selection.stride;

        let tangent = vector::scaled(&direction, stride);
        let state_post = manifold.exponential_map(state, &tangent)?;

        let risk_level = self.risk.assess(state, &direction, stride, &self.history)?;
        let metrics_post = self.evaluator.evaluate(&state_post, &self.history)?;
        self.cache.cache_if_risky(
            state,
            risk_level,
            self.config.checkpoint.risk_threshold,
            self.history.len(),
        );

        let record = StepRecord {
            state_pre: state.clone(),
            state_post,
            direction,
            stride,
            lift_applied: stall.is_stalled(),
            carrier_used,
            uncoherence_reduction: metrics_pre.total - metrics_post.total,
            risk_level,
            metrics_pre,
            metrics_post,
            stall,
        };
        debug!(
            pre = metrics_pre.total,
            post = metrics_post.total,
            stride,
            lift = record.lift_applied,
            risk = risk_level,
            "step committed"
        );
        self.history.push(record.clone());
        Ok(record)
    }

    /// Steps from `initial` until `max_steps` have run or the post-step total
    /// drops below `target_uncoherence`. At least one step always runs.
    ///
    /// Returns only the records produced by this call; the optimiser's own
    /// history keeps accumulating across calls.
    pub fn run_sequence(
        &mut self,
        initial: TrajectoryPoint,
        max_steps: usize,
        target_uncoherence: f64,
    ) -> Result<Vec<StepRecord>> {
        if max_steps == 0 {
            return Err(CoherenceError::ZeroStepBudget);
        }
        let span = info_span!("coherence.run_sequence", max_steps, target_uncoherence);
        let _guard = span.enter();

        let mut records = Vec::new();
        let mut current = initial;
        loop {
            let record = self.step(&current)?;
            let total = record.metrics_post.total;
            current = record.state_post.clone();
            records.push(record);
            if total < target_uncoherence {
                info!(steps = records.len(), uncoherence = total, "target uncoherence reached");
                break;
            }
            if records.len() >= max_steps {
                info!(steps = records.len(), uncoherence = total, "step budget exhausted");
                break;
            }
        }
        Ok(records)
    }

    pub fn get_status_report(&self) -> StatusReport {
        StatusReport::summarise(&self.history, self.cache.len(), self.carriers.len())
    }
}
