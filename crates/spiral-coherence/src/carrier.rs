// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::state::TrajectoryPoint;

/// Receipt handed back to a carrier once its boost has been folded in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssistLog {
    pub carrier: String,
    #[serde(default)]
    pub payload: Value,
}

impl AssistLog {
    pub fn new(carrier: impl Into<String>) -> Self {
        Self {
            carrier: carrier.into(),
            payload: Value::Null,
        }
    }

    pub fn with_payload(mut self, payload: impl Into<Value>) -> Self {
        self.payload = payload.into();
        self
    }
}

/// Boost proposed by a carrier together with the log it expects back.
#[derive(Clone, Debug, PartialEq)]
pub struct Assist {
    pub boost: Vec<f64>,
    pub log: AssistLog,
}

/// External assistance provider consulted while lifting out of a stall.
///
/// Carriers are tried in registration order and only the first one whose
/// [`Carrier::can_assist`] returns `true` is used for a given lift.
pub trait Carrier: Send + Sync {
    fn id(&self) -> &str;

    fn can_assist(&self, state: &TrajectoryPoint) -> bool;

    /// Proposes a boost with the same dimensionality as `direction`.
    fn apply_assist(&self, state: &TrajectoryPoint, direction: &[f64]) -> Assist;

    /// Called exactly once after [`Carrier::apply_assist`].
    fn release(&self, log: AssistLog);
}
