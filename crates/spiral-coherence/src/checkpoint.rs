// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Risk-triggered snapshots ("cairns") of pre-step states.
//!
//! Entries are only ever added; nothing is evicted, so the cache grows with
//! the number of risky steps for the lifetime of the optimiser. Reading the
//! stored points back is left to callers building replay or rollback on top.

use std::collections::BTreeMap;
use std::fmt;

use tracing::info;

use crate::state::TrajectoryPoint;

/// Key of a stored snapshot: the pre-step timestamp and the history length at
/// the time of the step. Unique within one optimiser because the history
/// length strictly increases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CheckpointKey {
    history_len: usize,
    timestamp_bits: u64,
}

impl CheckpointKey {
    pub fn new(timestamp: f64, history_len: usize) -> Self {
        Self {
            history_len,
            timestamp_bits: timestamp.to_bits(),
        }
    }

    pub fn timestamp(&self) -> f64 {
        f64::from_bits(self.timestamp_bits)
    }

    pub fn history_len(&self) -> usize {
        self.history_len
    }
}

impl fmt::Display for CheckpointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cairn@{}#{}", self.timestamp(), self.history_len)
    }
}

#[derive(Clone, Debug, Default)]
pub struct CheckpointCache {
    entries: BTreeMap<CheckpointKey, TrajectoryPoint>,
}

impl CheckpointCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `state_pre` when `risk > threshold`. Returns the key used.
    pub fn cache_if_risky(
        &mut self,
        state_pre: &TrajectoryPoint,
        risk: f64,
        threshold: f64,
        history_len: usize,
    ) -> Option<CheckpointKey> {
        if risk <= threshold {
            return None;
        }
        let key = CheckpointKey::new(state_pre.timestamp, history_len);
        info!(%key, risk, threshold, "cached pre-step checkpoint");
        self.entries.insert(key, state_pre.clone());
        Some(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &CheckpointKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in insertion (history) order.
    pub fn keys(&self) -> impl Iterator<Item = &CheckpointKey> + '_ {
        self.entries.keys()
    }
}
