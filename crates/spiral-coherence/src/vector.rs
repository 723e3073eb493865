// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Dense slice helpers shared by the optimiser components.
//!
//! Callers are expected to have checked dimensionality; the helpers iterate
//! over the zipped prefix and never panic on ragged input.

/// Norms below this are treated as the zero vector.
pub const ZERO_NORM: f64 = 1e-12;

#[inline]
pub fn dot(lhs: &[f64], rhs: &[f64]) -> f64 {
    lhs.iter().zip(rhs).map(|(a, b)| a * b).sum()
}

#[inline]
pub fn norm(values: &[f64]) -> f64 {
    dot(values, values).sqrt()
}

#[inline]
pub fn is_zero(values: &[f64]) -> bool {
    norm(values) <= ZERO_NORM
}

pub fn scaled(values: &[f64], factor: f64) -> Vec<f64> {
    values.iter().map(|v| v * factor).collect()
}

pub fn add(lhs: &[f64], rhs: &[f64]) -> Vec<f64> {
    lhs.iter().zip(rhs).map(|(a, b)| a + b).collect()
}

/// Returns `values / |values|`, or `None` for a (numerically) zero vector.
pub fn unit(values: &[f64]) -> Option<Vec<f64>> {
    let n = norm(values);
    if n <= ZERO_NORM || !n.is_finite() {
        return None;
    }
    Some(scaled(values, n.recip()))
}

/// Cosine of the angle between two vectors; zero when either side vanishes.
pub fn cos_angle(lhs: &[f64], rhs: &[f64]) -> f64 {
    let denom = norm(lhs) * norm(rhs);
    if denom <= ZERO_NORM {
        return 0.0;
    }
    (dot(lhs, rhs) / denom).clamp(-1.0, 1.0)
}

/// Unsigned angle in radians, `0` when either vector vanishes.
pub fn angle(lhs: &[f64], rhs: &[f64]) -> f64 {
    if is_zero(lhs) || is_zero(rhs) {
        return 0.0;
    }
    cos_angle(lhs, rhs).acos()
}
