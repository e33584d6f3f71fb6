//! Analysis Module: Post-processing of Information Signals
//!
//! Utilities for reading novelty and resonance once they are computed:
//! rescaling, standardization, trimming of the boundary bands, and the
//! novelty → resonance regression used to classify how persistent new
//! content is.
//!
//! ## Novelty-Resonance slope
//!
//! After z-scoring both signals (boundary bands removed),
//!
//!   R_z = β₀ + β₁ N_z + ε
//!
//! β₁ > 0 means novel content tends to persist; β₁ ≈ 0 means novelty fades.

mod regression;

pub use regression::{linear_fit, novelty_resonance_slope, LinearFit};

use ndarray::ArrayView1;

use crate::error::{DynamicsError, Result};

/// Min-max map of `x` into `[lower, upper]`
pub fn rescale(x: &[f64], lower: f64, upper: f64) -> Result<Vec<f64>> {
    let min = x.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = x.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if x.is_empty() || !(range > 0.0) {
        return Err(DynamicsError::config("cannot rescale an empty or constant signal"));
    }

    Ok(x.iter()
        .map(|v| (upper - lower) * ((v - min) / range) + lower)
        .collect())
}

/// Population z-scores of `x`
pub fn zscore(x: &[f64]) -> Result<Vec<f64>> {
    if x.is_empty() {
        return Err(DynamicsError::config("cannot standardize an empty signal"));
    }

    let view = ArrayView1::from(x);
    let mean = view.mean().unwrap_or(0.0);
    let std = view.std(0.0);

    if !(std > 0.0) {
        return Err(DynamicsError::config("cannot standardize a constant signal"));
    }

    Ok(x.iter().map(|v| (v - mean) / std).collect())
}

/// Drop the first and last `window` entries
pub fn trim_boundary(x: &[f64], window: usize) -> &[f64] {
    if 2 * window >= x.len() {
        return &[];
    }
    &x[window..x.len() - window]
}
