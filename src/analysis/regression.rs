//! Ordinary least-squares line fit.

use ndarray::ArrayView1;
use serde::Serialize;

use crate::dynamics::SignalSet;
use crate::error::{DynamicsError, Result};

use super::{trim_boundary, zscore};

/// y = intercept + slope · x
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Residual standard error with n − 2 degrees of freedom
    pub residual_std: f64,
    /// Number of points
    pub n: usize,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Least-squares line through `(x, y)`
pub fn linear_fit(x: &[f64], y: &[f64]) -> Result<LinearFit> {
    if x.len() != y.len() {
        return Err(DynamicsError::DimensionMismatch {
            expected: x.len(),
            actual: y.len(),
        });
    }
    let n = x.len();
    if n < 3 {
        return Err(DynamicsError::config(format!(
            "line fit needs at least 3 points, got {}",
            n
        )));
    }

    let mx = ArrayView1::from(x).mean().unwrap_or(0.0);
    let my = ArrayView1::from(y).mean().unwrap_or(0.0);

    let sxx: f64 = x.iter().map(|v| (v - mx).powi(2)).sum();
    let sxy: f64 = x.iter().zip(y).map(|(a, b)| (a - mx) * (b - my)).sum();

    if !(sxx > 0.0) {
        return Err(DynamicsError::NumericInstability(
            "regressor has zero variance".to_string(),
        ));
    }

    let slope = sxy / sxx;
    let intercept = my - slope * mx;
    let sse: f64 = x
        .iter()
        .zip(y)
        .map(|(a, b)| (b - (intercept + slope * a)).powi(2))
        .sum();

    Ok(LinearFit {
        slope,
        intercept,
        residual_std: (sse / (n as f64 - 2.0)).sqrt(),
        n,
    })
}

/// Regress z-scored resonance on z-scored novelty outside the boundary bands
pub fn novelty_resonance_slope(signals: &SignalSet, window: usize) -> Result<LinearFit> {
    let novelty = zscore(trim_boundary(&signals.novelty, window))?;
    let resonance = zscore(trim_boundary(&signals.resonance, window))?;

    let fit = linear_fit(&novelty, &resonance)?;
    tracing::debug!(slope = fit.slope, n = fit.n, "novelty-resonance slope");

    Ok(fit)
}
