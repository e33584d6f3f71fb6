//! Smoothing Module: Kernel and Moving-Average Smoothers
//!
//! Light-weight smoothers for novelty/resonance curves prior to inspection.
//!
//! ### Gaussian kernel
//!
//!   ŷ(t) = Σ_s y(s) K(t − s) / Σ_s K(t − s),   K(d) = exp(−d² / 2σ²)
//!
//! with σ = FWHM / √(8 ln 2).
//!
//! ### Simple moving average
//!
//! Mean over each full window; the output is `N − window + 1` long.

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::{DynamicsError, Result};

/// FWHM / σ for a Gaussian
fn fwhm_factor() -> f64 {
    (8.0 * 2f64.ln()).sqrt()
}

/// Smoothing method
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Smoothing {
    GaussianKernel { sigma: f64 },
    MovingAverage { window: usize },
}

impl Smoothing {
    /// Gaussian kernel specified by its full width at half maximum
    pub fn from_fwhm(fwhm: f64) -> Self {
        Smoothing::GaussianKernel {
            sigma: fwhm / fwhm_factor(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Smoothing::GaussianKernel { .. } => "gaussian_kernel",
            Smoothing::MovingAverage { .. } => "sma",
        }
    }

    /// Apply the smoother to `ts`
    pub fn smooth(&self, ts: ArrayView1<f64>) -> Result<Array1<f64>> {
        match *self {
            Smoothing::GaussianKernel { sigma } => gaussian_kernel(ts, sigma),
            Smoothing::MovingAverage { window } => moving_average(ts, window),
        }
    }
}

fn gaussian_kernel(ts: ArrayView1<f64>, sigma: f64) -> Result<Array1<f64>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(DynamicsError::config(format!(
            "kernel sigma must be positive, got {}",
            sigma
        )));
    }

    tracing::debug!(sigma, fwhm = sigma * fwhm_factor(), "applying gaussian kernel");

    let n = ts.len();
    let denom = 2.0 * sigma * sigma;

    let smoothed = Array1::from_shape_fn(n, |t| {
        let mut weighted = 0.0;
        let mut total = 0.0;
        for (s, &y) in ts.iter().enumerate() {
            let d = t as f64 - s as f64;
            let k = (-(d * d) / denom).exp();
            weighted += y * k;
            total += k;
        }
        weighted / total
    });

    Ok(smoothed)
}

fn moving_average(ts: ArrayView1<f64>, window: usize) -> Result<Array1<f64>> {
    if window == 0 || window > ts.len() {
        return Err(DynamicsError::config(format!(
            "moving-average window {} invalid for {} samples",
            window,
            ts.len()
        )));
    }

    let mut out = Vec::with_capacity(ts.len() - window + 1);
    let mut sum: f64 = ts.iter().take(window).sum();
    out.push(sum / window as f64);

    for i in window..ts.len() {
        sum += ts[i] - ts[i - window];
        out.push(sum / window as f64);
    }

    Ok(Array1::from(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::arr1;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};

    fn white_noise(n: usize) -> Array1<f64> {
        let mut rng = StdRng::seed_from_u64(42);
        let normal = Normal::new(0.0, 1.0).unwrap();
        Array1::from_iter((0..n).map(|_| normal.sample(&mut rng)))
    }

    fn std(a: &Array1<f64>) -> f64 {
        a.std(0.0)
    }

    #[test]
    fn test_sma_reduces_spread() {
        let ts = white_noise(10_000);
        let smoothed = Smoothing::MovingAverage { window: 10 }.smooth(ts.view()).unwrap();

        assert_eq!(smoothed.len(), 10_000 - 10 + 1);
        assert!(std(&ts) > std(&smoothed));
    }

    #[test]
    fn test_sma_values() {
        let smoothed = Smoothing::MovingAverage { window: 2 }
            .smooth(arr1(&[1.0, 3.0, 5.0, 9.0]).view())
            .unwrap();
        assert_eq!(smoothed, arr1(&[2.0, 4.0, 7.0]));
    }

    #[test]
    fn test_gaussian_kernel_reduces_spread() {
        let ts = white_noise(100);
        let smoothed = Smoothing::from_fwhm(2.0).smooth(ts.view()).unwrap();

        assert_eq!(smoothed.len(), 100);
        assert!(std(&ts) > std(&smoothed));
    }

    #[test]
    fn test_gaussian_kernel_preserves_constant() {
        let ts = Array1::from_elem(25, 4.5);
        let smoothed = Smoothing::GaussianKernel { sigma: 3.0 }.smooth(ts.view()).unwrap();
        for v in smoothed.iter() {
            assert_abs_diff_eq!(*v, 4.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_fwhm_conversion() {
        match Smoothing::from_fwhm(fwhm_factor()) {
            Smoothing::GaussianKernel { sigma } => assert_abs_diff_eq!(sigma, 1.0, epsilon = 1e-12),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_invalid_parameters() {
        let ts = arr1(&[1.0, 2.0]);
        assert!(Smoothing::MovingAverage { window: 0 }.smooth(ts.view()).is_err());
        assert!(Smoothing::MovingAverage { window: 3 }.smooth(ts.view()).is_err());
        assert!(Smoothing::GaussianKernel { sigma: 0.0 }.smooth(ts.view()).is_err());
    }
}
