//! Multiscale fluctuation function over octave-spaced windows.

use ndarray::ArrayView1;
use rayon::prelude::*;

use crate::error::{DynamicsError, Result};

use super::fitter::FitterCache;
use super::segmented::SegmentedDetrender;

/// Fluctuation magnitudes at one analysis scale
#[derive(Debug, Clone, PartialEq)]
pub struct FluctuationRow {
    /// Window length w
    pub scale: usize,
    /// log₂ w
    pub log2_scale: f64,
    /// log₂ F_q(w), one entry per exponent
    pub log2_fluctuation: Vec<f64>,
}

/// Fluctuation function F_q(w) sampled over scales
#[derive(Debug, Clone, PartialEq)]
pub struct FluctuationTable {
    /// Exponents, in column order
    pub q: Vec<f64>,
    /// Rows in increasing scale
    pub rows: Vec<FluctuationRow>,
}

impl FluctuationTable {
    /// `(log₂ w, log₂ F_q)` pairs for the exponent at `q_index`
    pub fn series(&self, q_index: usize) -> Vec<(f64, f64)> {
        self.rows
            .iter()
            .filter_map(|row| {
                row.log2_fluctuation
                    .get(q_index)
                    .map(|&f| (row.log2_scale, f))
            })
            .collect()
    }

    pub fn scales(&self) -> Vec<usize> {
        self.rows.iter().map(|r| r.scale).collect()
    }
}

/// Repeats segmented detrending at window sizes 2ⁱ + 1
///
///   F_q(w) = ( mean |r_w|^q )^(1/q)
///
/// where r_w is the residual at window w.
#[derive(Debug, Clone)]
pub struct MultiscaleFluctuation {
    q: Vec<f64>,
    order: usize,
    step_size: usize,
    parallel: bool,
}

impl MultiscaleFluctuation {
    pub fn new(q: Vec<f64>, order: usize) -> Result<Self> {
        if q.is_empty() {
            return Err(DynamicsError::config("at least one exponent q is required"));
        }
        if let Some(bad) = q.iter().find(|v| !v.is_finite() || **v == 0.0) {
            return Err(DynamicsError::config(format!(
                "exponent q must be finite and nonzero, got {}",
                bad
            )));
        }

        Ok(Self {
            q,
            order,
            step_size: 1,
            parallel: false,
        })
    }

    /// Advance the octave index by `step_size` between scales
    pub fn with_step_size(mut self, step_size: usize) -> Result<Self> {
        if step_size == 0 {
            return Err(DynamicsError::config("step size must be at least 1"));
        }
        self.step_size = step_size;
        Ok(self)
    }

    /// Evaluate scales on the rayon pool
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn exponents(&self) -> &[f64] {
        &self.q
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// Odd window sizes usable for a signal of `n` samples
    ///
    /// Scales longer than the signal or shorter than `order + 2` are left
    /// out. A short tail segment at a kept scale is fitted over the last
    /// `order + 1` samples, so every returned scale can be detrended.
    pub fn scales(&self, n: usize) -> Vec<usize> {
        if n < 2 {
            return Vec::new();
        }
        let imax = (n as f64).log2().round() as u32;

        (1..=imax)
            .step_by(self.step_size)
            .map(|i| {
                let w = 2f64.powi(i as i32).round() as usize + 1;
                if w % 2 == 0 {
                    w + 1
                } else {
                    w
                }
            })
            .filter(|&w| w <= n && w >= self.order + 2)
            .collect()
    }

    /// Build the fluctuation table of `signal`
    pub fn compute(&self, signal: ArrayView1<f64>) -> Result<FluctuationTable> {
        let scales = self.scales(signal.len());
        if scales.is_empty() {
            return Err(DynamicsError::config(format!(
                "no usable scale for a signal of {} samples at order {}",
                signal.len(),
                self.order
            )));
        }

        let cache = FitterCache::new();
        let row = |&scale: &usize| self.row(signal, scale, &cache);

        let rows: Vec<FluctuationRow> = if self.parallel {
            scales.par_iter().map(row).collect::<Result<_>>()?
        } else {
            scales.iter().map(row).collect::<Result<_>>()?
        };

        Ok(FluctuationTable {
            q: self.q.clone(),
            rows,
        })
    }

    fn row(&self, signal: ArrayView1<f64>, scale: usize, cache: &FitterCache) -> Result<FluctuationRow> {
        let detrended = SegmentedDetrender::new(scale, self.order)?.detrend_with_cache(signal, cache)?;
        let n = detrended.residual.len() as f64;

        let log2_fluctuation = self
            .q
            .iter()
            .map(|&q| {
                let moment = detrended.residual.iter().map(|r| r.abs().powf(q)).sum::<f64>() / n;
                if !moment.is_finite() || moment <= 0.0 {
                    return Err(DynamicsError::NumericInstability(format!(
                        "q = {} moment of the residual at scale {} is {}",
                        q, scale, moment
                    )));
                }

                let log2_f = moment.powf(1.0 / q).log2();
                if !log2_f.is_finite() {
                    return Err(DynamicsError::NumericInstability(format!(
                        "log2 F_q is not finite for q = {} at scale {}",
                        q, scale
                    )));
                }
                Ok(log2_f)
            })
            .collect::<Result<Vec<f64>>>()?;

        let row = FluctuationRow {
            scale,
            log2_scale: (scale as f64).log2(),
            log2_fluctuation,
        };
        tracing::debug!(scale, fluctuation = ?row.log2_fluctuation, "fluctuation row");

        Ok(row)
    }
}
