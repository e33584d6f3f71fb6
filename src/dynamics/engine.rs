//! Windowed divergence engine: novelty, transience and resonance.

use std::ops::Range;

use ndarray::{Array1, Array2, Axis};
use serde::Serialize;

use crate::divergence::{normalize, Divergence};
use crate::error::Result;

use super::timeseries::{TimeSeries, WindowSpec};

/// Mean and dispersion of divergences over one sliding window per document
#[derive(Debug, Clone, PartialEq)]
pub struct WindowedSignal {
    /// Mean divergence per document
    pub mean: Vec<f64>,
    /// Population standard deviation per document
    pub sigma: Vec<f64>,
}

/// Complete information-dynamics output, indexed like the input series
#[derive(Debug, Clone, PartialEq)]
pub struct SignalSet {
    /// Mean divergence from the preceding window
    pub novelty: Vec<f64>,
    /// Population std of the novelty scores
    pub nsigma: Vec<f64>,
    /// Mean divergence from the following window
    pub transience: Vec<f64>,
    /// Population std of the transience scores
    pub tsigma: Vec<f64>,
    /// novelty − transience, `weight` in both boundary bands
    pub resonance: Vec<f64>,
    /// (nsigma + tsigma) / 2, `weight` in both boundary bands
    pub rsigma: Vec<f64>,
}

/// One exported row of a signal set
#[derive(Debug, Clone, Serialize)]
pub struct SignalRecord<T> {
    pub date: T,
    pub novelty: f64,
    pub transience: f64,
    pub resonance: f64,
    pub nsigma: f64,
    pub tsigma: f64,
    pub rsigma: f64,
}

impl SignalSet {
    pub fn len(&self) -> usize {
        self.novelty.len()
    }

    pub fn is_empty(&self) -> bool {
        self.novelty.is_empty()
    }

    /// Zip the signals with their timestamps into exportable rows
    pub fn records<T: Clone>(&self, timestamps: &[T]) -> Vec<SignalRecord<T>> {
        timestamps
            .iter()
            .enumerate()
            .take(self.len())
            .map(|(i, date)| SignalRecord {
                date: date.clone(),
                novelty: self.novelty[i],
                transience: self.transience[i],
                resonance: self.resonance[i],
                nsigma: self.nsigma[i],
                tsigma: self.tsigma[i],
                rsigma: self.rsigma[i],
            })
            .collect()
    }
}

/// Information-dynamics engine over a normalized topic matrix
#[derive(Debug, Clone)]
pub struct InfoDynamics {
    /// Row-normalized copy of the series
    data: Array2<f64>,
    spec: WindowSpec,
    measure: Divergence,
}

impl InfoDynamics {
    /// Create an engine using the default measure (KLD)
    pub fn new<T>(series: &TimeSeries<T>, spec: WindowSpec) -> Result<Self> {
        Self::with_measure(series, spec, Divergence::default())
    }

    /// Create an engine with an explicit divergence measure
    pub fn with_measure<T>(
        series: &TimeSeries<T>,
        spec: WindowSpec,
        measure: Divergence,
    ) -> Result<Self> {
        spec.validate(series.len())?;

        let mut data = series.vectors().to_owned();
        for mut row in data.axis_iter_mut(Axis(0)) {
            let unit = normalize(row.view())?;
            row.assign(&unit);
        }

        Ok(Self { data, spec, measure })
    }

    /// Number of documents
    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }

    pub fn spec(&self) -> WindowSpec {
        self.spec
    }

    pub fn measure(&self) -> Divergence {
        self.measure
    }

    /// Divergence of each document from its (up to) `w` predecessors
    ///
    /// The window is clamped at the start of the series; the first document
    /// has no predecessor and receives `weight` with zero dispersion.
    pub fn novelty(&self) -> Result<WindowedSignal> {
        let w = self.spec.window;
        let signal = self.windowed(|i| i.saturating_sub(w)..i, self.spec.weight)?;

        tracing::debug!(
            measure = self.measure.name(),
            window = w,
            n = self.len(),
            "novelty computed"
        );

        Ok(signal)
    }

    /// Divergence of each document from its (up to) `w` successors
    ///
    /// The last `w` entries of the mean are overwritten with `weight`
    /// regardless of what was computed there.
    pub fn transience(&self) -> Result<WindowedSignal> {
        let w = self.spec.window;
        let n = self.len();
        let mut signal = self.windowed(|i| (i + 1)..(i + w + 1).min(n), 0.0)?;

        let tail = n.saturating_sub(w);
        signal.mean[tail..].fill(self.spec.weight);

        tracing::debug!(
            measure = self.measure.name(),
            window = w,
            n,
            "transience computed"
        );

        Ok(signal)
    }

    /// Novelty minus transience, with both boundary bands set to `weight`
    pub fn resonance(&self) -> Result<SignalSet> {
        let novelty = self.novelty()?;
        let transience = self.transience()?;

        let n = self.len();
        let w = self.spec.window;
        let weight = self.spec.weight;

        let mut resonance: Vec<f64> = novelty
            .mean
            .iter()
            .zip(&transience.mean)
            .map(|(nv, tv)| nv - tv)
            .collect();
        let mut rsigma: Vec<f64> = novelty
            .sigma
            .iter()
            .zip(&transience.sigma)
            .map(|(ns, ts)| (ns + ts) / 2.0)
            .collect();

        for band in [0..w.min(n), n.saturating_sub(w)..n] {
            resonance[band.clone()].fill(weight);
            rsigma[band].fill(weight);
        }

        if 2 * w >= n {
            tracing::warn!(
                window = w,
                n,
                "boundary bands cover the whole series; resonance is constant"
            );
        }

        Ok(SignalSet {
            novelty: novelty.mean,
            nsigma: novelty.sigma,
            transience: transience.mean,
            tsigma: transience.sigma,
            resonance,
            rsigma,
        })
    }

    /// Mean and population stdev of divergences of row i against `window(i)`
    fn windowed<F>(&self, window: F, empty_fill: f64) -> Result<WindowedSignal>
    where
        F: Fn(usize) -> Range<usize>,
    {
        let n = self.len();
        let mut mean = Vec::with_capacity(n);
        let mut sigma = Vec::with_capacity(n);

        for i in 0..n {
            let x = self.data.row(i);
            let range = window(i);

            if range.is_empty() {
                mean.push(empty_fill);
                sigma.push(0.0);
                continue;
            }

            let scores = range
                .map(|j| self.measure.measure(x, self.data.row(j)))
                .collect::<Result<Array1<f64>>>()?;

            mean.push(scores.mean().unwrap_or(empty_fill));
            sigma.push(scores.std(0.0));
        }

        Ok(WindowedSignal { mean, sigma })
    }
}
