//! Adaptive segmented detrending with blended overlaps.

use std::ops::Range;

use ndarray::{s, Array1, ArrayView1};
use rayon::prelude::*;

use crate::error::{DynamicsError, Result};

use super::fitter::FitterCache;

/// Position of a segment within the partition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Opens the signal; more segments follow
    First,
    /// Interior segment, always full length
    Middle,
    /// Closes the signal; may be shorter than the window
    Last,
    /// Single segment covering the whole signal
    Whole,
}

/// One locally fitted piece of the signal
#[derive(Debug, Clone)]
pub struct Segment {
    /// Position within the partition
    pub kind: SegmentKind,
    /// Indices of the signal covered by this segment
    pub span: Range<usize>,
    /// Polynomial trend over `span`
    pub trend: Array1<f64>,
}

/// Composite trend and the residual it leaves behind
#[derive(Debug, Clone)]
pub struct Detrended {
    /// Blended piecewise-polynomial trend, one value per sample
    pub trend: Array1<f64>,
    /// Signal minus trend
    pub residual: Array1<f64>,
}

/// Detrender for one window size and polynomial order
///
/// Segments of `segment_len` samples start every `(segment_len - 1) / 2`
/// samples, so neighbours share `half + 1` samples. Each segment is fitted
/// independently and adjacent trends are cross-faded over the shared samples.
#[derive(Debug, Clone)]
pub struct SegmentedDetrender {
    segment_len: usize,
    order: usize,
    parallel: bool,
}

impl SegmentedDetrender {
    /// `segment_len` must be odd and at least `order + 2`
    pub fn new(segment_len: usize, order: usize) -> Result<Self> {
        if segment_len % 2 == 0 {
            return Err(DynamicsError::config(format!(
                "segment length must be odd, got {}",
                segment_len
            )));
        }
        if segment_len < order + 2 {
            return Err(DynamicsError::config(format!(
                "segment length {} too short for order {} (need at least {})",
                segment_len,
                order,
                order + 2
            )));
        }

        Ok(Self {
            segment_len,
            order,
            parallel: false,
        })
    }

    /// Linear detrender whose window adapts to the signal length:
    /// `4 * floor(len / span) + 1`
    pub fn for_span(signal_len: usize, span: usize) -> Result<Self> {
        if span == 0 {
            return Err(DynamicsError::config("span must be positive"));
        }
        Self::new(4 * (signal_len / span) + 1, 1)
    }

    /// Fit segments on the rayon pool
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn segment_len(&self) -> usize {
        self.segment_len
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// Samples between successive segment starts
    pub fn half(&self) -> usize {
        (self.segment_len - 1) / 2
    }

    /// Partition `[0, n)` into tagged segment spans
    pub fn layout(&self, n: usize) -> Vec<(SegmentKind, Range<usize>)> {
        let half = self.half();
        let mut spans = Vec::new();
        let mut start = 0;

        loop {
            let end = (start + self.segment_len).min(n);
            spans.push(start..end);
            if end == n {
                break;
            }
            start += half;
        }

        let last = spans.len() - 1;
        spans
            .into_iter()
            .enumerate()
            .map(|(k, span)| {
                let kind = match (k, last) {
                    (0, 0) => SegmentKind::Whole,
                    (0, _) => SegmentKind::First,
                    (k, last) if k == last => SegmentKind::Last,
                    _ => SegmentKind::Middle,
                };
                (kind, span)
            })
            .collect()
    }

    /// Detrend `signal` with a private operator cache
    pub fn detrend(&self, signal: ArrayView1<f64>) -> Result<Detrended> {
        self.detrend_with_cache(signal, &FitterCache::new())
    }

    /// Fit every segment of the layout independently
    ///
    /// A tail shorter than `order + 1` samples is fitted over the last
    /// `order + 1` samples of the signal and keeps only its own span.
    pub fn segments(&self, signal: ArrayView1<f64>, cache: &FitterCache) -> Result<Vec<Segment>> {
        let n = signal.len();
        if n == 0 {
            return Err(DynamicsError::config("cannot detrend an empty signal"));
        }

        let layout = self.layout(n);
        tracing::debug!(
            n,
            segment_len = self.segment_len,
            order = self.order,
            segments = layout.len(),
            "detrending"
        );

        let fit = |(kind, span): &(SegmentKind, Range<usize>)| -> Result<Segment> {
            let fit_len = span.len().max(self.order + 1).min(span.end);
            let fitter = cache.get(fit_len, self.order)?;
            let full = fitter.fit(signal.slice(s![span.end - fit_len..span.end]))?;
            let trend = full.slice(s![fit_len - span.len()..]).to_owned();
            Ok(Segment {
                kind: *kind,
                span: span.clone(),
                trend,
            })
        };

        if self.parallel {
            layout.par_iter().map(fit).collect()
        } else {
            layout.iter().map(fit).collect()
        }
    }

    /// Detrend `signal`, reusing operators from `cache`
    pub fn detrend_with_cache(
        &self,
        signal: ArrayView1<f64>,
        cache: &FitterCache,
    ) -> Result<Detrended> {
        let segments = self.segments(signal, cache)?;
        let trend = stitch(&segments, self.half(), signal.len());
        let residual = &signal - &trend;

        Ok(Detrended { trend, residual })
    }
}

/// Fold fitted segments left to right into one continuous trend
fn stitch(segments: &[Segment], half: usize, n: usize) -> Array1<f64> {
    let mut trend: Vec<f64> = Vec::with_capacity(n);

    match segments.first() {
        Some(seg) if seg.kind == SegmentKind::Whole => trend.extend(seg.trend.iter()),
        Some(seg) => trend.extend(seg.trend.slice(s![..half]).iter()),
        None => {}
    }

    for pair in segments.windows(2) {
        let (prev, cur) = (&pair[0], &pair[1]);
        let blended = blend(prev.trend.view(), cur.trend.view(), half);

        match cur.kind {
            SegmentKind::Last => {
                trend.extend(blended.iter());
                trend.extend(cur.trend.slice(s![half + 1..]).iter());
            }
            _ => trend.extend(blended.iter().take(half)),
        }
    }

    debug_assert_eq!(trend.len(), n);
    Array1::from(trend)
}

/// Cross-fade the back half of `prev` into the front half of `cur`
///
/// `w = j / half` for `j = 0..=half`.
fn blend(prev: ArrayView1<f64>, cur: ArrayView1<f64>, half: usize) -> Array1<f64> {
    Array1::from_shape_fn(half + 1, |j| {
        let w = j as f64 / half as f64;
        (1.0 - w) * prev[half + j] + w * cur[j]
    })
}
