//! Detrending Module: Adaptive Segmented Trends and Fluctuation Analysis
//!
//! A scalar signal y (e.g. resonance) is split into segments of odd length
//! L = 2h + 1 starting every h samples. Each segment gets its own
//! least-squares polynomial trend; neighbouring trends overlap on h + 1
//! samples and are cross-faded there,
//!
//!   trend(j) = (1 − j/h) · left(h + j) + (j/h) · right(j),   j = 0 … h
//!
//! so the composite trend has no jumps at segment boundaries.
//!
//! ## Multiscale extension
//!
//! Repeating the procedure at L = 2ⁱ + 1 and measuring the residual r gives
//! the fluctuation function
//!
//!   F_q(L) = ( mean |r_L|^q )^(1/q)
//!
//! whose log-log slope estimates the scaling exponent of the signal.

mod fitter;
mod multiscale;
mod segmented;

pub use fitter::{FitterCache, PolynomialTrendFitter};
pub use multiscale::{FluctuationRow, FluctuationTable, MultiscaleFluctuation};
pub use segmented::{Detrended, Segment, SegmentKind, SegmentedDetrender};
