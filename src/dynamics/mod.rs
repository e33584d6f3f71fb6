//! Information Dynamics Module: Novelty, Transience and Resonance
//!
//! Given documents x₁ … x_N ordered in time and a window w, each document is
//! scored against its temporal neighbourhood with a divergence D:
//!
//!   N_w(i) = (1/w) Σ_{j=1..w} D(xᵢ ‖ x_{i-j})      (novelty)
//!   T_w(i) = (1/w) Σ_{j=1..w} D(xᵢ ‖ x_{i+j})      (transience)
//!   R_w(i) = N_w(i) − T_w(i)                       (resonance)
//!
//! High novelty with low transience (R > 0) marks content that departs from
//! the past and persists into the future.
//!
//! ## Boundaries
//!
//! Windows are clamped at the ends of the series and never wrap. The first w
//! and last w resonance values (and the last w transience values) are set to
//! the configured boundary weight.

mod engine;
mod timeseries;

pub use engine::{InfoDynamics, SignalRecord, SignalSet, WindowedSignal};
pub use timeseries::{TimeSeries, WindowSpec};
