//! # Resonance Dynamics
//!
//! Information dynamics of document streams and adaptive detrending of the
//! resulting signals.
//!
//! ## Theoretical Framework
//!
//! A corpus ordered in time is represented as a sequence of probability
//! vectors (e.g. document-topic mixtures from a topic model). How each
//! document relates to its temporal neighbourhood is measured with a
//! divergence between distributions.
//!
//! ### Information signals
//!
//! 1. **Novelty**: mean divergence from the w preceding documents
//! 2. **Transience**: mean divergence from the w following documents
//! 3. **Resonance**: novelty − transience; positive when new content persists
//!
//! ### Trend and scaling analysis
//!
//! 4. **Segmented detrending**: piecewise polynomial trends on half-
//!    overlapping windows, cross-faded into one continuous trend
//! 5. **Fluctuation function**: residual magnitude F_q(w) over octave-spaced
//!    windows, whose log-log slope characterizes long-range persistence
//!
//! ## Pipeline
//!
//! ```text
//! topic vectors + dates ──► TimeSeries ──► InfoDynamics ──► SignalSet
//!                                                         │
//!                      SegmentedDetrender / MultiscaleFluctuation / Smoothing
//! ```
//!
//! ## References
//!
//! - Barron et al., "Individuals, institutions, and innovation in the debates
//!   of the French Revolution", PNAS 115 (2018)
//! - Riley et al., "A tutorial introduction to adaptive fractal analysis",
//!   Front. Physiol. 3 (2012)

pub mod analysis;
pub mod config;
pub mod detrending;
pub mod divergence;
pub mod dynamics;
pub mod error;
pub mod smoothing;

// Re-exports from divergence
pub use divergence::{jsd, kld, normalize, relative_entropy, Divergence};

// Re-exports from dynamics
pub use dynamics::{InfoDynamics, SignalRecord, SignalSet, TimeSeries, WindowSpec, WindowedSignal};

// Re-exports from detrending
pub use detrending::{
    Detrended,
    FitterCache,
    FluctuationRow,
    FluctuationTable,
    MultiscaleFluctuation,
    PolynomialTrendFitter,
    Segment,
    SegmentKind,
    SegmentedDetrender,
};

// Re-exports from smoothing and analysis
pub use analysis::{linear_fit, novelty_resonance_slope, rescale, trim_boundary, zscore, LinearFit};
pub use smoothing::Smoothing;

pub use config::{DetrendConfig, DynamicsConfig, FluctuationConfig};
pub use error::{DynamicsError, Result};
