//! Run configuration for the information-dynamics and detrending stages.
//!
//! All structs deserialize from JSON (missing fields take their defaults)
//! and check themselves with `validate()` before building a component.

use serde::{Deserialize, Serialize};

use crate::detrending::{MultiscaleFluctuation, SegmentedDetrender};
use crate::divergence::Divergence;
use crate::dynamics::{InfoDynamics, TimeSeries, WindowSpec};
use crate::error::{DynamicsError, Result};

/// Novelty/transience/resonance settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicsConfig {
    /// Neighbours compared on each side
    pub window: usize,
    /// Boundary fill value
    pub weight: f64,
    pub divergence: Divergence,
    /// Sort documents by timestamp before analysis
    pub sort: bool,
}

impl Default for DynamicsConfig {
    fn default() -> Self {
        Self {
            window: 3,
            weight: 0.0,
            divergence: Divergence::Kld,
            sort: false,
        }
    }
}

impl DynamicsConfig {
    pub fn validate(&self) -> Result<()> {
        if self.window == 0 {
            return Err(DynamicsError::config("window must be at least 1"));
        }
        if !self.weight.is_finite() {
            return Err(DynamicsError::config("weight must be finite"));
        }
        if let Divergence::Jsd { base } = self.divergence {
            if !base.is_finite() || base <= 0.0 || base == 1.0 {
                return Err(DynamicsError::config(format!(
                    "jsd base must be positive and != 1, got {}",
                    base
                )));
            }
        }
        Ok(())
    }

    pub fn window_spec(&self) -> WindowSpec {
        WindowSpec::new(self.window, self.weight)
    }

    /// Apply the `sort` setting to a freshly loaded series
    pub fn prepare<T: PartialOrd + Clone>(&self, series: TimeSeries<T>) -> TimeSeries<T> {
        if self.sort {
            series.sort_by_time()
        } else {
            series
        }
    }

    /// Build an engine for `series`
    pub fn build<T>(&self, series: &TimeSeries<T>) -> Result<InfoDynamics> {
        self.validate()?;
        InfoDynamics::with_measure(series, self.window_spec(), self.divergence)
    }
}

/// Single-scale detrending settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetrendConfig {
    /// Odd window length
    pub segment_len: usize,
    /// Polynomial order
    pub order: usize,
    pub parallel: bool,
}

impl Default for DetrendConfig {
    fn default() -> Self {
        Self {
            segment_len: 5,
            order: 1,
            parallel: false,
        }
    }
}

impl DetrendConfig {
    pub fn validate(&self) -> Result<()> {
        SegmentedDetrender::new(self.segment_len, self.order).map(|_| ())
    }

    pub fn build(&self) -> Result<SegmentedDetrender> {
        Ok(SegmentedDetrender::new(self.segment_len, self.order)?.with_parallel(self.parallel))
    }
}

/// Multiscale fluctuation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FluctuationConfig {
    /// Exponents of the q-spectrum
    pub q: Vec<f64>,
    pub order: usize,
    /// Octave increment between scales
    pub step_size: usize,
    pub parallel: bool,
}

impl Default for FluctuationConfig {
    fn default() -> Self {
        Self {
            q: vec![-1.0, -0.1, 0.1, 1.0, 2.0, 3.0, 4.0, 5.0],
            order: 2,
            step_size: 1,
            parallel: false,
        }
    }
}

impl FluctuationConfig {
    pub fn validate(&self) -> Result<()> {
        self.build().map(|_| ())
    }

    pub fn build(&self) -> Result<MultiscaleFluctuation> {
        Ok(MultiscaleFluctuation::new(self.q.clone(), self.order)?
            .with_step_size(self.step_size)?
            .with_parallel(self.parallel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(DynamicsConfig::default().validate().is_ok());
        assert!(DetrendConfig::default().validate().is_ok());
        assert!(FluctuationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let cfg: DynamicsConfig =
            serde_json::from_str(r#"{"window": 7, "divergence": {"kind": "jsd", "base": 2.0}}"#)
                .unwrap();

        assert_eq!(cfg.window, 7);
        assert_eq!(cfg.weight, 0.0);
        assert_eq!(cfg.divergence, Divergence::Jsd { base: 2.0 });
        assert!(!cfg.sort);
    }

    #[test]
    fn test_invalid_values() {
        let cfg = DynamicsConfig {
            divergence: Divergence::Jsd { base: 1.0 },
            ..Default::default()
        };
        assert!(cfg.validate().is_err());

        let detrend = DetrendConfig {
            segment_len: 4,
            ..Default::default()
        };
        assert!(detrend.build().is_err());

        let fluct = FluctuationConfig {
            step_size: 0,
            ..Default::default()
        };
        assert!(fluct.validate().is_err());
    }

    #[test]
    fn test_build_engine() {
        let rows = vec![vec![0.2, 0.8], vec![0.4, 0.6], vec![0.6, 0.4], vec![0.8, 0.2]];
        let series = TimeSeries::new(rows, vec![3, 1, 2, 0]).unwrap();

        let cfg = DynamicsConfig {
            window: 1,
            sort: true,
            ..Default::default()
        };
        let series = cfg.prepare(series);
        assert_eq!(series.timestamps(), &[0, 1, 2, 3]);
        assert_eq!(series.vector(0)[0], 0.8);

        let engine = cfg.build(&series).unwrap();
        assert_eq!(engine.len(), 4);
        assert_eq!(engine.spec().window, 1);
    }
}
