//! Divergence Module: Dissimilarity of Probability Vectors
//!
//! Scores how far one document-topic distribution lies from another.
//!
//! ## Measures
//!
//! ### KLD (as used for novelty/transience)
//!
//!   KLD(p, q) = Σᵢ (pᵢ - qᵢ) log₁₀(pᵢ / qᵢ),   pᵢ ≠ 0
//!
//! This is the symmetrised "J-divergence" form of Kullback-Leibler rather than
//! the textbook Σ pᵢ log(pᵢ/qᵢ). Downstream signal values are defined against
//! this form, so it is kept as is.
//!
//! ### Jensen-Shannon
//!
//!   JSD(p, q) = ½ D(p ‖ m) + ½ D(q ‖ m),   m = (p + q) / 2
//!
//! Symmetric and bounded by ln 2 in nats (1 bit in base 2).

mod measures;

pub use measures::{jsd, kld, normalize, relative_entropy};

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Divergence measure selected for an information-dynamics run
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Divergence {
    /// `(p - q) log10(p / q)` summed over the support of p
    #[default]
    Kld,
    /// Jensen-Shannon divergence in the given logarithm base
    Jsd { base: f64 },
}

impl Divergence {
    /// Jensen-Shannon in nats
    pub fn jsd_natural() -> Self {
        Divergence::Jsd { base: std::f64::consts::E }
    }

    /// Score `p` against `q`
    pub fn measure(&self, p: ArrayView1<f64>, q: ArrayView1<f64>) -> Result<f64> {
        match *self {
            Divergence::Kld => kld(p, q),
            Divergence::Jsd { base } => jsd(p, q, base),
        }
    }

    /// Short label used in logs and reports
    pub fn name(&self) -> &'static str {
        match self {
            Divergence::Kld => "kld",
            Divergence::Jsd { .. } => "jsd",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::arr1;

    #[test]
    fn test_dispatch_matches_free_functions() {
        let p = arr1(&[0.2, 0.3, 0.5]);
        let q = arr1(&[0.4, 0.4, 0.2]);

        let k = Divergence::Kld.measure(p.view(), q.view()).unwrap();
        assert_abs_diff_eq!(k, kld(p.view(), q.view()).unwrap(), epsilon = 1e-15);

        let j = Divergence::Jsd { base: 2.0 }.measure(p.view(), q.view()).unwrap();
        assert_abs_diff_eq!(j, jsd(p.view(), q.view(), 2.0).unwrap(), epsilon = 1e-15);
    }

    #[test]
    fn test_default_is_kld() {
        assert_eq!(Divergence::default(), Divergence::Kld);
        assert_eq!(Divergence::jsd_natural().name(), "jsd");
    }

    #[test]
    fn test_serde_tagging() {
        let json = serde_json::to_string(&Divergence::Jsd { base: 2.0 }).unwrap();
        assert_eq!(json, r#"{"kind":"jsd","base":2.0}"#);

        let back: Divergence = serde_json::from_str(r#"{"kind":"kld"}"#).unwrap();
        assert_eq!(back, Divergence::Kld);
    }
}
