//! Pairwise divergence functions over probability vectors.

use ndarray::{Array1, ArrayView1, Zip};

use crate::error::{DynamicsError, Result};

fn check_dimensions(p: &ArrayView1<f64>, q: &ArrayView1<f64>) -> Result<()> {
    if p.len() != q.len() {
        return Err(DynamicsError::DimensionMismatch {
            expected: p.len(),
            actual: q.len(),
        });
    }
    Ok(())
}

/// KL-style divergence `Σ (pᵢ - qᵢ) log₁₀(pᵢ / qᵢ)` over indices with `pᵢ ≠ 0`
///
/// A zero `qᵢ` under a nonzero `pᵢ` yields `+∞`.
pub fn kld(p: ArrayView1<f64>, q: ArrayView1<f64>) -> Result<f64> {
    check_dimensions(&p, &q)?;

    let total = Zip::from(&p).and(&q).fold(0.0, |acc, &pi, &qi| {
        if pi != 0.0 {
            acc + (pi - qi) * (pi / qi).log10()
        } else {
            acc
        }
    });

    Ok(total)
}

/// Rescale a nonnegative vector so that it sums to one
pub fn normalize(p: ArrayView1<f64>) -> Result<Array1<f64>> {
    if p.iter().any(|&x| x < 0.0 || !x.is_finite()) {
        return Err(DynamicsError::Normalization(
            "probability vector has negative or non-finite entries".to_string(),
        ));
    }

    let sum = p.sum();
    if sum <= 0.0 {
        return Err(DynamicsError::Normalization(
            "probability vector sums to zero".to_string(),
        ));
    }

    Ok(p.mapv(|x| x / sum))
}

/// Relative entropy D(p ‖ q) in the given logarithm base
///
/// D(p ‖ q) = Σᵢ pᵢ ln(pᵢ / qᵢ) / ln(base),   pᵢ > 0
pub fn relative_entropy(p: ArrayView1<f64>, q: ArrayView1<f64>, base: f64) -> Result<f64> {
    check_dimensions(&p, &q)?;

    if !base.is_finite() || base <= 0.0 || base == 1.0 {
        return Err(DynamicsError::config(format!(
            "logarithm base must be positive and != 1, got {}",
            base
        )));
    }

    let nats = Zip::from(&p).and(&q).fold(0.0, |acc, &pi, &qi| {
        if pi > 0.0 {
            acc + pi * (pi / qi).ln()
        } else {
            acc
        }
    });

    Ok(nats / base.ln())
}

/// Jensen-Shannon divergence between two (re-normalized) distributions
pub fn jsd(p: ArrayView1<f64>, q: ArrayView1<f64>, base: f64) -> Result<f64> {
    check_dimensions(&p, &q)?;

    let p = normalize(p)?;
    let q = normalize(q)?;
    let m = (&p + &q) * 0.5;

    let left = relative_entropy(p.view(), m.view(), base)?;
    let right = relative_entropy(q.view(), m.view(), base)?;

    Ok(0.5 * left + 0.5 * right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use ndarray::arr1;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Dirichlet, Distribution};

    #[test]
    fn test_kld_term_form() {
        let p = arr1(&[0.5, 0.5]);
        let q = arr1(&[0.9, 0.1]);

        // (-0.4) log10(5/9) + 0.4 log10(5)
        let expected = -0.4 * (0.5f64 / 0.9).log10() + 0.4 * 5.0f64.log10();
        assert_relative_eq!(kld(p.view(), q.view()).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_kld_skips_zero_support() {
        let p = arr1(&[0.0, 1.0]);
        let q = arr1(&[0.5, 0.5]);

        let expected = 0.5 * 2.0f64.log10();
        assert_relative_eq!(kld(p.view(), q.view()).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_kld_identical_is_zero() {
        let p = arr1(&[0.1, 0.2, 0.7]);
        assert_eq!(kld(p.view(), p.view()).unwrap(), 0.0);
    }

    #[test]
    fn test_dimension_mismatch() {
        let p = arr1(&[0.5, 0.5]);
        let q = arr1(&[0.2, 0.3, 0.5]);

        assert_eq!(
            kld(p.view(), q.view()),
            Err(DynamicsError::DimensionMismatch { expected: 2, actual: 3 })
        );
        assert!(matches!(
            jsd(p.view(), q.view(), 2.0),
            Err(DynamicsError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_zero_vector_rejected() {
        let p = arr1(&[0.0, 0.0]);
        let q = arr1(&[0.5, 0.5]);

        assert!(matches!(
            jsd(p.view(), q.view(), 2.0),
            Err(DynamicsError::Normalization(_))
        ));
        assert!(matches!(normalize(arr1(&[0.5, -0.1]).view()), Err(DynamicsError::Normalization(_))));
    }

    #[test]
    fn test_jsd_reference_value() {
        let p = arr1(&[0.5, 0.5]);
        let q = arr1(&[0.9, 0.1]);

        // m = [0.7, 0.3]
        assert_abs_diff_eq!(jsd(p.view(), q.view(), 2.0).unwrap(), 0.146793, epsilon = 1e-5);
        assert_abs_diff_eq!(
            jsd(p.view(), q.view(), std::f64::consts::E).unwrap(),
            0.101749,
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_jsd_renormalizes() {
        let p = arr1(&[1.0, 1.0]);
        let q = arr1(&[9.0, 1.0]);

        let raw = jsd(p.view(), q.view(), 2.0).unwrap();
        let unit = jsd(arr1(&[0.5, 0.5]).view(), arr1(&[0.9, 0.1]).view(), 2.0).unwrap();
        assert_abs_diff_eq!(raw, unit, epsilon = 1e-12);
    }

    #[test]
    fn test_jsd_properties_random() {
        let mut rng = StdRng::seed_from_u64(17);
        let dirichlet = Dirichlet::new([0.5; 6]).unwrap();
        let ln2 = std::f64::consts::LN_2;

        for _ in 0..200 {
            let p = Array1::from(dirichlet.sample(&mut rng).to_vec());
            let q = Array1::from(dirichlet.sample(&mut rng).to_vec());

            let pq = jsd(p.view(), q.view(), std::f64::consts::E).unwrap();
            let qp = jsd(q.view(), p.view(), std::f64::consts::E).unwrap();

            assert_abs_diff_eq!(pq, qp, epsilon = 1e-12);
            assert!(pq >= -1e-12, "jsd below zero: {}", pq);
            assert!(pq <= ln2 + 1e-12, "jsd above ln 2: {}", pq);
            assert_abs_diff_eq!(jsd(p.view(), p.view(), 2.0).unwrap(), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_relative_entropy_invalid_base() {
        let p = arr1(&[0.5, 0.5]);
        assert!(matches!(
            relative_entropy(p.view(), p.view(), 1.0),
            Err(DynamicsError::Configuration(_))
        ));
    }
}
