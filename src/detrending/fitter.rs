//! Least-Squares Polynomial Trend Operators
//!
//! For a segment of L samples on the centred grid
//!
//!   x = −(L−1)/2, …, (L−1)/2
//!
//! the design matrix A has columns x⁰ … xᵖ and the fitted trend of data y is
//!
//!   ŷ = H y,   H = A (AᵀA)⁻¹ Aᵀ
//!
//! H depends only on (L, p), so it is built once and shared.

use std::collections::HashMap;
use std::sync::Arc;

use nalgebra::DMatrix;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use parking_lot::Mutex;

use crate::error::{DynamicsError, Result};

/// Projection operator onto polynomials of order `p` over `L` samples
#[derive(Debug, Clone)]
pub struct PolynomialTrendFitter {
    len: usize,
    order: usize,
    /// L × L hat matrix
    projection: Array2<f64>,
}

impl PolynomialTrendFitter {
    /// Build the operator for segments of `len` samples
    pub fn new(len: usize, order: usize) -> Result<Self> {
        if len <= order {
            return Err(DynamicsError::config(format!(
                "segment of {} points cannot fit a polynomial of order {}",
                len, order
            )));
        }

        let design = design_matrix(len, order);
        let gram_inv = inverse_gram(design.transpose() * &design)?;
        let hat = &design * gram_inv * design.transpose();
        let projection = Array2::from_shape_fn((len, len), |(i, j)| hat[(i, j)]);

        Ok(Self {
            len,
            order,
            projection,
        })
    }

    /// Fitted trend of one segment
    pub fn fit(&self, segment: ArrayView1<f64>) -> Result<Array1<f64>> {
        if segment.len() != self.len {
            return Err(DynamicsError::DimensionMismatch {
                expected: self.len,
                actual: segment.len(),
            });
        }
        Ok(self.projection.dot(&segment))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn projection(&self) -> ArrayView2<'_, f64> {
        self.projection.view()
    }
}

/// Columns x⁰ … xᵖ over the centred grid of `len` points
fn design_matrix(len: usize, order: usize) -> DMatrix<f64> {
    let centre = (len as f64 - 1.0) / 2.0;
    DMatrix::from_fn(len, order + 1, |i, j| (i as f64 - centre).powi(j as i32))
}

/// (AᵀA)⁻¹, rejecting singular or non-finite results
fn inverse_gram(gram: DMatrix<f64>) -> Result<DMatrix<f64>> {
    let size = gram.nrows();
    let Some(inverse) = gram.try_inverse() else {
        return Err(DynamicsError::NumericInstability(format!(
            "singular {}x{} normal matrix",
            size, size
        )));
    };

    if inverse.iter().any(|v| !v.is_finite()) {
        return Err(DynamicsError::NumericInstability(
            "normal matrix inverse is not finite".to_string(),
        ));
    }

    Ok(inverse)
}

/// Thread-safe memo of operators keyed by (length, order)
#[derive(Debug, Default)]
pub struct FitterCache {
    operators: Mutex<HashMap<(usize, usize), Arc<PolynomialTrendFitter>>>,
}

impl FitterCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch or build the operator for (`len`, `order`)
    pub fn get(&self, len: usize, order: usize) -> Result<Arc<PolynomialTrendFitter>> {
        if let Some(fitter) = self.operators.lock().get(&(len, order)) {
            return Ok(Arc::clone(fitter));
        }

        tracing::trace!(len, order, "building trend operator");
        let fitter = Arc::new(PolynomialTrendFitter::new(len, order)?);

        let mut operators = self.operators.lock();
        let entry = operators.entry((len, order)).or_insert(fitter);
        Ok(Arc::clone(entry))
    }

    /// Number of cached operators
    pub fn len(&self) -> usize {
        self.operators.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::arr1;

    #[test]
    fn test_rejects_underdetermined() {
        assert!(matches!(
            PolynomialTrendFitter::new(2, 2),
            Err(DynamicsError::Configuration(_))
        ));
        assert!(matches!(
            PolynomialTrendFitter::new(1, 3),
            Err(DynamicsError::Configuration(_))
        ));
        assert!(PolynomialTrendFitter::new(3, 2).is_ok());
    }

    #[test]
    fn test_projection_is_idempotent() {
        let fitter = PolynomialTrendFitter::new(9, 2).unwrap();
        let h = fitter.projection();
        let hh = h.dot(&h);

        for (a, b) in h.iter().zip(hh.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_reproduces_polynomials() {
        let fitter = PolynomialTrendFitter::new(11, 2).unwrap();
        let y = Array1::from_shape_fn(11, |i| {
            let x = i as f64;
            3.0 - 0.5 * x + 0.25 * x * x
        });

        let trend = fitter.fit(y.view()).unwrap();
        for (a, b) in trend.iter().zip(y.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_order_zero_is_mean() {
        let fitter = PolynomialTrendFitter::new(4, 0).unwrap();
        let trend = fitter.fit(arr1(&[1.0, 2.0, 3.0, 6.0]).view()).unwrap();

        for v in trend.iter() {
            assert_abs_diff_eq!(*v, 3.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_fit_checks_length() {
        let fitter = PolynomialTrendFitter::new(5, 1).unwrap();
        assert_eq!(
            fitter.fit(arr1(&[1.0, 2.0]).view()).unwrap_err(),
            DynamicsError::DimensionMismatch { expected: 5, actual: 2 }
        );
    }

    #[test]
    fn test_singular_matrix() {
        // Two identical grid points make the linear normal matrix singular
        let design = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 1.0, 2.0]);
        assert!(matches!(
            inverse_gram(design.transpose() * &design),
            Err(DynamicsError::NumericInstability(_))
        ));

        let inverse = inverse_gram(DMatrix::from_row_slice(2, 2, &[2.0, 0.0, 0.0, 4.0])).unwrap();
        assert_abs_diff_eq!(inverse[(0, 0)], 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(inverse[(1, 1)], 0.25, epsilon = 1e-15);
    }

    #[test]
    fn test_cache_reuses_operators() {
        let cache = FitterCache::new();
        let a = cache.get(7, 1).unwrap();
        let b = cache.get(7, 1).unwrap();
        let _c = cache.get(9, 1).unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 2);
        assert!(cache.get(1, 1).is_err());
    }
}
