//! Time-ordered document representations.

use ndarray::{Array2, ArrayView1, ArrayView2};

use crate::error::{DynamicsError, Result};

/// Document-topic vectors with one timestamp per row
#[derive(Debug, Clone)]
pub struct TimeSeries<T> {
    /// Row i is the probability vector of document i
    vectors: Array2<f64>,
    /// Timestamp of each row
    timestamps: Vec<T>,
}

impl<T: PartialOrd + Clone> TimeSeries<T> {
    /// Build from rows of equal dimensionality
    pub fn new(rows: Vec<Vec<f64>>, timestamps: Vec<T>) -> Result<Self> {
        let dim = rows.first().map(|r| r.len()).unwrap_or(0);

        for row in &rows {
            if row.len() != dim {
                return Err(DynamicsError::DimensionMismatch {
                    expected: dim,
                    actual: row.len(),
                });
            }
        }

        let n = rows.len();
        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        let vectors = Array2::from_shape_vec((n, dim), flat)
            .map_err(|e| DynamicsError::config(format!("cannot shape topic matrix: {}", e)))?;

        Self::from_array(vectors, timestamps)
    }

    /// Build from a precomputed (documents × topics) matrix
    pub fn from_array(vectors: Array2<f64>, timestamps: Vec<T>) -> Result<Self> {
        if vectors.nrows() != timestamps.len() {
            return Err(DynamicsError::DimensionMismatch {
                expected: vectors.nrows(),
                actual: timestamps.len(),
            });
        }
        if vectors.nrows() == 0 || vectors.ncols() == 0 {
            return Err(DynamicsError::config("time series is empty"));
        }

        Ok(Self { vectors, timestamps })
    }

    /// Reorder rows ascending by timestamp (stable for equal stamps)
    pub fn sort_by_time(self) -> Self {
        let mut order: Vec<usize> = (0..self.timestamps.len()).collect();
        order.sort_by(|&a, &b| {
            self.timestamps[a]
                .partial_cmp(&self.timestamps[b])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let vectors = self.vectors.select(ndarray::Axis(0), &order);
        let timestamps = order.iter().map(|&i| self.timestamps[i].clone()).collect();

        Self { vectors, timestamps }
    }
}

impl<T> TimeSeries<T> {
    /// Number of documents
    pub fn len(&self) -> usize {
        self.vectors.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.nrows() == 0
    }

    /// Number of topics per document
    pub fn dimension(&self) -> usize {
        self.vectors.ncols()
    }

    /// Distribution of document `i`; panics if `i >= len()`
    pub fn vector(&self, i: usize) -> ArrayView1<'_, f64> {
        self.vectors.row(i)
    }

    /// All distributions, one row per document
    pub fn vectors(&self) -> ArrayView2<'_, f64> {
        self.vectors.view()
    }

    pub fn timestamps(&self) -> &[T] {
        &self.timestamps
    }
}

/// Sliding window and boundary fill value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowSpec {
    /// Number of neighbours compared on each side
    pub window: usize,
    /// Value written where no full window exists
    pub weight: f64,
}

impl WindowSpec {
    pub fn new(window: usize, weight: f64) -> Self {
        Self { window, weight }
    }

    /// Check the window against a series of `len` documents
    pub fn validate(&self, len: usize) -> Result<()> {
        if self.window == 0 {
            return Err(DynamicsError::config("window must be at least 1"));
        }
        if self.window >= len {
            return Err(DynamicsError::config(format!(
                "window {} leaves no computable position in a series of {}",
                self.window, len
            )));
        }
        if !self.weight.is_finite() {
            return Err(DynamicsError::config("boundary weight must be finite"));
        }
        Ok(())
    }
}

impl Default for WindowSpec {
    fn default() -> Self {
        Self {
            window: 3,
            weight: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_checks_lengths() {
        let rows = vec![vec![0.5, 0.5], vec![0.1, 0.9]];

        assert!(TimeSeries::new(rows.clone(), vec![1, 2]).is_ok());
        assert_eq!(
            TimeSeries::new(rows, vec![1]).unwrap_err(),
            DynamicsError::DimensionMismatch { expected: 2, actual: 1 }
        );

        let ragged = vec![vec![0.5, 0.5], vec![1.0]];
        assert!(matches!(
            TimeSeries::new(ragged, vec![1, 2]),
            Err(DynamicsError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_sort_by_time() {
        let rows = vec![vec![0.3, 0.7], vec![0.1, 0.9], vec![0.2, 0.8]];
        let stamps = vec!["2020-01-03", "2020-01-01", "2020-01-02"];

        let ts = TimeSeries::new(rows, stamps).unwrap().sort_by_time();

        assert_eq!(ts.timestamps(), &["2020-01-01", "2020-01-02", "2020-01-03"]);
        assert_eq!(ts.vector(0)[0], 0.1);
        assert_eq!(ts.vector(1)[0], 0.2);
        assert_eq!(ts.vector(2)[0], 0.3);
    }

    #[test]
    fn test_window_validation() {
        assert!(WindowSpec::new(0, 0.0).validate(10).is_err());
        assert!(WindowSpec::new(10, 0.0).validate(10).is_err());
        assert!(WindowSpec::new(9, 0.0).validate(10).is_ok());
    }
}
