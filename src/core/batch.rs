use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

use crate::core::error::{Result, TsaError};

/// A batch of equal-length time series.
///
/// Stored as an `L × N` array: axis 0 is the time index, axis 1 selects the
/// series. Construction guarantees `L >= 1` and `N >= 1`; operations with a
/// stricter requirement (e.g. distance matrices need `N >= 2`) check it
/// themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesBatch {
    data: Array2<f64>,
}

impl SeriesBatch {
    /// Wrap an `L × N` array.
    pub fn new(data: Array2<f64>) -> Result<Self> {
        let (len, count) = data.dim();
        if len == 0 {
            return Err(TsaError::shape("series length must be > 0"));
        }
        if count == 0 {
            return Err(TsaError::shape("batch must contain at least one series"));
        }
        Ok(Self { data })
    }

    /// Build a batch from one slice per series.
    ///
    /// ```
    /// use tsa_rs::SeriesBatch;
    ///
    /// let batch = SeriesBatch::from_series(&[&[0.0, 0.0, 0.0], &[0.0, 1.0, 0.0]]).unwrap();
    /// assert_eq!(batch.series_len(), 3);
    /// assert_eq!(batch.count(), 2);
    /// ```
    pub fn from_series(series: &[&[f64]]) -> Result<Self> {
        let count = series.len();
        if count == 0 {
            return Err(TsaError::shape("batch must contain at least one series"));
        }
        let len = series[0].len();
        if let Some((idx, s)) = series.iter().enumerate().find(|(_, s)| s.len() != len) {
            return Err(TsaError::shape(format!(
                "series {idx} has length {}, expected {len}",
                s.len()
            )));
        }
        let data = Array2::from_shape_fn((len, count), |(t, n)| series[n][t]);
        Self::new(data)
    }

    /// Build a batch from a column-major buffer (`count` series of `len` points each,
    /// laid out one after another).
    pub fn from_column_major(values: &[f64], len: usize, count: usize) -> Result<Self> {
        if values.len() != len * count {
            return Err(TsaError::shape(format!(
                "buffer of {} values cannot hold {count} series of length {len}",
                values.len()
            )));
        }
        let data = Array2::from_shape_fn((len, count), |(t, n)| values[n * len + t]);
        Self::new(data)
    }

    /// Number of points per series (`L`).
    pub fn series_len(&self) -> usize {
        self.data.nrows()
    }

    /// Number of series in the batch (`N`).
    pub fn count(&self) -> usize {
        self.data.ncols()
    }

    /// View of series `idx` along the time axis.
    pub fn series(&self, idx: usize) -> ArrayView1<'_, f64> {
        self.data.column(idx)
    }

    /// The underlying `L × N` array.
    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    /// Each series copied into its own contiguous buffer.
    ///
    /// The batch is stored time-major, so a column is strided; the kernels walk
    /// each series many times and want contiguous slices.
    pub(crate) fn to_contiguous_series(&self) -> Vec<Vec<f64>> {
        self.data
            .axis_iter(Axis(1))
            .map(|col| col.iter().copied().collect())
            .collect()
    }
}

/// Pairwise distances between the series of a batch.
///
/// Only the strict upper triangle (`row < col`) is populated: entry `(i, j)`
/// holds `distance(series_i, series_j)` for `i < j`. The diagonal and the lower
/// triangle are zero. Use [`get`](Self::get) for an order-independent lookup or
/// [`to_symmetric`](Self::to_symmetric) for a fully populated matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    values: Array2<f64>,
}

impl DistanceMatrix {
    pub(crate) fn from_upper(values: Array2<f64>) -> Self {
        debug_assert_eq!(values.nrows(), values.ncols());
        Self { values }
    }

    /// Number of series the matrix was computed over.
    pub fn size(&self) -> usize {
        self.values.nrows()
    }

    /// Distance between series `i` and `j`, in either order. Zero when `i == j`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        if i <= j {
            self.values[[i, j]]
        } else {
            self.values[[j, i]]
        }
    }

    /// The raw upper-triangular `N × N` array.
    pub fn upper(&self) -> &Array2<f64> {
        &self.values
    }

    /// Consume the matrix, returning the raw upper-triangular array.
    pub fn into_upper(self) -> Array2<f64> {
        self.values
    }

    /// A copy with the upper triangle mirrored into the lower one.
    pub fn to_symmetric(&self) -> Array2<f64> {
        let n = self.size();
        Array2::from_shape_fn((n, n), |(i, j)| self.get(i, j))
    }
}
