//! Pairwise distance matrices and matrix profiles over batches of time series.
//!
//! Two independent entry points:
//!
//! - **Distance matrices** ([`euclidean`], [`squared_euclidean`], [`manhattan`],
//!   [`hamming`], [`dtw`]) over a [`SeriesBatch`] of equal-length series,
//!   returned as an upper-triangular [`DistanceMatrix`].
//! - **Matrix profiles** ([`stamp`]) built from repeated [`mass`] distance
//!   profiles, themselves built from [`sliding_dot_product`] and
//!   [`moving_mean_stdev`].
//!
//! Batched work is dispatched through a [`ComputeBackend`]; the free functions
//! use [`DefaultBackend`] (rayon when the `parallel` feature is enabled), and
//! [`Engine`] selects a backend explicitly.

pub mod algorithms;
pub mod core;
pub mod metrics;

pub use crate::algorithms::common::{
    apply_exclusion_zone, sliding_dot_product, sliding_dot_product_fft, sliding_dot_product_naive,
};
pub use crate::algorithms::mass::{calculate_distance_profile, mass, mass_with_epsilon};
pub use crate::core::backend::{ComputeBackend, DefaultBackend, Sequential};
#[cfg(feature = "parallel")]
pub use crate::core::backend::Parallel;
pub use crate::core::batch::{DistanceMatrix, SeriesBatch};
pub use crate::core::distance_metric::DistanceMetric;
pub use crate::core::error::{Result, TsaError};
pub use crate::core::matrix_profile::{
    is_valid_distance, DistanceProfile, MatrixProfile, MatrixProfileConfig, RollingStats,
    DEFAULT_EPSILON, INVALID_DISTANCE, NO_NEIGHBOR,
};
pub use crate::metrics::dtw::{dtw_distance, Dtw};
pub use crate::metrics::hamming::Hamming;
pub use crate::metrics::lp::{Euclidean, Manhattan, SquaredEuclidean};

use ndarray::Array3;

use crate::algorithms::distance_matrix::distance_matrix;

/// High-level facade over every batched operation, generic over the compute backend.
///
/// # Examples
///
/// ```
/// use tsa_rs::{Engine, MatrixProfileConfig, SeriesBatch, Sequential};
///
/// let engine = Engine::<Sequential>::new();
/// let batch = SeriesBatch::from_series(&[&[0.0, 0.0, 0.0], &[0.0, 1.0, 0.0]]).unwrap();
/// let dm = engine.euclidean(&batch).unwrap();
/// assert_eq!(dm.get(0, 1), 1.0);
///
/// let ts = vec![1.0, 2.0, 3.0, 2.0, 1.0, 2.0, 3.0, 2.0, 1.0];
/// let mp = engine.stamp_self(&ts, &MatrixProfileConfig::new(4)).unwrap();
/// assert_eq!(mp.profile.len(), ts.len() - 4 + 1);
/// ```
#[derive(Debug, Clone)]
pub struct Engine<B: ComputeBackend = DefaultBackend> {
    _backend: std::marker::PhantomData<B>,
}

impl<B: ComputeBackend> Default for Engine<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: ComputeBackend> Engine<B> {
    pub fn new() -> Self {
        Self {
            _backend: std::marker::PhantomData,
        }
    }

    /// Pairwise distance matrix under an arbitrary metric.
    pub fn distance_matrix<M: DistanceMetric>(
        &self,
        batch: &SeriesBatch,
        metric: &M,
    ) -> Result<DistanceMatrix> {
        distance_matrix::<M, B>(batch, metric)
    }

    pub fn euclidean(&self, batch: &SeriesBatch) -> Result<DistanceMatrix> {
        self.distance_matrix(batch, &Euclidean)
    }

    pub fn squared_euclidean(&self, batch: &SeriesBatch) -> Result<DistanceMatrix> {
        self.distance_matrix(batch, &SquaredEuclidean)
    }

    pub fn manhattan(&self, batch: &SeriesBatch) -> Result<DistanceMatrix> {
        self.distance_matrix(batch, &Manhattan)
    }

    pub fn hamming(&self, batch: &SeriesBatch) -> Result<DistanceMatrix> {
        self.distance_matrix(batch, &Hamming::default())
    }

    /// Hamming distance counting only differences larger than `tolerance`.
    pub fn hamming_with_tolerance(
        &self,
        batch: &SeriesBatch,
        tolerance: f64,
    ) -> Result<DistanceMatrix> {
        self.distance_matrix(batch, &Hamming::with_tolerance(tolerance)?)
    }

    pub fn dtw(&self, batch: &SeriesBatch) -> Result<DistanceMatrix> {
        self.distance_matrix(batch, &Dtw)
    }

    /// Sliding dot products of every query against every reference series,
    /// shaped `(offset, query, series)`.
    pub fn sliding_dot_product_batch(
        &self,
        queries: &SeriesBatch,
        references: &SeriesBatch,
    ) -> Result<Array3<f64>> {
        crate::algorithms::common::sliding_dot_product_batch::<B>(queries, references)
    }

    /// Moving mean and standard deviation of every series in the batch.
    pub fn moving_mean_stdev_batch(&self, batch: &SeriesBatch, m: usize) -> Result<Vec<RollingStats>> {
        RollingStats::compute_batch::<B>(batch, m)
    }

    /// MASS for every query column against one reference series.
    pub fn mass_batch(
        &self,
        queries: &SeriesBatch,
        reference: &[f64],
        stats: Option<&RollingStats>,
        epsilon: f64,
    ) -> Result<Vec<DistanceProfile>> {
        crate::algorithms::mass::mass_batch::<B>(queries, reference, stats, epsilon)
    }

    /// STAMP matrix profile; element-wise equal inputs are treated as a self-join.
    pub fn stamp(
        &self,
        ta: &[f64],
        tb: &[f64],
        config: &MatrixProfileConfig,
    ) -> Result<MatrixProfile> {
        crate::algorithms::stamp::stamp::<B>(ta, tb, config)
    }

    /// STAMP self-join with trivial-match exclusion.
    pub fn stamp_self(&self, ts: &[f64], config: &MatrixProfileConfig) -> Result<MatrixProfile> {
        crate::algorithms::stamp::stamp_self::<B>(ts, config)
    }

    /// STAMP join between two series without any exclusion zone.
    pub fn stamp_ab(
        &self,
        ta: &[f64],
        tb: &[f64],
        config: &MatrixProfileConfig,
    ) -> Result<MatrixProfile> {
        crate::algorithms::stamp::stamp_ab::<B>(ta, tb, config)
    }
}

/// Euclidean distance matrix: `sqrt(sum_t (x_i[t] - x_j[t])^2)` for `i < j`.
///
/// ```
/// use tsa_rs::{euclidean, SeriesBatch};
///
/// let batch =
///     SeriesBatch::from_series(&[&[0.0, 0.0, 0.0], &[0.0, 1.0, 0.0], &[1.0, 0.0, 0.0]]).unwrap();
/// let dm = euclidean(&batch).unwrap();
/// assert_eq!(dm.get(0, 1), 1.0);
/// assert!((dm.get(1, 2) - 2.0_f64.sqrt()).abs() < 1e-12);
/// ```
pub fn euclidean(batch: &SeriesBatch) -> Result<DistanceMatrix> {
    Engine::<DefaultBackend>::new().euclidean(batch)
}

/// Squared Euclidean distance matrix.
pub fn squared_euclidean(batch: &SeriesBatch) -> Result<DistanceMatrix> {
    Engine::<DefaultBackend>::new().squared_euclidean(batch)
}

/// Manhattan (L1) distance matrix.
pub fn manhattan(batch: &SeriesBatch) -> Result<DistanceMatrix> {
    Engine::<DefaultBackend>::new().manhattan(batch)
}

/// Hamming distance matrix with exact equality per position.
pub fn hamming(batch: &SeriesBatch) -> Result<DistanceMatrix> {
    Engine::<DefaultBackend>::new().hamming(batch)
}

/// Hamming distance matrix counting positions with `|x_i[t] - x_j[t]| > tolerance`.
pub fn hamming_with_tolerance(batch: &SeriesBatch, tolerance: f64) -> Result<DistanceMatrix> {
    Engine::<DefaultBackend>::new().hamming_with_tolerance(batch, tolerance)
}

/// Unconstrained DTW distance matrix.
pub fn dtw(batch: &SeriesBatch) -> Result<DistanceMatrix> {
    Engine::<DefaultBackend>::new().dtw(batch)
}

/// Batched sliding dot product, shaped `(offset, query, series)`.
pub fn sliding_dot_product_batch(
    queries: &SeriesBatch,
    references: &SeriesBatch,
) -> Result<Array3<f64>> {
    Engine::<DefaultBackend>::new().sliding_dot_product_batch(queries, references)
}

/// Moving mean and standard deviation of `series` for window length `m`.
pub fn moving_mean_stdev(series: &[f64], m: usize) -> Result<RollingStats> {
    RollingStats::compute(series, m)
}

/// Moving mean and standard deviation of every series in a batch.
pub fn moving_mean_stdev_batch(batch: &SeriesBatch, m: usize) -> Result<Vec<RollingStats>> {
    Engine::<DefaultBackend>::new().moving_mean_stdev_batch(batch, m)
}

/// MASS for every query column against one reference series.
pub fn mass_batch(
    queries: &SeriesBatch,
    reference: &[f64],
    stats: Option<&RollingStats>,
) -> Result<Vec<DistanceProfile>> {
    Engine::<DefaultBackend>::new().mass_batch(queries, reference, stats, DEFAULT_EPSILON)
}

/// Matrix profile of `ta` against `tb` with window `m` (STAMP).
///
/// Element-wise equal inputs are treated as a self-join with the default
/// exclusion zone.
///
/// ```
/// use tsa_rs::stamp;
///
/// let ts = [1.0, 2.0, 3.0, 4.0, 1.0, 2.0, 3.0, 4.0];
/// let mp = stamp(&ts, &ts, 4).unwrap();
/// assert!(mp.profile[0] < 1e-6);
/// assert_eq!(mp.profile_index[0], 4);
/// ```
pub fn stamp(ta: &[f64], tb: &[f64], m: usize) -> Result<MatrixProfile> {
    stamp_with_config(ta, tb, &MatrixProfileConfig::new(m))
}

/// [`stamp`] with explicit epsilon and exclusion-zone settings.
pub fn stamp_with_config(
    ta: &[f64],
    tb: &[f64],
    config: &MatrixProfileConfig,
) -> Result<MatrixProfile> {
    Engine::<DefaultBackend>::new().stamp(ta, tb, config)
}

/// Self-join matrix profile of `ts` with window `m`.
pub fn stamp_self(ts: &[f64], m: usize) -> Result<MatrixProfile> {
    Engine::<DefaultBackend>::new().stamp_self(ts, &MatrixProfileConfig::new(m))
}

/// Matrix profile of `ta` against `tb` with no exclusion zone.
pub fn stamp_ab(ta: &[f64], tb: &[f64], m: usize) -> Result<MatrixProfile> {
    Engine::<DefaultBackend>::new().stamp_ab(ta, tb, &MatrixProfileConfig::new(m))
}
