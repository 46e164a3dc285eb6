use log::debug;
use ndarray::Array2;

use crate::core::backend::ComputeBackend;
use crate::core::batch::{DistanceMatrix, SeriesBatch};
use crate::core::distance_metric::DistanceMetric;
use crate::core::error::{Result, TsaError};

/// Compute the pairwise distance matrix of a series batch under `metric`.
///
/// All `N·(N-1)/2` pairs `(i, j)` with `i < j` are enumerated once and handed
/// to the backend as one batch; each pair runs the metric's scalar kernel on
/// contiguous copies of the two series. Only the strict upper triangle of the
/// result is populated; the diagonal and lower triangle are zero.
///
/// # Errors
/// [`TsaError::Shape`] if the batch holds fewer than 2 series.
pub fn distance_matrix<M, B>(batch: &SeriesBatch, metric: &M) -> Result<DistanceMatrix>
where
    M: DistanceMetric,
    B: ComputeBackend,
{
    let n = batch.count();
    if n < 2 {
        return Err(TsaError::shape(format!(
            "distance matrix needs at least 2 series, got {n}"
        )));
    }
    debug!(
        "{} distance matrix: {} series of length {}, backend={}",
        metric.name(),
        n,
        batch.series_len(),
        B::name()
    );

    let series = batch.to_contiguous_series();
    let pairs = upper_pairs(n);
    let values = B::map_indexed(pairs.len(), |p| {
        let (i, j) = pairs[p];
        metric.distance(&series[i], &series[j])
    });

    let mut out = Array2::<f64>::zeros((n, n));
    for (&(i, j), d) in pairs.iter().zip(values) {
        out[[i, j]] = d;
    }
    Ok(DistanceMatrix::from_upper(out))
}

/// Row-major list of the strict upper-triangle coordinates of an `n × n` matrix.
fn upper_pairs(n: usize) -> Vec<(usize, usize)> {
    let mut pairs = Vec::with_capacity(n * (n - 1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            pairs.push((i, j));
        }
    }
    pairs
}
