use log::{debug, trace};

use crate::algorithms::common::ReferenceDotProducts;
use crate::core::backend::ComputeBackend;
use crate::core::batch::SeriesBatch;
use crate::core::error::{check_non_negative, check_window, Result, TsaError};
use crate::core::matrix_profile::{DistanceProfile, RollingStats, DEFAULT_EPSILON, INVALID_DISTANCE};

/// Convert sliding dot products into z-normalized Euclidean distances.
///
/// For each reference offset `k`:
/// `d = sqrt(max(0, 2m * (1 - r)))` with
/// `r = (qt[k] - m * mean_t[k] * mean_q) / (m * sigma_t[k] * sigma_q)`,
/// `r` clamped to `[-1, 1]`. When the query or the reference window has a
/// standard deviation below `epsilon`, the entry is [`INVALID_DISTANCE`].
///
/// Returns the number of degenerate reference windows.
pub(crate) fn distance_profile_into(
    qt: &[f64],
    mean_q: f64,
    sigma_q: f64,
    stats: &RollingStats,
    epsilon: f64,
    out: &mut [f64],
) -> usize {
    if sigma_q < epsilon {
        out.fill(INVALID_DISTANCE);
        return out.len();
    }

    let m_f = stats.m as f64;
    let two_m = 2.0 * m_f;
    let mut degenerate = 0;
    for (k, d) in out.iter_mut().enumerate() {
        let sigma_t = stats.std[k];
        if sigma_t < epsilon {
            *d = INVALID_DISTANCE;
            degenerate += 1;
            continue;
        }
        let r = (qt[k] - m_f * stats.mean[k] * mean_q) / (m_f * sigma_t * sigma_q);
        let r_clamped = r.clamp(-1.0, 1.0);
        *d = (two_m * (1.0 - r_clamped)).max(0.0).sqrt();
    }
    degenerate
}

/// Mean and standard deviation of a query window from its sum and sum of squares.
#[inline]
pub(crate) fn query_moments(sum_q: f64, sum_q2: f64, m: usize) -> (f64, f64) {
    let m_f = m as f64;
    let mean_q = sum_q / m_f;
    let var_q = (sum_q2 / m_f - mean_q * mean_q).max(0.0);
    (mean_q, var_q.sqrt())
}

/// Compute the distance profile from a precomputed sliding dot product.
///
/// `qt` is the sliding dot product of a length-`m` query against the reference,
/// `sum_q` / `sum_q2` the query's sum and sum of squares, and `stats` the
/// reference's rolling statistics for window `m`.
///
/// # Errors
/// [`TsaError::Shape`] if `qt` and `stats` disagree in length or `stats` is
/// internally inconsistent;
/// [`TsaError::InvalidParameter`] for a negative or non-finite `epsilon`.
pub fn calculate_distance_profile(
    qt: &[f64],
    sum_q: f64,
    sum_q2: f64,
    stats: &RollingStats,
    epsilon: f64,
) -> Result<DistanceProfile> {
    check_non_negative("epsilon", epsilon)?;
    stats.check_consistent()?;
    if qt.len() != stats.len() {
        return Err(TsaError::shape(format!(
            "sliding dot product has {} offsets but statistics cover {}",
            qt.len(),
            stats.len()
        )));
    }
    let (mean_q, sigma_q) = query_moments(sum_q, sum_q2, stats.m);
    let mut distances = vec![0.0; qt.len()];
    distance_profile_into(qt, mean_q, sigma_q, stats, epsilon, &mut distances);
    Ok(DistanceProfile::from_distances(distances))
}

/// Check (or compute) the reference statistics for a length-`m` query.
fn reference_stats<'a>(
    reference: &[f64],
    m: usize,
    stats: Option<&'a RollingStats>,
) -> Result<std::borrow::Cow<'a, RollingStats>> {
    match stats {
        Some(s) => {
            s.check_consistent()?;
            let expected = reference.len() - m + 1;
            if s.m != m || s.len() != expected {
                return Err(TsaError::shape(format!(
                    "statistics for m={} over {} windows do not match query length {m} \
                     against {expected} reference windows",
                    s.m,
                    s.len()
                )));
            }
            Ok(std::borrow::Cow::Borrowed(s))
        }
        None => Ok(std::borrow::Cow::Owned(RollingStats::compute_unchecked(
            reference, m,
        ))),
    }
}

/// Compute the z-normalized distance profile of `query` against `reference`.
///
/// Implements MASS (Mueen's Algorithm for Similarity Search):
/// 1. Reuse (or compute) the rolling statistics of the reference
/// 2. Compute the sliding dot product between query and reference
/// 3. Convert QT values to z-normalized Euclidean distances
///
/// Pass the reference's [`RollingStats`] when running many queries against the
/// same reference; `None` computes them on the fly. Uses [`DEFAULT_EPSILON`] as
/// the degenerate-window floor.
///
/// # Errors
/// [`TsaError::InvalidWindow`] unless `2 <= query.len() <= reference.len()`;
/// [`TsaError::Shape`] if `stats` was computed for a different window or series.
///
/// # Examples
///
/// ```
/// use tsa_rs::mass;
///
/// let ts = [0.0, 1.0, 3.0, 2.0, 9.0, 1.0, 14.0, 15.0, 1.0, 2.0, 2.0, 10.0, 7.0];
/// let query = [1.0, 3.0, 2.0];
/// let dp = mass(&query, &ts, None).unwrap();
/// assert_eq!(dp.distances.len(), ts.len() - query.len() + 1);
/// assert_eq!(dp.index, 1);
/// ```
pub fn mass(query: &[f64], reference: &[f64], stats: Option<&RollingStats>) -> Result<DistanceProfile> {
    mass_with_epsilon(query, reference, stats, DEFAULT_EPSILON)
}

/// [`mass`] with an explicit degenerate-window floor.
pub fn mass_with_epsilon(
    query: &[f64],
    reference: &[f64],
    stats: Option<&RollingStats>,
    epsilon: f64,
) -> Result<DistanceProfile> {
    let m = query.len();
    check_window(m, reference.len())?;
    check_non_negative("epsilon", epsilon)?;
    let stats = reference_stats(reference, m, stats)?;

    let qt = ReferenceDotProducts::new(reference, m).dot(query);
    let sum_q: f64 = query.iter().sum();
    let sum_q2: f64 = query.iter().map(|x| x * x).sum();
    let (mean_q, sigma_q) = query_moments(sum_q, sum_q2, m);

    let mut distances = vec![0.0; qt.len()];
    let degenerate = distance_profile_into(&qt, mean_q, sigma_q, &stats, epsilon, &mut distances);
    if degenerate > 0 {
        trace!("mass: {degenerate} of {} windows degenerate", distances.len());
    }
    Ok(DistanceProfile::from_distances(distances))
}

/// Run MASS for every query column of `queries` against one reference.
///
/// `queries` is an `m × Q` batch; one [`DistanceProfile`] is returned per
/// query, in column order. The reference statistics and spectrum are computed
/// once and shared; queries are dispatched through the backend.
pub fn mass_batch<B: ComputeBackend>(
    queries: &SeriesBatch,
    reference: &[f64],
    stats: Option<&RollingStats>,
    epsilon: f64,
) -> Result<Vec<DistanceProfile>> {
    let m = queries.series_len();
    check_window(m, reference.len())?;
    check_non_negative("epsilon", epsilon)?;
    let stats = reference_stats(reference, m, stats)?;
    debug!(
        "mass batch: {} queries of length {m} against reference of length {}, backend={}",
        queries.count(),
        reference.len(),
        B::name()
    );

    let qs = queries.to_contiguous_series();
    let prepared = ReferenceDotProducts::new(reference, m);
    let stats: &RollingStats = &stats;
    Ok(B::map_indexed(qs.len(), |i| {
        let q = &qs[i];
        let qt = prepared.dot(q);
        let sum_q: f64 = q.iter().sum();
        let sum_q2: f64 = q.iter().map(|x| x * x).sum();
        let (mean_q, sigma_q) = query_moments(sum_q, sum_q2, m);
        let mut distances = vec![0.0; qt.len()];
        distance_profile_into(&qt, mean_q, sigma_q, stats, epsilon, &mut distances);
        DistanceProfile::from_distances(distances)
    }))
}
