use std::sync::Arc;

use log::trace;
use ndarray::Array3;
use realfft::num_complex::Complex;
use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};

use crate::core::backend::ComputeBackend;
use crate::core::batch::SeriesBatch;
use crate::core::error::{Result, TsaError};
use crate::core::matrix_profile::INVALID_DISTANCE;

/// Size threshold (n * m) above which we dispatch to the FFT path.
/// Below this, the naive O(n*m) loop wins due to lower constant overhead.
const FFT_THRESHOLD: usize = 256 * 1024;

fn check_query(m: usize, n: usize) -> Result<()> {
    if m == 0 {
        return Err(TsaError::shape("query must be non-empty"));
    }
    if m > n {
        return Err(TsaError::shape(format!(
            "query of length {m} is longer than reference of length {n}"
        )));
    }
    Ok(())
}

/// Compute the sliding dot product between a query subsequence `q` and time series `ts`.
///
/// Returns a vector of length `ts.len() - q.len() + 1` where element `k` is
/// `dot(q, ts[k..k+m])`.
///
/// Adaptively dispatches to an FFT-based O(n log n) implementation for large
/// inputs, falling back to the naive O(n*m) loop for small inputs.
pub fn sliding_dot_product(q: &[f64], ts: &[f64]) -> Result<Vec<f64>> {
    check_query(q.len(), ts.len())?;
    Ok(ReferenceDotProducts::new(ts, q.len()).dot(q))
}

/// Naive O(n*m) sliding dot product.
///
/// Requires `1 <= q.len() <= ts.len()`.
pub fn sliding_dot_product_naive(q: &[f64], ts: &[f64]) -> Vec<f64> {
    let m = q.len();
    debug_assert!(m > 0 && ts.len() >= m);
    let n_subs = ts.len() - m + 1;

    (0..n_subs)
        .map(|i| q.iter().zip(&ts[i..i + m]).map(|(a, b)| a * b).sum())
        .collect()
}

/// FFT-based O(n log n) sliding dot product via cross-correlation.
///
/// Requires `1 <= q.len() <= ts.len()`.
pub fn sliding_dot_product_fft(q: &[f64], ts: &[f64]) -> Vec<f64> {
    debug_assert!(!q.is_empty() && ts.len() >= q.len());
    FftReference::new(ts, q.len())
        .and_then(|r| r.dot(q, ts))
        .unwrap_or_else(|| sliding_dot_product_naive(q, ts))
}

/// Precomputed spectrum of a reference series.
///
/// Correlating many queries against the same reference only needs one forward
/// transform of the reference; each query then costs one forward and one
/// inverse transform.
struct FftReference {
    m: usize,
    fft_len: usize,
    forward: Arc<dyn RealToComplex<f64>>,
    inverse: Arc<dyn ComplexToReal<f64>>,
    spectrum: Vec<Complex<f64>>,
}

impl FftReference {
    fn new(ts: &[f64], m: usize) -> Option<Self> {
        let n = ts.len();
        let fft_len = (n + m - 1).next_power_of_two();

        let mut planner = RealFftPlanner::<f64>::new();
        let forward = planner.plan_fft_forward(fft_len);
        let inverse = planner.plan_fft_inverse(fft_len);

        // Zero-pad time series
        let mut ts_padded = vec![0.0; fft_len];
        ts_padded[..n].copy_from_slice(ts);
        let mut spectrum = forward.make_output_vec();
        forward.process(&mut ts_padded, &mut spectrum).ok()?;

        Some(Self {
            m,
            fft_len,
            forward,
            inverse,
            spectrum,
        })
    }

    fn dot(&self, q: &[f64], ts: &[f64]) -> Option<Vec<f64>> {
        let m = self.m;
        let n_subs = ts.len() - m + 1;

        // Reverse query into zero-padded buffer
        let mut q_padded = vec![0.0; self.fft_len];
        for (dst, &src) in q_padded.iter_mut().zip(q.iter().rev()) {
            *dst = src;
        }

        let mut q_spectrum = self.forward.make_output_vec();
        self.forward.process(&mut q_padded, &mut q_spectrum).ok()?;

        for (q_val, ts_val) in q_spectrum.iter_mut().zip(self.spectrum.iter()) {
            *q_val *= ts_val;
        }
        // DC and Nyquist bins of a real signal's spectrum are real; drop rounding noise
        // so the inverse transform accepts the input.
        if let Some(first) = q_spectrum.first_mut() {
            first.im = 0.0;
        }
        if let Some(last) = q_spectrum.last_mut() {
            last.im = 0.0;
        }

        let mut result = self.inverse.make_output_vec();
        self.inverse.process(&mut q_spectrum, &mut result).ok()?;

        // realfft inverse is unnormalized, divide by fft_len
        let norm = 1.0 / self.fft_len as f64;

        // Extract dot products: convolution result at indices [m-1 .. m-1+n_subs]
        Some(
            result[m - 1..m - 1 + n_subs]
                .iter()
                .map(|&x| x * norm)
                .collect(),
        )
    }
}

/// A reference series prepared for repeated sliding dot products with
/// length-`m` queries.
pub(crate) struct ReferenceDotProducts<'a> {
    ts: &'a [f64],
    fft: Option<FftReference>,
}

impl<'a> ReferenceDotProducts<'a> {
    pub(crate) fn new(ts: &'a [f64], m: usize) -> Self {
        let fft = if ts.len() * m > FFT_THRESHOLD {
            FftReference::new(ts, m)
        } else {
            None
        };
        trace!(
            "sliding dot product: n={}, m={m}, path={}",
            ts.len(),
            if fft.is_some() { "fft" } else { "direct" }
        );
        Self { ts, fft }
    }

    pub(crate) fn dot(&self, q: &[f64]) -> Vec<f64> {
        self.fft
            .as_ref()
            .and_then(|r| r.dot(q, self.ts))
            .unwrap_or_else(|| sliding_dot_product_naive(q, self.ts))
    }
}

/// Sliding dot products of every query series against every reference series.
///
/// `queries` is an `m × Q` batch, `references` an `L × S` batch. The result has
/// shape `(L - m + 1, Q, S)`: element `(k, q, s)` is the dot product of query
/// `q` with window `k` of reference `s`. Each reference is transformed once and
/// shared by all queries; references are dispatched through the backend.
pub fn sliding_dot_product_batch<B: ComputeBackend>(
    queries: &SeriesBatch,
    references: &SeriesBatch,
) -> Result<Array3<f64>> {
    let m = queries.series_len();
    let n = references.series_len();
    check_query(m, n)?;

    let n_subs = n - m + 1;
    let qs = queries.to_contiguous_series();
    let refs = references.to_contiguous_series();

    let per_ref: Vec<Vec<Vec<f64>>> = B::map_indexed(refs.len(), |s| {
        let prepared = ReferenceDotProducts::new(&refs[s], m);
        qs.iter().map(|q| prepared.dot(q)).collect()
    });

    Ok(Array3::from_shape_fn(
        (n_subs, qs.len(), refs.len()),
        |(k, q, s)| per_ref[s][q][k],
    ))
}

/// Apply an exclusion zone around index `idx`, marking entries within the zone invalid.
///
/// The zone covers indices `[idx - zone, idx + zone]` (clamped to bounds).
#[inline]
pub fn apply_exclusion_zone(profile: &mut [f64], idx: usize, zone: usize) {
    let start = idx.saturating_sub(zone);
    let end = (idx + zone + 1).min(profile.len());
    if start >= end {
        return;
    }
    for val in &mut profile[start..end] {
        *val = INVALID_DISTANCE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::backend::Sequential;

    #[test]
    fn test_sliding_dot_product_simple() {
        // q = [1, 2], ts = [1, 2, 3, 4]
        // dot([1,2], [1,2]) = 5
        // dot([1,2], [2,3]) = 8
        // dot([1,2], [3,4]) = 11
        let q = vec![1.0, 2.0];
        let ts = vec![1.0, 2.0, 3.0, 4.0];
        let result = sliding_dot_product(&q, &ts).unwrap();
        assert_eq!(result.len(), 3);
        assert!((result[0] - 5.0).abs() < 1e-10);
        assert!((result[1] - 8.0).abs() < 1e-10);
        assert!((result[2] - 11.0).abs() < 1e-10);
    }

    #[test]
    fn test_sliding_dot_product_single() {
        let q = vec![3.0, 4.0, 5.0];
        let ts = vec![3.0, 4.0, 5.0];
        let result = sliding_dot_product(&q, &ts).unwrap();
        assert_eq!(result.len(), 1);
        assert!((result[0] - 50.0).abs() < 1e-10); // 9 + 16 + 25
    }

    #[test]
    fn test_sliding_dot_product_rejects_bad_shapes() {
        assert!(sliding_dot_product(&[], &[1.0, 2.0]).is_err());
        assert!(sliding_dot_product(&[1.0, 2.0, 3.0], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_fft_vs_naive_equivalence() {
        for (n, m) in [(100, 10), (1000, 50), (5000, 100)] {
            let ts: Vec<f64> = (0..n).map(|i| (i as f64 * 0.1).sin()).collect();
            let q = &ts[0..m];
            let naive = sliding_dot_product_naive(q, &ts);
            let fft = sliding_dot_product_fft(q, &ts);
            assert_eq!(naive.len(), fft.len());
            for (i, (a, b)) in naive.iter().zip(fft.iter()).enumerate() {
                assert!(
                    (a - b).abs() < 1e-6,
                    "Mismatch at {i} (n={n}, m={m}): naive={a}, fft={b}"
                );
            }
        }
    }

    #[test]
    fn test_fft_simple() {
        // Force FFT path on the same simple case
        let q = vec![1.0, 2.0];
        let ts = vec![1.0, 2.0, 3.0, 4.0];
        let result = sliding_dot_product_fft(&q, &ts);
        assert_eq!(result.len(), 3);
        assert!((result[0] - 5.0).abs() < 1e-10);
        assert!((result[1] - 8.0).abs() < 1e-10);
        assert!((result[2] - 11.0).abs() < 1e-10);
    }

    #[test]
    fn test_prepared_reference_reused_across_queries() {
        let ts: Vec<f64> = (0..6000).map(|i| (i as f64 * 0.05).cos()).collect();
        let m = 64;
        let prepared = ReferenceDotProducts::new(&ts, m);
        assert!(prepared.fft.is_some());
        for start in [0, 100, 2500] {
            let q = &ts[start..start + m];
            let naive = sliding_dot_product_naive(q, &ts);
            let got = prepared.dot(q);
            for (a, b) in naive.iter().zip(&got) {
                assert!((a - b).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_batch_layout() {
        let queries = SeriesBatch::from_series(&[&[1.0, 2.0], &[0.0, 1.0]]).unwrap();
        let refs =
            SeriesBatch::from_series(&[&[1.0, 2.0, 3.0, 4.0], &[4.0, 3.0, 2.0, 1.0]]).unwrap();
        let out = sliding_dot_product_batch::<Sequential>(&queries, &refs).unwrap();
        assert_eq!(out.dim(), (3, 2, 2));
        // query 0 = [1,2] vs reference 0 = [1,2,3,4] → [5, 8, 11]
        assert_eq!(out[[0, 0, 0]], 5.0);
        assert_eq!(out[[2, 0, 0]], 11.0);
        // query 1 = [0,1] vs reference 1 = [4,3,2,1] → [3, 2, 1]
        assert_eq!(out[[0, 1, 1]], 3.0);
        assert_eq!(out[[2, 1, 1]], 1.0);
        // query 0 vs reference 1 → [10, 7, 4]
        assert_eq!(out[[1, 0, 1]], 7.0);
    }

    #[test]
    fn test_exclusion_zone_marks_clipped_band() {
        // (profile length, center, radius, expected sentinel range)
        let cases = [
            (10, 5, 2, 3..8),
            (5, 0, 2, 0..3),
            (5, 4, 3, 1..5),
            (5, 2, 0, 2..3),
            (3, 1, 9, 0..3),
        ];
        for (len, idx, zone, band) in cases {
            let mut profile: Vec<f64> = (0..len).map(|k| k as f64 + 0.5).collect();
            apply_exclusion_zone(&mut profile, idx, zone);
            for (k, &d) in profile.iter().enumerate() {
                if band.contains(&k) {
                    assert_eq!(d, INVALID_DISTANCE, "len={len} idx={idx} zone={zone} k={k}");
                } else {
                    assert_eq!(d, k as f64 + 0.5);
                }
            }
            assert!(profile.iter().all(|d| d.is_finite()));
        }
    }
}
