use crate::core::distance_metric::DistanceMetric;

/// Unconstrained Dynamic Time Warping distance.
///
/// Cost matrix over pointwise absolute differences:
/// `C[a][b] = |x[a] - y[b]| + min(C[a-1][b], C[a][b-1], C[a-1][b-1])`,
/// with `C[0][0] = |x[0] - y[0]|` and the first row/column accumulated from
/// their single predecessor. The distance is `C[n-1][m-1]`.
///
/// No warping window (Sakoe-Chiba band) is applied.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dtw;

impl DistanceMetric for Dtw {
    fn name(&self) -> &'static str {
        "dtw"
    }

    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        dtw_distance(a, b)
    }
}

/// DTW distance between two series, which may differ in length.
///
/// Runs in O(n·m) time with two rolling rows of O(m) memory. Returns 0 when
/// either series is empty.
pub fn dtw_distance(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len();
    let m = y.len();
    if n == 0 || m == 0 {
        return 0.0;
    }

    let mut prev = vec![0.0; m];
    let mut curr = vec![0.0; m];

    // First row: only horizontal moves.
    prev[0] = (x[0] - y[0]).abs();
    for b in 1..m {
        prev[b] = prev[b - 1] + (x[0] - y[b]).abs();
    }

    for a in 1..n {
        let xa = x[a];
        // First column: only vertical moves.
        curr[0] = prev[0] + (xa - y[0]).abs();
        for b in 1..m {
            let best = prev[b].min(curr[b - 1]).min(prev[b - 1]);
            curr[b] = (xa - y[b]).abs() + best;
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[m - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Full-matrix reference used to cross-check the rolling-row version.
    fn dtw_full(x: &[f64], y: &[f64]) -> f64 {
        let n = x.len();
        let m = y.len();
        let mut c = vec![vec![0.0_f64; m]; n];
        for a in 0..n {
            for b in 0..m {
                let cost = (x[a] - y[b]).abs();
                c[a][b] = cost
                    + match (a, b) {
                        (0, 0) => 0.0,
                        (0, _) => c[0][b - 1],
                        (_, 0) => c[a - 1][0],
                        _ => c[a - 1][b].min(c[a][b - 1]).min(c[a - 1][b - 1]),
                    };
            }
        }
        c[n - 1][m - 1]
    }

    #[test]
    fn test_dtw_self_is_zero() {
        let x = [1.0, 3.0, 2.0, 5.0, 4.0];
        assert_eq!(dtw_distance(&x, &x), 0.0);
    }

    #[test]
    fn test_dtw_constant_offsets() {
        // Constant series differing by k at every point: the diagonal path costs k*L.
        let a = [1.0; 5];
        let b = [3.0; 5];
        assert_eq!(dtw_distance(&a, &b), 10.0);
    }

    #[test]
    fn test_dtw_absorbs_time_shift() {
        // y is x delayed by one step; warping aligns all but the edges.
        let x = [0.0, 1.0, 2.0, 3.0, 2.0, 1.0, 0.0, 0.0];
        let y = [0.0, 0.0, 1.0, 2.0, 3.0, 2.0, 1.0, 0.0];
        let d = dtw_distance(&x, &y);
        assert_eq!(d, 0.0);
        let euclid: f64 = x.iter().zip(&y).map(|(a, b)| (a - b).abs()).sum();
        assert!(d < euclid);
    }

    #[test]
    fn test_dtw_matches_full_matrix() {
        let x: Vec<f64> = (0..17).map(|i| (i as f64 * 0.7).sin()).collect();
        let y: Vec<f64> = (0..17).map(|i| (i as f64 * 0.45).cos() * 1.3).collect();
        assert!((dtw_distance(&x, &y) - dtw_full(&x, &y)).abs() < 1e-12);
        // Different lengths follow the same recurrence.
        assert!((dtw_distance(&x[..9], &y) - dtw_full(&x[..9], &y)).abs() < 1e-12);
    }

    #[test]
    fn test_dtw_symmetric() {
        let x = [0.5, 2.0, -1.0, 4.0];
        let y = [1.0, 1.0, 3.0, 0.0];
        assert!((dtw_distance(&x, &y) - dtw_distance(&y, &x)).abs() < 1e-12);
    }
}
