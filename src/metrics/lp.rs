use crate::core::distance_metric::DistanceMetric;

/// Sum of squared pointwise differences.
#[inline]
fn sum_sq_diff(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Euclidean distance: `sqrt(sum_t (a[t] - b[t])^2)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Euclidean;

impl DistanceMetric for Euclidean {
    fn name(&self) -> &'static str {
        "euclidean"
    }

    #[inline]
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        sum_sq_diff(a, b).sqrt()
    }
}

/// Squared Euclidean distance: `sum_t (a[t] - b[t])^2`.
///
/// Preserves the ordering of [`Euclidean`] without the square root.
#[derive(Debug, Clone, Copy, Default)]
pub struct SquaredEuclidean;

impl DistanceMetric for SquaredEuclidean {
    fn name(&self) -> &'static str {
        "squared_euclidean"
    }

    #[inline]
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        sum_sq_diff(a, b)
    }
}

/// Manhattan (L1) distance: `sum_t |a[t] - b[t]|`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Manhattan;

impl DistanceMetric for Manhattan {
    fn name(&self) -> &'static str {
        "manhattan"
    }

    #[inline]
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_euclidean_simple() {
        // [0,0,0] vs [0,1,0] → 1; [0,1,0] vs [1,0,0] → sqrt(2)
        assert!((Euclidean.distance(&[0.0, 0.0, 0.0], &[0.0, 1.0, 0.0]) - 1.0).abs() < 1e-12);
        assert!(
            (Euclidean.distance(&[0.0, 1.0, 0.0], &[1.0, 0.0, 0.0]) - 2.0_f64.sqrt()).abs() < 1e-12
        );
    }

    #[test]
    fn test_squared_is_square_of_euclidean() {
        let a = [1.5, -2.0, 3.25, 0.0];
        let b = [0.5, 1.0, -1.0, 2.0];
        let e = Euclidean.distance(&a, &b);
        let s = SquaredEuclidean.distance(&a, &b);
        assert!((e * e - s).abs() < 1e-10);
        // 1 + 9 + 18.0625 + 4
        assert!((s - 32.0625).abs() < 1e-12);
    }

    #[test]
    fn test_manhattan() {
        assert_eq!(Manhattan.distance(&[0.0, 3.0], &[0.0, 4.0]), 1.0);
        assert_eq!(Manhattan.distance(&[1.0, -1.0, 2.0], &[-1.0, 1.0, 2.0]), 4.0);
    }

    #[test]
    fn test_identical_is_zero() {
        let a = [0.3, 0.7, -1.1];
        assert_eq!(Euclidean.distance(&a, &a), 0.0);
        assert_eq!(SquaredEuclidean.distance(&a, &a), 0.0);
        assert_eq!(Manhattan.distance(&a, &a), 0.0);
    }
}
