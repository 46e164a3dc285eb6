use crate::core::distance_metric::DistanceMetric;
use crate::core::error::{check_non_negative, Result};

/// Hamming distance: number of positions where two series differ.
///
/// With the default tolerance of zero, positions are compared with exact
/// floating-point equality, which is only meaningful for discrete-valued
/// series (symbols, binary flags, quantized readings). A positive tolerance
/// counts a mismatch only when `|a[t] - b[t]| > tolerance`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hamming {
    tolerance: f64,
}

impl Hamming {
    /// # Errors
    /// [`TsaError::InvalidParameter`](crate::TsaError::InvalidParameter) for a
    /// negative or non-finite tolerance.
    pub fn with_tolerance(tolerance: f64) -> Result<Self> {
        check_non_negative("tolerance", tolerance)?;
        Ok(Self { tolerance })
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

impl DistanceMetric for Hamming {
    fn name(&self) -> &'static str {
        "hamming"
    }

    #[inline]
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        let mismatches = if self.tolerance == 0.0 {
            a.iter().zip(b).filter(|(x, y)| x != y).count()
        } else {
            a.iter()
                .zip(b)
                .filter(|(x, y)| (*x - *y).abs() > self.tolerance)
                .count()
        };
        mismatches as f64
    }
}
