use thiserror::Error;

/// Result alias used by every fallible entry point of the crate.
pub type Result<T> = std::result::Result<T, TsaError>;

/// Errors surfaced by the distance and matrix profile entry points.
///
/// All variants are raised before any computation starts, so a failed call
/// never produces partial results. Near-constant windows are not errors: they
/// are reported in-band as [`INVALID_DISTANCE`](crate::INVALID_DISTANCE).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TsaError {
    #[error("tsa: shape error: {reason}")]
    Shape { reason: String },
    #[error("tsa: invalid window: m = {m}, series length = {len} (expected 2 <= m <= length)")]
    InvalidWindow { m: usize, len: usize },
    #[error("tsa: invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl TsaError {
    pub(crate) fn shape(reason: impl Into<String>) -> Self {
        TsaError::Shape {
            reason: reason.into(),
        }
    }
}

/// Check that `m` is a usable window length for a series of length `len`.
pub(crate) fn check_window(m: usize, len: usize) -> Result<()> {
    if m < 2 || m > len {
        return Err(TsaError::InvalidWindow { m, len });
    }
    Ok(())
}

/// Check that a non-negative tolerance-like parameter is finite.
pub(crate) fn check_non_negative(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(TsaError::InvalidParameter {
            name,
            reason: format!("expected a finite value >= 0, got {value}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_window_bounds() {
        assert!(check_window(2, 2).is_ok());
        assert!(check_window(5, 10).is_ok());
        assert_eq!(
            check_window(1, 10),
            Err(TsaError::InvalidWindow { m: 1, len: 10 })
        );
        assert_eq!(
            check_window(11, 10),
            Err(TsaError::InvalidWindow { m: 11, len: 10 })
        );
    }

    #[test]
    fn test_check_non_negative() {
        assert!(check_non_negative("epsilon", 0.0).is_ok());
        assert!(check_non_negative("epsilon", -1e-3).is_err());
        assert!(check_non_negative("epsilon", f64::NAN).is_err());
        assert!(check_non_negative("epsilon", f64::INFINITY).is_err());
    }

    #[test]
    fn test_error_messages() {
        let e = TsaError::InvalidWindow { m: 1, len: 4 };
        assert_eq!(
            e.to_string(),
            "tsa: invalid window: m = 1, series length = 4 (expected 2 <= m <= length)"
        );
        let e = TsaError::shape("need at least 2 series, got 1");
        assert_eq!(e.to_string(), "tsa: shape error: need at least 2 series, got 1");
    }
}
