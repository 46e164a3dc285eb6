use crate::core::backend::ComputeBackend;
use crate::core::batch::SeriesBatch;
use crate::core::error::{check_non_negative, check_window, Result, TsaError};

/// Standard-deviation floor below which a window is treated as constant.
pub const DEFAULT_EPSILON: f64 = 1e-8;

/// Finite sentinel for a distance that is undefined because one of the two
/// windows is (near-)constant, or because the candidate was excluded.
/// Never selected as a minimum while a valid distance exists.
pub const INVALID_DISTANCE: f64 = f64::MAX;

/// Profile-index value for an offset with no admissible, non-degenerate neighbor.
pub const NO_NEIGHBOR: usize = usize::MAX;

/// Whether `d` is a real distance rather than the sentinel.
#[inline]
pub fn is_valid_distance(d: f64) -> bool {
    d < INVALID_DISTANCE
}

/// Configuration for matrix profile computation.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixProfileConfig {
    /// Subsequence length.
    pub m: usize,
    /// Whether to apply an exclusion zone around trivial matches in a self-join.
    pub ignore_trivial: bool,
    /// Exclusion zone denominator: zone = ceil(m / exclusion_zone_denom).
    /// The default of 4 excludes a band of width m/2 centered on each offset.
    pub exclusion_zone_denom: usize,
    /// Windows whose standard deviation is below this value are degenerate.
    pub epsilon: f64,
}

impl MatrixProfileConfig {
    pub fn new(m: usize) -> Self {
        Self {
            m,
            ignore_trivial: true,
            exclusion_zone_denom: 4,
            epsilon: DEFAULT_EPSILON,
        }
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_exclusion_zone_denom(mut self, denom: usize) -> Self {
        self.exclusion_zone_denom = denom;
        self
    }

    pub fn with_ignore_trivial(mut self, ignore_trivial: bool) -> Self {
        self.ignore_trivial = ignore_trivial;
        self
    }

    /// Compute the exclusion zone radius.
    pub fn exclusion_zone(&self) -> usize {
        if self.ignore_trivial {
            self.m.div_ceil(self.exclusion_zone_denom.max(1))
        } else {
            0
        }
    }

    /// Check the configuration against a series of length `len`.
    pub fn validate(&self, len: usize) -> Result<()> {
        check_window(self.m, len)?;
        check_non_negative("epsilon", self.epsilon)?;
        if self.exclusion_zone_denom == 0 {
            return Err(TsaError::InvalidParameter {
                name: "exclusion_zone_denom",
                reason: "must be >= 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Moving mean and standard deviation of every length-`m` window of a series.
///
/// This is the auxiliary statistics array of MASS: computed once per
/// reference series and reused across every query against it.
#[derive(Debug, Clone, PartialEq)]
pub struct RollingStats {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
    /// Window length the statistics were computed for.
    pub m: usize,
}

impl RollingStats {
    /// Compute rolling statistics for windows of length `m` in O(n).
    ///
    /// The window sum and sum of squares are maintained by a running update
    /// (add the incoming sample, drop the outgoing one). Samples are shifted by
    /// the first window's mean before accumulating, which keeps the
    /// `E[X^2] - E[X]^2` cancellation small for series with a large offset; the
    /// variance is clamped to 0 before the square root.
    pub fn compute(ts: &[f64], m: usize) -> Result<Self> {
        check_window(m, ts.len())?;
        Ok(Self::compute_unchecked(ts, m))
    }

    /// Rolling statistics for every series of a batch, one entry per column.
    pub fn compute_batch<B: ComputeBackend>(batch: &SeriesBatch, m: usize) -> Result<Vec<Self>> {
        check_window(m, batch.series_len())?;
        let series = batch.to_contiguous_series();
        Ok(B::map_indexed(series.len(), |s| {
            Self::compute_unchecked(&series[s], m)
        }))
    }

    pub(crate) fn compute_unchecked(ts: &[f64], m: usize) -> Self {
        let n_subs = ts.len() - m + 1;
        let m_f = m as f64;
        let shift = ts[..m].iter().sum::<f64>() / m_f;

        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        for &x in &ts[..m] {
            let v = x - shift;
            sum += v;
            sum_sq += v * v;
        }

        let mut mean = Vec::with_capacity(n_subs);
        let mut std = Vec::with_capacity(n_subs);
        for i in 0..n_subs {
            if i > 0 {
                let out = ts[i - 1] - shift;
                let inc = ts[i + m - 1] - shift;
                sum += inc - out;
                sum_sq += inc * inc - out * out;
            }
            let mu = sum / m_f;
            let var = (sum_sq / m_f - mu * mu).max(0.0);
            mean.push(mu + shift);
            std.push(var.sqrt());
        }

        Self { mean, std, m }
    }

    /// Check that `mean` and `std` cover the same windows of a usable length.
    ///
    /// The fields are public so callers can supply precomputed statistics;
    /// every entry point that accepts them validates them here first.
    pub(crate) fn check_consistent(&self) -> Result<()> {
        if self.m < 2 {
            return Err(TsaError::shape(format!(
                "statistics window m = {} is below 2",
                self.m
            )));
        }
        if self.std.len() != self.mean.len() {
            return Err(TsaError::shape(format!(
                "statistics hold {} means but {} standard deviations",
                self.mean.len(),
                self.std.len()
            )));
        }
        Ok(())
    }

    /// Number of windows.
    pub fn len(&self) -> usize {
        self.mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }

    /// Whether window `i` is (near-)constant under the given floor.
    #[inline]
    pub fn is_degenerate(&self, i: usize, epsilon: f64) -> bool {
        self.std[i] < epsilon
    }
}

/// Distances from one query window to every window of a reference series.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceProfile {
    /// z-normalized Euclidean distance per reference offset, or
    /// [`INVALID_DISTANCE`] for degenerate pairs.
    pub distances: Vec<f64>,
    /// Offset of the smallest valid distance, or [`NO_NEIGHBOR`].
    pub index: usize,
}

impl DistanceProfile {
    /// Wrap a distance array, locating its minimum valid entry.
    ///
    /// Ties resolve to the smallest offset.
    pub fn from_distances(distances: Vec<f64>) -> Self {
        let (_, index) = min_valid(&distances);
        Self { distances, index }
    }

    /// The minimum distance, or [`INVALID_DISTANCE`] when every entry is invalid.
    pub fn min_distance(&self) -> f64 {
        if self.index == NO_NEIGHBOR {
            INVALID_DISTANCE
        } else {
            self.distances[self.index]
        }
    }
}

/// Smallest valid value and its position; `(INVALID_DISTANCE, NO_NEIGHBOR)` if none.
pub(crate) fn min_valid(values: &[f64]) -> (f64, usize) {
    let mut best = INVALID_DISTANCE;
    let mut best_idx = NO_NEIGHBOR;
    for (i, &d) in values.iter().enumerate() {
        if d < best {
            best = d;
            best_idx = i;
        }
    }
    (best, best_idx)
}

/// The matrix profile result.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixProfile {
    /// Nearest-neighbor distance for each query subsequence.
    pub profile: Vec<f64>,
    /// Reference offset of the nearest neighbor for each query subsequence.
    pub profile_index: Vec<usize>,
    /// Subsequence length used.
    pub m: usize,
    /// Exclusion zone radius used, `None` for a join between distinct series.
    pub exclusion_zone: Option<usize>,
}

impl MatrixProfile {
    /// Create a new matrix profile with every entry invalid.
    pub fn new(n_subs: usize, m: usize, exclusion_zone: Option<usize>) -> Self {
        Self {
            profile: vec![INVALID_DISTANCE; n_subs],
            profile_index: vec![NO_NEIGHBOR; n_subs],
            m,
            exclusion_zone,
        }
    }

    pub fn len(&self) -> usize {
        self.profile.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profile.is_empty()
    }

    /// Record the nearest neighbor of offset `idx`.
    #[inline]
    pub fn set(&mut self, idx: usize, distance: f64, neighbor_idx: usize) {
        self.profile[idx] = distance;
        self.profile_index[idx] = neighbor_idx;
    }

    /// Offset of the best-conserved subsequence (smallest valid profile value).
    pub fn motif(&self) -> Option<usize> {
        let (_, idx) = min_valid(&self.profile);
        (idx != NO_NEIGHBOR).then_some(idx)
    }

    /// Offset of the most anomalous subsequence (largest valid profile value).
    pub fn discord(&self) -> Option<usize> {
        self.profile
            .iter()
            .enumerate()
            .filter(|(_, d)| is_valid_distance(**d))
            .fold(None, |best: Option<(usize, f64)>, (i, &d)| match best {
                Some((_, bd)) if bd >= d => best,
                _ => Some((i, d)),
            })
            .map(|(i, _)| i)
    }
}
