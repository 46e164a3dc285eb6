use log::{debug, trace};

use crate::algorithms::common::{apply_exclusion_zone, ReferenceDotProducts};
use crate::algorithms::mass::distance_profile_into;
use crate::core::backend::ComputeBackend;
use crate::core::error::{check_window, Result};
use crate::core::matrix_profile::{
    is_valid_distance, min_valid, MatrixProfile, MatrixProfileConfig, RollingStats,
};

/// Compute the matrix profile of `ta` against `tb` using STAMP.
///
/// For each offset `j` of the query series `ta`, runs MASS on the window
/// `ta[j..j+m]` against every window of the reference series `tb` and records
/// the minimum distance and its location. When `ta` and `tb` hold the same
/// values the call is a self-join and an exclusion zone of radius
/// `config.exclusion_zone()` around `j` is removed from the search at `j`.
///
/// The reference statistics and spectrum are computed once; offsets are
/// dispatched through the backend. O(La · Lb) overall.
///
/// # Errors
/// [`TsaError::InvalidWindow`](crate::TsaError::InvalidWindow) unless
/// `2 <= m <= min(ta.len(), tb.len())`; invalid `epsilon` or
/// `exclusion_zone_denom` in `config`.
pub fn stamp<B: ComputeBackend>(
    ta: &[f64],
    tb: &[f64],
    config: &MatrixProfileConfig,
) -> Result<MatrixProfile> {
    stamp_inner::<B>(ta, tb, config, ta == tb)
}

/// Self-join matrix profile of `ts` (trivial matches excluded per `config`).
pub fn stamp_self<B: ComputeBackend>(ts: &[f64], config: &MatrixProfileConfig) -> Result<MatrixProfile> {
    stamp_inner::<B>(ts, ts, config, true)
}

/// Matrix profile of `ta` against `tb` with no exclusion zone, even if the
/// two series are equal.
pub fn stamp_ab<B: ComputeBackend>(
    ta: &[f64],
    tb: &[f64],
    config: &MatrixProfileConfig,
) -> Result<MatrixProfile> {
    stamp_inner::<B>(ta, tb, config, false)
}

fn stamp_inner<B: ComputeBackend>(
    ta: &[f64],
    tb: &[f64],
    config: &MatrixProfileConfig,
    self_join: bool,
) -> Result<MatrixProfile> {
    config.validate(ta.len())?;
    check_window(config.m, tb.len())?;

    let m = config.m;
    let n_subs = ta.len() - m + 1;
    let zone = self_join.then(|| config.exclusion_zone());
    debug!(
        "stamp: la={}, lb={}, m={m}, self_join={self_join}, exclusion_zone={zone:?}, backend={}",
        ta.len(),
        tb.len(),
        B::name()
    );

    let stats_b = RollingStats::compute_unchecked(tb, m);
    let stats_a_owned;
    let stats_a = if self_join {
        &stats_b
    } else {
        stats_a_owned = RollingStats::compute_unchecked(ta, m);
        &stats_a_owned
    };
    let prepared = ReferenceDotProducts::new(tb, m);
    let epsilon = config.epsilon;

    let rows = B::map_indexed(n_subs, |j| {
        let qt = prepared.dot(&ta[j..j + m]);
        let mut dp = vec![0.0; qt.len()];
        distance_profile_into(&qt, stats_a.mean[j], stats_a.std[j], &stats_b, epsilon, &mut dp);
        if let Some(z) = zone {
            apply_exclusion_zone(&mut dp, j, z);
        }
        min_valid(&dp)
    });

    let mut mp = MatrixProfile::new(n_subs, m, zone);
    for (j, (d, idx)) in rows.into_iter().enumerate() {
        mp.set(j, d, idx);
    }

    let invalid = mp.profile.iter().filter(|d| !is_valid_distance(**d)).count();
    if invalid > 0 {
        trace!("stamp: {invalid} of {n_subs} offsets have no valid neighbor");
    }
    Ok(mp)
}
