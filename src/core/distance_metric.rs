/// Trait for whole-series distance metrics used to build distance matrices.
///
/// The distance matrix engine is generic over `M: DistanceMetric`, so each
/// metric's inner loop is monomorphized and inlined into the per-pair kernel.
/// Metrics are small value types: parameter-free metrics are unit structs,
/// parameterized ones (e.g. Hamming with a tolerance) carry their parameters.
///
/// Implementations must return a nonnegative, finite value for finite inputs
/// and zero for identical inputs.
pub trait DistanceMetric: Clone + Send + Sync {
    /// Short name used in log records.
    fn name(&self) -> &'static str;

    /// Distance between two equal-length series.
    fn distance(&self, a: &[f64], b: &[f64]) -> f64;
}
