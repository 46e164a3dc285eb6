/// Data-parallel dispatch for batched computations.
///
/// Every batched operation in the crate is expressed as "evaluate a pure
/// function over the indices `0..n`": series pairs for distance matrices,
/// query offsets for STAMP, query columns for batched MASS. Backends decide
/// how those evaluations are scheduled; they never change what is computed,
/// so results are bit-identical across backends.
///
/// Like `DistanceMetric`, the trait is used through static dispatch: engines
/// are generic over `B: ComputeBackend` and the closure is monomorphized into
/// the backend's loop.
pub trait ComputeBackend: Clone + Send + Sync {
    /// Short name used in log records.
    fn name() -> &'static str;

    /// Evaluate `f(i)` for `i in 0..n`, returning the results in index order.
    fn map_indexed<T, F>(n: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Send + Sync;
}

/// Single-threaded backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequential;

impl ComputeBackend for Sequential {
    fn name() -> &'static str {
        "sequential"
    }

    fn map_indexed<T, F>(n: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Send + Sync,
    {
        (0..n).map(f).collect()
    }
}

/// Rayon work-stealing backend.
#[cfg(feature = "parallel")]
#[derive(Debug, Clone, Copy, Default)]
pub struct Parallel;

/// Below this many items the rayon dispatch costs more than it saves.
#[cfg(feature = "parallel")]
const MIN_PARALLEL_ITEMS: usize = 64;

#[cfg(feature = "parallel")]
impl ComputeBackend for Parallel {
    fn name() -> &'static str {
        "rayon"
    }

    fn map_indexed<T, F>(n: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Send + Sync,
    {
        use rayon::prelude::*;

        if n < MIN_PARALLEL_ITEMS {
            return (0..n).map(f).collect();
        }
        (0..n).into_par_iter().map(f).collect()
    }
}

/// Backend used by the free-function entry points.
#[cfg(feature = "parallel")]
pub type DefaultBackend = Parallel;

/// Backend used by the free-function entry points.
#[cfg(not(feature = "parallel"))]
pub type DefaultBackend = Sequential;
