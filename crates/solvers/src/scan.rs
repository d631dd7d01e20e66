//! Inclusive associative scans.
//!
//! Given items `x_0, x_1, …, x_{L-1}` and an associative `combine`, a scan
//! returns every prefix composition:
//!
//! ```text
//! out[t] = combine(…combine(combine(x_0, x_1), x_2)…, x_t)
//! ```
//!
//! [`ScanStrategy::Parallel`] uses a Brent–Kung tree: an up-sweep that builds
//! partial reductions over blocks of doubling size, then a down-sweep that
//! fills in the remaining prefixes. Both sweeps take `⌈log₂ L⌉` levels, and the
//! combinations within a level are independent, so each level runs on the
//! rayon thread pool. [`ScanStrategy::Serial`] is a left fold with identical
//! results under exact arithmetic.

use rayon::prelude::*;

/// How [`associative_scan`] schedules its combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ScanStrategy {
    /// Tree-shaped scan with logarithmic depth, parallel within each level.
    #[default]
    Parallel,

    /// Left-to-right fold.
    Serial,
}

/// Computes every prefix composition of `items` under `combine`.
///
/// `combine(earlier, later)` must be associative. The output has the same
/// length as the input, and `out[0]` is `items[0]` unchanged.
pub fn associative_scan<T, F>(items: Vec<T>, combine: F, strategy: ScanStrategy) -> Vec<T>
where
    T: Send + Sync,
    F: Fn(&T, &T) -> T + Sync,
{
    tracing::trace!(len = items.len(), ?strategy, "associative scan");

    match strategy {
        ScanStrategy::Parallel => parallel_scan(items, &combine),
        ScanStrategy::Serial => serial_scan(items, &combine),
    }
}

/// Left-fold scan.
pub fn serial_scan<T, F>(items: Vec<T>, combine: F) -> Vec<T>
where
    F: Fn(&T, &T) -> T,
{
    let mut prefixes: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        let next = match prefixes.last() {
            Some(prev) => combine(prev, &item),
            None => item,
        };
        prefixes.push(next);
    }
    prefixes
}

/// Brent–Kung scan, in place over `items`.
pub fn parallel_scan<T, F>(mut items: Vec<T>, combine: F) -> Vec<T>
where
    T: Send + Sync,
    F: Fn(&T, &T) -> T + Sync,
{
    let len = items.len();

    // Up-sweep: after the level with stride `s`, every index `i` with
    // `(i + 1) % 2s == 0` holds the reduction of the `2s` items ending at `i`.
    let mut stride = 1;
    while stride < len {
        combine_level(&mut items, stride, &combine);
        stride *= 2;
    }

    // Down-sweep: an index `i` with `(i + 1) % s == 0` but not `% 2s` holds a
    // block of `s` items; prepend the complete prefix ending at `i - s`.
    while stride > 1 {
        stride /= 2;
        if stride < len {
            combine_level(&mut items[stride..], stride, &combine);
        }
    }

    items
}

/// Within each block of `2 * stride` items, replaces the last item with the
/// combination of the block's middle item and its last item.
///
/// Blocks are disjoint, so they are processed in parallel.
fn combine_level<T, F>(items: &mut [T], stride: usize, combine: &F)
where
    T: Send + Sync,
    F: Fn(&T, &T) -> T + Sync,
{
    items.par_chunks_mut(2 * stride).for_each(|block| {
        if block.len() == 2 * stride {
            let (left, right) = block.split_at_mut(stride);
            right[stride - 1] = combine(&left[stride - 1], &right[stride - 1]);
        }
    });
}
