//! Buffer capacity size classes.
//!
//! Pooled buffers are grown in three size classes so that buffers returned to
//! the pools tend to share a handful of capacities:
//!
//! - below 1 KiB: multiples of 128 bytes,
//! - below 4 KiB: multiples of 1 KiB,
//! - otherwise: multiples of 4 KiB.

const SMALL: usize = 128;
const MEDIUM: usize = 1024;
const LARGE: usize = 4096;

/// Initial capacity of a decoder's unescape scratch buffer.
pub const DEFAULT_SCRATCH_CAPACITY: usize = 256;

/// Rounds `capacity` up to the next multiple of its size class.
///
/// The result is always strictly greater than `capacity`, so an exact
/// multiple moves up one step (`1024` becomes `2048`).
///
/// ```rust
/// assert_eq!(zjson::fix_buffer_size(100), 128);
/// assert_eq!(zjson::fix_buffer_size(1000), 1024);
/// assert_eq!(zjson::fix_buffer_size(1024), 2048);
/// assert_eq!(zjson::fix_buffer_size(4096), 8192);
/// ```
#[must_use]
pub const fn fix_buffer_size(capacity: usize) -> usize {
    let m = if capacity < MEDIUM {
        SMALL
    } else if capacity < LARGE {
        MEDIUM
    } else {
        LARGE
    };
    (capacity / m + 1) * m
}
