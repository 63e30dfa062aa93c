/// Configuration for the process-wide encoder and decoder pools.
///
/// Pools are created lazily with [`PoolOptions::default`] on first use. Call
/// [`configure_pools`](crate::configure_pools) before acquiring anything to
/// install different limits.
///
/// # Examples
///
/// ```rust
/// use zjson::{PoolOptions, configure_pools};
///
/// let options = PoolOptions {
///     max_idle_encoders: 1024,
///     ..Default::default()
/// };
/// // Only the first configuration wins.
/// let _ = configure_pools(options);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolOptions {
    /// Maximum number of idle encoder buffers kept for reuse.
    ///
    /// Buffers released while the pool is full are dropped.
    ///
    /// # Default
    ///
    /// `256`
    pub max_idle_encoders: usize,

    /// Maximum number of idle decoder scratch buffers kept for reuse.
    ///
    /// # Default
    ///
    /// `256`
    pub max_idle_decoders: usize,

    /// Largest buffer capacity, in bytes, that is returned to a pool.
    ///
    /// Larger buffers are freed on release.
    ///
    /// # Default
    ///
    /// `1 MiB`
    pub max_retained_capacity: usize,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            max_idle_encoders: 256,
            max_idle_decoders: 256,
            max_retained_capacity: 1 << 20,
        }
    }
}
