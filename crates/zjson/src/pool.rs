//! Process-wide pools for encoder and decoder allocations.
//!
//! A decoder borrows its input, so the pools hold the reusable allocations
//! rather than the codec values themselves: the encoder's output buffer and
//! the decoder's unescape scratch. Acquiring pops an idle allocation (or
//! starts from an empty one), releasing clears it and pushes it back.
//!
//! Retention is never guaranteed. A release into a full free-list, or of a
//! buffer above [`PoolOptions::max_retained_capacity`], simply frees the
//! allocation.
//!
//! # Thread Safety
//!
//! The free-lists are lock-free bounded queues
//! ([`crossbeam_queue::ArrayQueue`]) and may be used from any thread. The
//! [`Encoder`] and [`Decoder`] values handed out are not shared.

use std::sync::OnceLock;

use crossbeam_queue::ArrayQueue;
use tracing::{debug, trace};

use crate::{
    Decoder, Encoder, PoolOptions,
    decoder::Scratch,
    error::PoolError,
};

/// An allocation that can be parked in a [`FreeList`].
pub(crate) trait Reusable {
    fn capacity(&self) -> usize;

    fn clear(&mut self);
}

impl Reusable for Vec<u8> {
    fn capacity(&self) -> usize {
        Vec::capacity(self)
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }
}

/// Bounded free-list of idle allocations.
pub(crate) struct FreeList<T> {
    queue: Option<ArrayQueue<T>>,
    max_retained: usize,
}

impl<T: Reusable> FreeList<T> {
    pub(crate) fn new(max_idle: usize, max_retained: usize) -> Self {
        Self {
            // `ArrayQueue` rejects a zero capacity; no queue means no pooling.
            queue: (max_idle > 0).then(|| ArrayQueue::new(max_idle)),
            max_retained,
        }
    }

    pub(crate) fn take(&self) -> Option<T> {
        self.queue.as_ref()?.pop()
    }

    pub(crate) fn give(&self, mut item: T) {
        let capacity = item.capacity();
        if capacity == 0 {
            return;
        }
        if capacity > self.max_retained {
            trace!(capacity, "discarding oversized buffer");
            return;
        }
        let Some(queue) = &self.queue else {
            return;
        };
        item.clear();
        if queue.push(item).is_err() {
            trace!(capacity, "pool full, discarding buffer");
        }
    }

    #[cfg(test)]
    pub(crate) fn idle(&self) -> usize {
        self.queue.as_ref().map_or(0, ArrayQueue::len)
    }
}

struct Pools {
    encoders: FreeList<Vec<u8>>,
    decoders: FreeList<Scratch>,
}

impl Pools {
    fn new(options: PoolOptions) -> Self {
        Self {
            encoders: FreeList::new(options.max_idle_encoders, options.max_retained_capacity),
            decoders: FreeList::new(options.max_idle_decoders, options.max_retained_capacity),
        }
    }
}

static POOLS: OnceLock<Pools> = OnceLock::new();

fn pools() -> &'static Pools {
    POOLS.get_or_init(|| Pools::new(PoolOptions::default()))
}

/// Installs the process-wide pools with the given limits.
///
/// # Errors
///
/// Returns [`PoolError::AlreadyInitialized`] if the pools were configured
/// before, or already created by a first acquire or release.
pub fn configure_pools(options: PoolOptions) -> Result<(), PoolError> {
    POOLS
        .set(Pools::new(options))
        .map_err(|_| PoolError::AlreadyInitialized)?;
    debug!(
        max_idle_encoders = options.max_idle_encoders,
        max_idle_decoders = options.max_idle_decoders,
        max_retained_capacity = options.max_retained_capacity,
        "configured zjson pools"
    );
    Ok(())
}

/// Acquires an encoder whose buffer can hold at least `capacity` bytes.
///
/// Buffers are grown by [`fix_buffer_size`](crate::fix_buffer_size) size
/// classes.
///
/// Equivalent to [`Encoder::acquire`].
#[must_use]
pub fn acquire_encoder(capacity: usize) -> Encoder {
    Encoder::acquire(capacity)
}

/// Acquires a decoder over `data`.
///
/// Equivalent to [`Decoder::acquire`].
#[must_use]
pub fn acquire_decoder(data: &[u8]) -> Decoder<'_> {
    Decoder::acquire(data)
}

pub(crate) fn take_encoder_buffer() -> Vec<u8> {
    pools().encoders.take().unwrap_or_default()
}

pub(crate) fn give_encoder_buffer(buf: Vec<u8>) {
    pools().encoders.give(buf);
}

pub(crate) fn take_decoder_scratch() -> Scratch {
    pools().decoders.take().unwrap_or_default()
}

pub(crate) fn give_decoder_scratch(scratch: Scratch) {
    pools().decoders.give(scratch);
}
