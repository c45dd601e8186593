//! Lock-Free SPSC Ring Fifo
//!
//! Fixed-capacity single-producer/single-consumer circular buffer of
//! pre-constructed slots. The audio thread pushes completed sample
//! batches, the analysis thread pulls them; neither side ever blocks,
//! locks, or allocates.
//!
//! Synchronization is index-only: two free-running atomic counters
//! (head = next slot to read, tail = next slot to write) compared by
//! distance, reduced modulo capacity only for slot addressing. The
//! producer never advances past head + capacity (drop-newest on full),
//! the consumer never past tail (no phantom reads). Acquire/Release
//! pairing on the counter the other side publishes makes the slot
//! contents visible as a whole unit.

use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crossbeam_utils::CachePadded;

use crate::error::DspError;

/// Slot count used by the analyzer path
pub const DEFAULT_FIFO_CAPACITY: usize = 30;

struct FifoShared<T> {
    slots: Box<[UnsafeCell<T>]>,
    /// Next slot index to read (owned by the consumer)
    head: CachePadded<AtomicUsize>,
    /// Next slot index to write (owned by the producer)
    tail: CachePadded<AtomicUsize>,
}

// Slots are only ever touched by the side that owns them at that
// moment: the producer writes slots in [head+capacity) it has claimed,
// the consumer reads slots below tail it has observed via Acquire.
unsafe impl<T: Send> Send for FifoShared<T> {}
unsafe impl<T: Send> Sync for FifoShared<T> {}

impl<T> FifoShared<T> {
    #[inline]
    fn capacity(&self) -> usize {
        self.slots.len()
    }
}

/// Writing half, owned by exactly one thread
pub struct FifoProducer<T> {
    shared: Arc<FifoShared<T>>,
}

/// Reading half, owned by exactly one thread
pub struct FifoConsumer<T> {
    shared: Arc<FifoShared<T>>,
}

/// Build a ring fifo, constructing every slot up front with `init`
///
/// This is the only allocation point; all subsequent traffic reuses the
/// pre-built slots in place.
pub fn ring_fifo<T, F>(
    capacity: usize,
    mut init: F,
) -> Result<(FifoProducer<T>, FifoConsumer<T>), DspError>
where
    F: FnMut() -> T,
{
    if capacity == 0 {
        return Err(DspError::InvalidFifoCapacity(capacity));
    }

    let slots: Box<[UnsafeCell<T>]> = (0..capacity)
        .map(|_| UnsafeCell::new(init()))
        .collect::<Vec<_>>()
        .into_boxed_slice();

    let shared = Arc::new(FifoShared {
        slots,
        head: CachePadded::new(AtomicUsize::new(0)),
        tail: CachePadded::new(AtomicUsize::new(0)),
    });

    Ok((
        FifoProducer {
            shared: Arc::clone(&shared),
        },
        FifoConsumer { shared },
    ))
}

impl<T> FifoProducer<T> {
    /// Write the next slot in place, or drop the push if the ring is
    /// full
    ///
    /// Returns false (and does not call `fill`) when no slot is free.
    /// Overflow is silent by design: audio correctness never depends on
    /// the analysis side keeping up.
    ///
    /// # Real-time Safety
    /// No allocations, no locks, O(1) plus whatever `fill` does.
    #[inline]
    pub fn push_with<F>(&mut self, fill: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        let shared = &*self.shared;
        let tail = shared.tail.load(Ordering::Relaxed);
        let head = shared.head.load(Ordering::Acquire);

        if tail.wrapping_sub(head) >= shared.capacity() {
            return false;
        }

        let index = tail % shared.capacity();
        // Safety: the slot at `tail` is outside [head, tail), so the
        // consumer cannot be reading it; only this producer writes.
        unsafe {
            fill(&mut *shared.slots[index].get());
        }
        shared.tail.store(tail.wrapping_add(1), Ordering::Release);
        true
    }

    /// Slots currently free for writing
    pub fn slots_free(&self) -> usize {
        let shared = &*self.shared;
        let tail = shared.tail.load(Ordering::Relaxed);
        let head = shared.head.load(Ordering::Acquire);
        shared.capacity() - tail.wrapping_sub(head)
    }

    pub fn capacity(&self) -> usize {
        self.shared.capacity()
    }
}

impl<T> FifoConsumer<T> {
    /// Read the oldest unread slot, or report no data
    ///
    /// Returns false (and does not call `read`) when the ring is empty.
    ///
    /// # Real-time Safety
    /// No allocations, no locks, O(1) plus whatever `read` does.
    #[inline]
    pub fn pop_with<F>(&mut self, read: F) -> bool
    where
        F: FnOnce(&T),
    {
        let shared = &*self.shared;
        let head = shared.head.load(Ordering::Relaxed);
        let tail = shared.tail.load(Ordering::Acquire);

        if tail == head {
            return false;
        }

        let index = head % shared.capacity();
        // Safety: head < tail, so the producer has published this slot
        // and will not touch it until head advances past it.
        unsafe {
            read(&*shared.slots[index].get());
        }
        shared.head.store(head.wrapping_add(1), Ordering::Release);
        true
    }

    /// Completed slots waiting to be read
    pub fn slots_ready(&self) -> usize {
        let shared = &*self.shared;
        let head = shared.head.load(Ordering::Relaxed);
        let tail = shared.tail.load(Ordering::Acquire);
        tail.wrapping_sub(head)
    }

    pub fn capacity(&self) -> usize {
        self.shared.capacity()
    }
}
