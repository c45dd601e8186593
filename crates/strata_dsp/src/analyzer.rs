//! Analyzer Tap
//!
//! Per-channel sample collector feeding the visualization thread.
//! The tap accumulates individual output samples into fixed-length
//! batches and ships completed batches through a lock-free ring fifo;
//! the outlet pulls them at its own pace on the analysis side.

use crate::error::DspError;
use crate::fifo::{ring_fifo, FifoConsumer, FifoProducer, DEFAULT_FIFO_CAPACITY};

/// Audio-thread side: collects samples into batches
pub struct AnalyzerTap {
    scratch: Vec<f32>,
    fill: usize,
    producer: FifoProducer<Vec<f32>>,
}

/// Analysis-thread side: pulls completed batches, non-blocking
pub struct AnalyzerOutlet {
    consumer: FifoConsumer<Vec<f32>>,
}

impl AnalyzerTap {
    /// Build a tap/outlet pair for batches of `batch_len` samples
    ///
    /// Allocates the scratch buffer and all fifo slots up front; this
    /// is the prepare-time counterpart to the allocation-free
    /// `push_samples`.
    pub fn new(batch_len: usize) -> Result<(Self, AnalyzerOutlet), DspError> {
        if batch_len == 0 {
            return Err(DspError::InvalidBatchLength(batch_len));
        }
        let (producer, consumer) = ring_fifo(DEFAULT_FIFO_CAPACITY, || vec![0.0; batch_len])?;
        Ok((
            Self {
                scratch: vec![0.0; batch_len],
                fill: 0,
                producer,
            },
            AnalyzerOutlet { consumer },
        ))
    }

    pub fn batch_len(&self) -> usize {
        self.scratch.len()
    }

    /// Accumulate output samples; hand off each completed batch
    ///
    /// If the fifo is full the completed batch is silently dropped:
    /// analyzer completeness never gates audio correctness.
    ///
    /// # Real-time Safety
    /// No allocations, no locks, O(n) where n = samples.len().
    #[inline]
    pub fn push_samples(&mut self, samples: &[f32]) {
        for &sample in samples {
            self.scratch[self.fill] = sample;
            self.fill += 1;
            if self.fill == self.scratch.len() {
                let scratch = &self.scratch;
                let _ = self.producer.push_with(|slot| slot.copy_from_slice(scratch));
                self.fill = 0;
            }
        }
    }

    /// Discard the partial batch in progress
    pub fn reset(&mut self) {
        self.fill = 0;
    }
}

impl AnalyzerOutlet {
    /// Copy the oldest completed batch into `out`, resizing it to the
    /// batch length; returns false when no batch is ready
    ///
    /// Safe to call from a different thread than the audio path; never
    /// blocks.
    pub fn pull_batch(&mut self, out: &mut Vec<f32>) -> bool {
        self.consumer.pop_with(|batch| out.clone_from(batch))
    }

    /// Completed batches currently waiting
    pub fn batches_ready(&self) -> usize {
        self.consumer.slots_ready()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_batch_len_rejected() {
        assert!(AnalyzerTap::new(0).is_err());
    }

    #[test]
    fn test_exact_batch_delivery() {
        let (mut tap, mut outlet) = AnalyzerTap::new(4).unwrap();
        tap.push_samples(&[0.1, 0.2, 0.3, 0.4]);

        assert_eq!(outlet.batches_ready(), 1);
        let mut batch = Vec::new();
        assert!(outlet.pull_batch(&mut batch));
        assert_eq!(batch, vec![0.1, 0.2, 0.3, 0.4]);
        assert!(!outlet.pull_batch(&mut batch));
    }

    #[test]
    fn test_partial_fill_yields_nothing() {
        let (mut tap, mut outlet) = AnalyzerTap::new(8).unwrap();
        tap.push_samples(&[0.5; 7]);
        assert_eq!(outlet.batches_ready(), 0);
    }

    #[test]
    fn test_batches_span_block_boundaries() {
        let (mut tap, mut outlet) = AnalyzerTap::new(4).unwrap();
        // 3 + 6 + 3 samples = exactly 3 batches
        tap.push_samples(&[1.0, 2.0, 3.0]);
        tap.push_samples(&[4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        tap.push_samples(&[10.0, 11.0, 12.0]);

        assert_eq!(outlet.batches_ready(), 3);
        let mut batch = Vec::new();
        assert!(outlet.pull_batch(&mut batch));
        assert_eq!(batch, vec![1.0, 2.0, 3.0, 4.0]);
        assert!(outlet.pull_batch(&mut batch));
        assert_eq!(batch, vec![5.0, 6.0, 7.0, 8.0]);
        assert!(outlet.pull_batch(&mut batch));
        assert_eq!(batch, vec![9.0, 10.0, 11.0, 12.0]);
    }

    #[test]
    fn test_overflow_drops_newest_quietly() {
        let (mut tap, mut outlet) = AnalyzerTap::new(2).unwrap();
        let capacity = DEFAULT_FIFO_CAPACITY;

        // Push 5 more batches than the fifo can hold
        for i in 0..(capacity + 5) {
            let value = i as f32;
            tap.push_samples(&[value, value]);
        }
        assert_eq!(outlet.batches_ready(), capacity);

        // Delivered batches are the oldest ones, unharmed and in order
        let mut batch = Vec::new();
        for i in 0..capacity {
            assert!(outlet.pull_batch(&mut batch));
            assert_eq!(batch, vec![i as f32, i as f32]);
        }
        assert!(!outlet.pull_batch(&mut batch));
    }

    #[test]
    fn test_reset_discards_partial_batch() {
        let (mut tap, mut outlet) = AnalyzerTap::new(4).unwrap();
        tap.push_samples(&[9.0, 9.0, 9.0]);
        tap.reset();
        tap.push_samples(&[1.0, 2.0, 3.0, 4.0]);

        let mut batch = Vec::new();
        assert!(outlet.pull_batch(&mut batch));
        assert_eq!(batch, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_pull_from_another_thread() {
        let (mut tap, mut outlet) = AnalyzerTap::new(64).unwrap();

        let reader = std::thread::spawn(move || {
            let mut batch = Vec::new();
            let mut pulled = 0;
            while pulled < 10 {
                if outlet.pull_batch(&mut batch) {
                    assert_eq!(batch.len(), 64);
                    pulled += 1;
                }
            }
        });

        let block = [0.25_f32; 64];
        for _ in 0..10 {
            tap.push_samples(&block);
        }
        reader.join().unwrap();
    }
}
