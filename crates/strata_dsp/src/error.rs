//! DSP Error Types

use thiserror::Error;

/// Errors that can occur while building DSP structures
///
/// The processing paths themselves are infallible by contract: input is
/// pre-validated by the parameter layer before it reaches any design
/// function.
#[derive(Error, Debug)]
pub enum DspError {
    #[error("Fifo capacity must be non-zero, got {0}")]
    InvalidFifoCapacity(usize),

    #[error("Analyzer batch length must be non-zero, got {0}")]
    InvalidBatchLength(usize),
}
