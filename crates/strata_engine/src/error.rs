//! Engine Error Types

use thiserror::Error;

use crate::params::ParamError;

/// Errors that can occur in the equalizer engine
///
/// All of these surface on the control path (prepare/configure); the
/// audio path never returns errors and never panics in release builds.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Sample rate must be positive, got {0}")]
    InvalidSampleRate(f32),

    #[error("Max block size must be non-zero, got {0}")]
    InvalidBlockSize(usize),

    #[error("DSP error: {0}")]
    Dsp(#[from] strata_dsp::DspError),

    #[error("Parameter error: {0}")]
    Param(#[from] ParamError),
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
