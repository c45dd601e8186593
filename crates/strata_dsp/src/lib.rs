//! Strata DSP - Signal Processing Core
//!
//! This crate provides the signal path of the Strata equalizer:
//! - Cascaded low-cut / peak / high-cut filter chain with
//!   runtime-selectable Butterworth slopes (12-48 dB/oct)
//! - Eleven-band Linkwitz-Riley crossover network with per-band
//!   peaking stages and envelope followers
//! - Lock-free SPSC fifo and analyzer tap for shipping output samples
//!   to a visualization thread
//! - Coefficient hot-swap for click-free parameter changes
//!
//! # Architecture
//!
//! Everything on the processing path follows a strict "no allocation,
//! no locks, no blocking in the audio callback" rule. Coefficients are
//! recomputed and swapped once per block before any sample is touched;
//! allocation happens only at prepare time.

mod analyzer;
mod chain;
mod crossover;
mod cut_filter;
pub mod design;
mod envelope;
mod error;
mod fifo;
mod stage;

pub use analyzer::{AnalyzerOutlet, AnalyzerTap};
pub use chain::{ChainSettings, MonoFilterChain};
pub use crossover::{BandShape, CrossoverBand, BAND_COUNT, BAND_SHAPES, CROSSOVER_EDGES};
pub use cut_filter::{CascadedCutFilter, CutKind, Slope, MAX_SECTIONS};
pub use envelope::{EnvelopeFollower, DEFAULT_ATTACK_MS, DEFAULT_RELEASE_MS};
pub use error::DspError;
pub use fifo::{ring_fifo, FifoConsumer, FifoProducer, DEFAULT_FIFO_CAPACITY};
pub use stage::BiquadStage;
