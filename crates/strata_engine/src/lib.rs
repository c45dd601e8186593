//! Strata Engine - Equalizer Orchestration
//!
//! Ties the DSP core to the outside world: a lock-free parameter store
//! written from the control context, a per-block engine that snapshots
//! it and drives the stereo filter chains or the multiband crossover,
//! and analyzer outlets for visualization threads.
//!
//! The commonly-used DSP types are re-exported so consumers only need
//! this crate.

mod engine;
mod error;
pub mod params;

pub use engine::{EqualizerEngine, RoutingMode, StereoChannel};
pub use error::{EngineError, EngineResult};
pub use params::{ParamError, ParameterStore};

pub use strata_dsp::{
    AnalyzerOutlet, ChainSettings, Slope, BAND_COUNT, BAND_SHAPES, CROSSOVER_EDGES,
};
