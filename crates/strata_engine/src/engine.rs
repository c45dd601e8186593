//! Equalizer Engine
//!
//! Top-level per-block orchestrator. Owns the stereo filter chains,
//! the eleven-band crossover network, and the analyzer taps; converts
//! the shared parameter store into a `ChainSettings` snapshot once per
//! block, recomputes and hot-swaps every stage's coefficients, then
//! runs the audio through the selected routing.
//!
//! # Execution contexts
//!
//! - `prepare`/`reset`/`take_analyzer_outlet` run on the control
//!   context and may allocate.
//! - `process_block` runs on the audio-render context under a hard
//!   deadline: no allocation, no locks, no blocking. Coefficient
//!   recompute and sample processing happen on the same context within
//!   one call, so a stage can never observe a partially-installed
//!   coefficient set.
//! - Analyzer outlets are polled from the analysis context through the
//!   lock-free fifo; parameters are written from the control context
//!   through atomic cells.

use std::sync::Arc;

use tracing::{debug, info};

use strata_dsp::{
    design, AnalyzerOutlet, AnalyzerTap, ChainSettings, CrossoverBand, MonoFilterChain, BAND_COUNT,
    BAND_SHAPES,
};

use crate::error::{EngineError, EngineResult};
use crate::params::ParameterStore;

/// How a processed block flows through the filter graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoutingMode {
    /// Left/right each through their own low-cut -> peak -> high-cut
    /// chain; channel state never couples.
    #[default]
    Stereo,
    /// Sum the input to mono, isolate the eleven crossover bands from
    /// independent copies, sum the band outputs and write the result to
    /// both channels. Stereo width is intentionally discarded.
    MultibandMono,
}

/// Output channel selector for analyzer outlets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StereoChannel {
    Left,
    Right,
}

impl StereoChannel {
    #[inline]
    fn index(self) -> usize {
        match self {
            StereoChannel::Left => 0,
            StereoChannel::Right => 1,
        }
    }
}

/// The equalizer/crossover engine
pub struct EqualizerEngine {
    params: Arc<ParameterStore>,
    routing: RoutingMode,
    sample_rate: f32,
    max_block_size: usize,
    prepared: bool,

    left_chain: MonoFilterChain,
    right_chain: MonoFilterChain,
    bands: [CrossoverBand; BAND_COUNT],

    // Prepare-time scratch, reused by every block
    mono_scratch: Vec<f32>,
    band_scratch: Vec<f32>,
    band_mix: Vec<f32>,

    taps: [Option<AnalyzerTap>; 2],
    outlets: [Option<AnalyzerOutlet>; 2],
}

impl EqualizerEngine {
    /// Create an unprepared engine bound to a parameter store
    pub fn new(params: Arc<ParameterStore>) -> Self {
        Self {
            params,
            routing: RoutingMode::default(),
            sample_rate: 0.0,
            max_block_size: 0,
            prepared: false,
            left_chain: MonoFilterChain::new(),
            right_chain: MonoFilterChain::new(),
            bands: core::array::from_fn(|i| CrossoverBand::new(BAND_SHAPES[i])),
            mono_scratch: Vec::new(),
            band_scratch: Vec::new(),
            band_mix: Vec::new(),
            taps: [None, None],
            outlets: [None, None],
        }
    }

    /// Size all per-channel state for a sample rate and maximum block
    /// size
    ///
    /// Must be called before `process_block` and again whenever the
    /// host changes either value. Fully resets every delay line and
    /// envelope (a sample-rate change must never leave partial state)
    /// and rebuilds both analyzer taps; outlets taken before this call
    /// stop receiving batches and should be retaken via
    /// [`take_analyzer_outlet`](Self::take_analyzer_outlet).
    ///
    /// Not real-time safe: allocates scratch buffers and fifo slots.
    pub fn prepare(&mut self, sample_rate: f32, max_block_size: usize) -> EngineResult<()> {
        if !(sample_rate > 0.0) {
            return Err(EngineError::InvalidSampleRate(sample_rate));
        }
        if max_block_size == 0 {
            return Err(EngineError::InvalidBlockSize(max_block_size));
        }

        self.sample_rate = sample_rate;
        self.max_block_size = max_block_size;

        self.mono_scratch.clear();
        self.mono_scratch.resize(max_block_size, 0.0);
        self.band_scratch.clear();
        self.band_scratch.resize(max_block_size, 0.0);
        self.band_mix.clear();
        self.band_mix.resize(max_block_size, 0.0);

        self.left_chain.reset();
        self.right_chain.reset();
        for band in self.bands.iter_mut() {
            band.prepare(sample_rate);
        }

        for index in 0..2 {
            let (tap, outlet) = AnalyzerTap::new(max_block_size)?;
            self.taps[index] = Some(tap);
            self.outlets[index] = Some(outlet);
        }

        self.prepared = true;
        info!(sample_rate, max_block_size, "equalizer engine prepared");
        Ok(())
    }

    /// Zero all filter and envelope state without resizing anything
    ///
    /// For transport discontinuities; never called mid-block from the
    /// audio thread.
    pub fn reset(&mut self) {
        self.left_chain.reset();
        self.right_chain.reset();
        for band in self.bands.iter_mut() {
            band.reset();
        }
        for tap in self.taps.iter_mut().flatten() {
            tap.reset();
        }
        debug!("equalizer engine state reset");
    }

    /// Hand over the pull side of one channel's analyzer fifo
    ///
    /// Available once per channel after each `prepare`.
    pub fn take_analyzer_outlet(&mut self, channel: StereoChannel) -> Option<AnalyzerOutlet> {
        let outlet = self.outlets[channel.index()].take();
        if outlet.is_some() {
            debug!(?channel, "analyzer outlet taken");
        }
        outlet
    }

    pub fn set_routing_mode(&mut self, routing: RoutingMode) {
        self.routing = routing;
    }

    pub fn routing_mode(&self) -> RoutingMode {
        self.routing
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Current RMS level estimate of each crossover band
    ///
    /// Levels only advance while `MultibandMono` routing is processing.
    pub fn band_levels(&self) -> [f32; BAND_COUNT] {
        core::array::from_fn(|i| self.bands[i].level())
    }

    /// Process one stereo block in place
    ///
    /// Snapshot parameters, hot-swap all coefficients, filter, and feed
    /// the analyzer taps. Block length may vary call-to-call up to the
    /// prepared maximum.
    ///
    /// # Real-time Safety
    /// No allocations, no locks, no blocking. Calling before `prepare`
    /// is a contract violation: it trips a debug assertion in debug
    /// builds and leaves the block untouched in release builds.
    pub fn process_block(&mut self, left: &mut [f32], right: &mut [f32]) {
        debug_assert!(self.prepared, "process_block called before prepare");
        if !self.prepared {
            return;
        }
        debug_assert_eq!(left.len(), right.len(), "channel buffers must match");
        debug_assert!(
            left.len() <= self.max_block_size,
            "block longer than the prepared maximum"
        );

        let frames = left.len().min(right.len()).min(self.max_block_size);
        let left = &mut left[..frames];
        let right = &mut right[..frames];

        let settings = self.params.snapshot();
        self.update_filters(&settings);

        match self.routing {
            RoutingMode::Stereo => {
                self.left_chain.process(left);
                self.right_chain.process(right);
            }
            RoutingMode::MultibandMono => {
                self.process_multiband(left, right);
            }
        }

        if let Some(tap) = self.taps[0].as_mut() {
            tap.push_samples(left);
        }
        if let Some(tap) = self.taps[1].as_mut() {
            tap.push_samples(right);
        }
    }

    /// Unconditional per-block coefficient recompute
    ///
    /// Always redesigning instead of diffing against the previous
    /// snapshot costs a little arithmetic and removes any chance of a
    /// missed update. The snapshot clamps to the parameter ranges; the
    /// Nyquist cap is rate-dependent and has to happen here, where the
    /// prepared sample rate is known.
    fn update_filters(&mut self, settings: &ChainSettings) {
        let mut settings = *settings;
        settings.low_cut_freq = design::clamp_to_nyquist(self.sample_rate, settings.low_cut_freq);
        settings.high_cut_freq = design::clamp_to_nyquist(self.sample_rate, settings.high_cut_freq);
        settings.peak_freq = design::clamp_to_nyquist(self.sample_rate, settings.peak_freq);

        self.left_chain.update(self.sample_rate, &settings);
        self.right_chain.update(self.sample_rate, &settings);
        for band in self.bands.iter_mut() {
            band.update(self.sample_rate, settings.peak_gain_db);
        }
    }

    fn process_multiband(&mut self, left: &mut [f32], right: &mut [f32]) {
        let frames = left.len();
        let Self {
            bands,
            mono_scratch,
            band_scratch,
            band_mix,
            ..
        } = self;

        let mono = &mut mono_scratch[..frames];
        for (index, slot) in mono.iter_mut().enumerate() {
            *slot = left[index] + right[index];
        }

        let mix = &mut band_mix[..frames];
        mix.fill(0.0);

        // Every band filters its own copy of the unfiltered mono sum;
        // the Linkwitz-Riley flat-sum property depends on it.
        for band in bands.iter_mut() {
            let scratch = &mut band_scratch[..frames];
            scratch.copy_from_slice(mono);
            band.process(scratch);
            for (accum, &sample) in mix.iter_mut().zip(scratch.iter()) {
                *accum += sample;
            }
        }

        left.copy_from_slice(mix);
        right.copy_from_slice(mix);
    }
}
