//! Mono Filter Chain
//!
//! Ordered pipeline LowCut -> Peak -> HighCut for one channel. Stereo
//! processing uses two independent chains so channel filter state never
//! couples.

use crate::cut_filter::{CascadedCutFilter, CutKind, Slope};
use crate::design;
use crate::stage::BiquadStage;

/// Immutable per-block snapshot of the chain parameters
///
/// Built fresh from the parameter store at the start of every processed
/// block and discarded at block end. The producing layer guarantees the
/// documented ranges: frequencies in [20, 20000] Hz, Q in [0.1, 10],
/// gain in [-24, 24] dB.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainSettings {
    pub peak_freq: f32,
    pub peak_gain_db: f32,
    pub peak_q: f32,
    pub low_cut_freq: f32,
    pub high_cut_freq: f32,
    pub low_cut_slope: Slope,
    pub high_cut_slope: Slope,
    pub low_cut_bypassed: bool,
    pub peak_bypassed: bool,
    pub high_cut_bypassed: bool,
}

impl Default for ChainSettings {
    fn default() -> Self {
        Self {
            peak_freq: 750.0,
            peak_gain_db: 0.0,
            peak_q: 1.0,
            low_cut_freq: design::MIN_FREQ_HZ,
            high_cut_freq: design::MAX_FREQ_HZ,
            low_cut_slope: Slope::Db12,
            high_cut_slope: Slope::Db12,
            low_cut_bypassed: false,
            peak_bypassed: false,
            high_cut_bypassed: false,
        }
    }
}

/// One channel's cascaded EQ: low-cut, parametric peak, high-cut
///
/// Each segment carries its own bypass flag, evaluated once per block
/// from the current settings snapshot.
pub struct MonoFilterChain {
    low_cut: CascadedCutFilter,
    peak: BiquadStage,
    high_cut: CascadedCutFilter,
}

impl MonoFilterChain {
    pub fn new() -> Self {
        Self {
            low_cut: CascadedCutFilter::new(CutKind::LowCut),
            peak: BiquadStage::new(),
            high_cut: CascadedCutFilter::new(CutKind::HighCut),
        }
    }

    /// Recompute every segment's coefficients and bypass flags
    ///
    /// Runs unconditionally every block: always recomputing instead of
    /// diffing against the last-applied snapshot trades a little
    /// redundant arithmetic for zero missed-update risk.
    pub fn update(&mut self, sample_rate: f32, settings: &ChainSettings) {
        self.low_cut
            .update(sample_rate, settings.low_cut_freq, settings.low_cut_slope);
        self.low_cut.set_bypassed(settings.low_cut_bypassed);

        self.peak.set_coefficients(design::peak(
            sample_rate,
            settings.peak_freq,
            settings.peak_q,
            design::db_to_gain(settings.peak_gain_db),
        ));
        self.peak.set_bypassed(settings.peak_bypassed);

        self.high_cut
            .update(sample_rate, settings.high_cut_freq, settings.high_cut_slope);
        self.high_cut.set_bypassed(settings.high_cut_bypassed);
    }

    /// Filter one channel buffer in place
    ///
    /// # Real-time Safety
    /// No allocations. O(n) where n = buffer length.
    #[inline]
    pub fn process(&mut self, samples: &mut [f32]) {
        self.low_cut.process(samples);
        self.peak.process(samples);
        self.high_cut.process(samples);
    }

    pub fn reset(&mut self) {
        self.low_cut.reset();
        self.peak.reset();
        self.high_cut.reset();
    }

    pub fn low_cut(&self) -> &CascadedCutFilter {
        &self.low_cut
    }

    pub fn high_cut(&self) -> &CascadedCutFilter {
        &self.high_cut
    }
}

impl Default for MonoFilterChain {
    fn default() -> Self {
        Self::new()
    }
}
