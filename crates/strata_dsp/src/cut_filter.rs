//! Variable-Order Butterworth Cut Filter
//!
//! A fixed bank of four biquad sections realizing a 12/24/36/48 dB/oct
//! Butterworth high-pass (low-cut) or low-pass (high-cut). All four
//! sections always exist; slopes below 48 dB/oct leave the trailing
//! sections bypassed rather than removing them, so the pipeline shape
//! never changes on the audio thread.

use crate::design;
use crate::stage::BiquadStage;

/// Number of second-order sections in the bank
pub const MAX_SECTIONS: usize = 4;

/// Cut-filter steepness in dB per octave
///
/// Each step adds one more second-order section (12 dB/oct per
/// section). Selecting 48 dB/oct activates all four sections; there is
/// no independent per-section control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Slope {
    #[default]
    Db12,
    Db24,
    Db36,
    Db48,
}

impl Slope {
    /// Map a parameter index {0..3} to a slope, clamping out-of-range
    pub fn from_index(index: u8) -> Self {
        match index {
            0 => Slope::Db12,
            1 => Slope::Db24,
            2 => Slope::Db36,
            _ => Slope::Db48,
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    /// Number of active biquad sections (slope / 12)
    pub fn sections(self) -> usize {
        self as usize + 1
    }

    pub fn db_per_octave(self) -> u32 {
        12 * (self as u32 + 1)
    }
}

/// Whether the bank cuts lows (high-pass) or highs (low-pass)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutKind {
    LowCut,
    HighCut,
}

/// Selectable-order Butterworth cut filter
pub struct CascadedCutFilter {
    kind: CutKind,
    sections: [BiquadStage; MAX_SECTIONS],
    /// Whole-filter bypass, independent of per-section activation
    bypassed: bool,
}

impl CascadedCutFilter {
    pub fn new(kind: CutKind) -> Self {
        Self {
            kind,
            sections: core::array::from_fn(|_| BiquadStage::new()),
            bypassed: false,
        }
    }

    pub fn kind(&self) -> CutKind {
        self.kind
    }

    /// Redesign the bank for the given cutoff and slope
    ///
    /// Sections 0..slope/12 receive coefficients from an order-2*(S/12)
    /// Butterworth split into per-section Qs; the rest are forced to
    /// bypass. Frequency must be pre-clamped to [20, 20000] Hz and
    /// below Nyquist by the parameter layer.
    pub fn update(&mut self, sample_rate: f32, freq: f32, slope: Slope) {
        let active = slope.sections();
        let order = 2 * active;

        for (index, section) in self.sections.iter_mut().enumerate() {
            if index < active {
                let q = design::butterworth_section_q(order, index);
                let coefficients = match self.kind {
                    CutKind::LowCut => design::high_pass(sample_rate, freq, q),
                    CutKind::HighCut => design::low_pass(sample_rate, freq, q),
                };
                section.set_coefficients(coefficients);
                section.set_bypassed(false);
            } else {
                section.set_bypassed(true);
            }
        }
    }

    pub fn set_bypassed(&mut self, bypassed: bool) {
        self.bypassed = bypassed;
    }

    pub fn is_bypassed(&self) -> bool {
        self.bypassed
    }

    /// Number of sections with non-trivial coefficients
    pub fn active_sections(&self) -> usize {
        self.sections.iter().filter(|s| !s.is_bypassed()).count()
    }

    pub fn sections(&self) -> &[BiquadStage] {
        &self.sections
    }

    /// Filter a channel buffer in place through all active sections
    ///
    /// # Real-time Safety
    /// No allocations. O(n) where n = buffer length.
    #[inline]
    pub fn process(&mut self, samples: &mut [f32]) {
        if self.bypassed {
            return;
        }
        for section in self.sections.iter_mut() {
            section.process(samples);
        }
    }

    /// Single-sample path for per-sample pipelines
    #[inline]
    pub fn run(&mut self, sample: f32) -> f32 {
        if self.bypassed {
            return sample;
        }
        let mut out = sample;
        for section in self.sections.iter_mut() {
            out = section.run(out);
        }
        out
    }

    pub fn reset(&mut self) {
        for section in self.sections.iter_mut() {
            section.reset();
        }
    }
}
