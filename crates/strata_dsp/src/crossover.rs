//! Eleven-Band Linkwitz-Riley Crossover
//!
//! Splits a mono signal into eleven frequency bands. Each band is an
//! LR4 high-pass at its low edge followed by an LR4 low-pass at its
//! high edge (each LR4 = two cascaded 2nd-order Butterworth sections),
//! then a per-band peaking stage at a fixed, musically-spaced center.
//!
//! Every band must filter an independent copy of the unfiltered source:
//! Linkwitz-Riley crossovers are aligned so that summing ALL band
//! outputs reconstructs the original signal with flat magnitude, which
//! chaining band N into band N+1 would destroy.

use biquad::Q_BUTTERWORTH_F32;

use crate::design;
use crate::envelope::EnvelopeFollower;
use crate::stage::BiquadStage;

/// Number of crossover bands
pub const BAND_COUNT: usize = 11;

/// Crossover points partitioning [20 Hz, 20 kHz]
///
/// Adjacent pairs define one band's [low, high] edges. The spacing sits
/// between linear and logarithmic (20 + x*1.5^n summed to 20 kHz).
pub const CROSSOVER_EDGES: [f32; BAND_COUNT + 1] = [
    20.0, 137.0, 312.0, 575.0, 969.0, 1561.0, 2448.0, 3779.0, 5776.0, 8770.0, 13262.0, 20000.0,
];

/// Static per-band constants: edges plus the fixed peaking center/Q
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandShape {
    pub low_edge: f32,
    pub high_edge: f32,
    /// Logarithmic center of the band, exp((ln(low) + ln(high)) / 2)
    pub peak_freq: f32,
    pub peak_q: f32,
}

/// The eleven band definitions driving construction
///
/// One table, one code path: all bands run the same algorithm with
/// these literals.
pub const BAND_SHAPES: [BandShape; BAND_COUNT] = [
    BandShape { low_edge: 20.0, high_edge: 137.0, peak_freq: 58.0, peak_q: 0.444 },
    BandShape { low_edge: 137.0, high_edge: 312.0, peak_freq: 206.0, peak_q: 1.170 },
    BandShape { low_edge: 312.0, high_edge: 575.0, peak_freq: 423.0, peak_q: 1.608 },
    BandShape { low_edge: 575.0, high_edge: 969.0, peak_freq: 746.0, peak_q: 1.912 },
    BandShape { low_edge: 969.0, high_edge: 1561.0, peak_freq: 1230.0, peak_q: 2.079 },
    BandShape { low_edge: 1561.0, high_edge: 2448.0, peak_freq: 1955.0, peak_q: 2.203 },
    BandShape { low_edge: 2448.0, high_edge: 3779.0, peak_freq: 3042.0, peak_q: 2.283 },
    BandShape { low_edge: 3779.0, high_edge: 5776.0, peak_freq: 4672.0, peak_q: 2.342 },
    BandShape { low_edge: 5776.0, high_edge: 8770.0, peak_freq: 7117.0, peak_q: 2.375 },
    BandShape { low_edge: 8770.0, high_edge: 13262.0, peak_freq: 10785.0, peak_q: 2.398 },
    BandShape { low_edge: 13262.0, high_edge: 20000.0, peak_freq: 16286.0, peak_q: 2.415 },
];

/// One isolated frequency band of the crossover network
///
/// Each band owns its peaking stage: sharing a single stage across
/// bands would smear delay-line state between bands and make every
/// band's tone shaping identical.
pub struct CrossoverBand {
    shape: BandShape,
    high_pass: [BiquadStage; 2],
    low_pass: [BiquadStage; 2],
    peak: BiquadStage,
    envelope: EnvelopeFollower,
}

impl CrossoverBand {
    pub fn new(shape: BandShape) -> Self {
        Self {
            shape,
            high_pass: core::array::from_fn(|_| BiquadStage::new()),
            low_pass: core::array::from_fn(|_| BiquadStage::new()),
            peak: BiquadStage::new(),
            envelope: EnvelopeFollower::default(),
        }
    }

    pub fn shape(&self) -> BandShape {
        self.shape
    }

    /// Size the envelope ballistics for a sample rate; resets state
    pub fn prepare(&mut self, sample_rate: f32) {
        self.envelope.prepare(sample_rate);
        self.reset();
    }

    /// Recompute coefficients for the band's filters and peaking stage
    ///
    /// `peak_gain_db` shapes the band at its fixed center/Q; an LR4
    /// section is two identical Butterworth-Q biquads in cascade. The
    /// fixed edges run up to 20 kHz, so each is capped below Nyquist
    /// for hosts running at low sample rates.
    pub fn update(&mut self, sample_rate: f32, peak_gain_db: f32) {
        let low_edge = design::clamp_to_nyquist(sample_rate, self.shape.low_edge);
        let high_edge = design::clamp_to_nyquist(sample_rate, self.shape.high_edge);
        let hp = design::high_pass(sample_rate, low_edge, Q_BUTTERWORTH_F32);
        let lp = design::low_pass(sample_rate, high_edge, Q_BUTTERWORTH_F32);
        for stage in self.high_pass.iter_mut() {
            stage.set_coefficients(hp);
        }
        for stage in self.low_pass.iter_mut() {
            stage.set_coefficients(lp);
        }
        self.peak.set_coefficients(design::peak(
            sample_rate,
            design::clamp_to_nyquist(sample_rate, self.shape.peak_freq),
            self.shape.peak_q,
            design::db_to_gain(peak_gain_db),
        ));
    }

    /// Isolate this band from a copy of the mono source, in place
    ///
    /// # Real-time Safety
    /// No allocations. O(n) where n = buffer length.
    #[inline]
    pub fn process(&mut self, samples: &mut [f32]) {
        for stage in self.high_pass.iter_mut() {
            stage.process(samples);
        }
        for stage in self.low_pass.iter_mut() {
            stage.process(samples);
        }
        self.peak.process(samples);
        // Level detection observes the band output without touching it
        self.envelope.process(samples);
    }

    /// Current RMS level of the band output
    pub fn level(&self) -> f32 {
        self.envelope.level()
    }

    pub fn reset(&mut self) {
        for stage in self.high_pass.iter_mut().chain(self.low_pass.iter_mut()) {
            stage.reset();
        }
        self.peak.reset();
        self.envelope.reset();
    }
}
