//! Parameter Store
//!
//! The shared parameter surface between the control context (UI or
//! automation) and the audio context. Every parameter is one
//! independently-atomic cell; the audio thread reads each cell exactly
//! once per block into an immutable `ChainSettings` snapshot. No
//! cross-field consistency is needed because each field only affects
//! its own filter design.
//!
//! Floats are stored as `AtomicU32` bit patterns so individual reads
//! and writes can never tear.

use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};

use thiserror::Error;
use tracing::warn;

use strata_dsp::{ChainSettings, Slope};

/// Recognized parameter identifiers
pub mod names {
    pub const LOW_CUT_FREQ: &str = "LowCut Freq";
    pub const HIGH_CUT_FREQ: &str = "HighCut Freq";
    pub const PEAK_FREQ: &str = "Peak Freq";
    pub const PEAK_GAIN: &str = "Peak Gain";
    pub const PEAK_QUALITY: &str = "Peak Quality";
    pub const LOW_CUT_SLOPE: &str = "LowCut Slope";
    pub const HIGH_CUT_SLOPE: &str = "HighCut Slope";
    pub const LOW_CUT_BYPASSED: &str = "LowCut Bypassed";
    pub const PEAK_BYPASSED: &str = "Peak Bypassed";
    pub const HIGH_CUT_BYPASSED: &str = "HighCut Bypassed";
}

/// Valid parameter ranges, enforced at snapshot time
pub const FREQ_RANGE_HZ: (f32, f32) = (20.0, 20_000.0);
pub const GAIN_RANGE_DB: (f32, f32) = (-24.0, 24.0);
pub const Q_RANGE: (f32, f32) = (0.1, 10.0);

/// Errors from the parameter surface
#[derive(Error, Debug)]
pub enum ParamError {
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),
}

/// Lock-free f32 cell (bit pattern in an AtomicU32)
struct AtomicF32(AtomicU32);

impl AtomicF32 {
    fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    #[inline]
    fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    #[inline]
    fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }
}

/// The shared, atomically-readable parameter set
///
/// Writers may be any thread; the audio thread only ever calls
/// [`ParameterStore::snapshot`].
pub struct ParameterStore {
    low_cut_freq: AtomicF32,
    high_cut_freq: AtomicF32,
    peak_freq: AtomicF32,
    peak_gain_db: AtomicF32,
    peak_q: AtomicF32,
    low_cut_slope: AtomicU8,
    high_cut_slope: AtomicU8,
    low_cut_bypassed: AtomicBool,
    peak_bypassed: AtomicBool,
    high_cut_bypassed: AtomicBool,
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self {
            low_cut_freq: AtomicF32::new(20.0),
            high_cut_freq: AtomicF32::new(20_000.0),
            peak_freq: AtomicF32::new(750.0),
            peak_gain_db: AtomicF32::new(0.0),
            peak_q: AtomicF32::new(1.0),
            low_cut_slope: AtomicU8::new(Slope::Db12.index()),
            high_cut_slope: AtomicU8::new(Slope::Db12.index()),
            low_cut_bypassed: AtomicBool::new(false),
            peak_bypassed: AtomicBool::new(false),
            high_cut_bypassed: AtomicBool::new(false),
        }
    }
}

impl ParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Typed setters, callable from any thread

    pub fn set_low_cut_freq(&self, freq: f32) {
        self.low_cut_freq.store(freq);
    }

    pub fn set_high_cut_freq(&self, freq: f32) {
        self.high_cut_freq.store(freq);
    }

    pub fn set_peak_freq(&self, freq: f32) {
        self.peak_freq.store(freq);
    }

    pub fn set_peak_gain_db(&self, gain_db: f32) {
        self.peak_gain_db.store(gain_db);
    }

    pub fn set_peak_q(&self, q: f32) {
        self.peak_q.store(q);
    }

    pub fn set_low_cut_slope(&self, slope: Slope) {
        self.low_cut_slope.store(slope.index(), Ordering::Relaxed);
    }

    pub fn set_high_cut_slope(&self, slope: Slope) {
        self.high_cut_slope.store(slope.index(), Ordering::Relaxed);
    }

    pub fn set_low_cut_bypassed(&self, bypassed: bool) {
        self.low_cut_bypassed.store(bypassed, Ordering::Relaxed);
    }

    pub fn set_peak_bypassed(&self, bypassed: bool) {
        self.peak_bypassed.store(bypassed, Ordering::Relaxed);
    }

    pub fn set_high_cut_bypassed(&self, bypassed: bool) {
        self.high_cut_bypassed.store(bypassed, Ordering::Relaxed);
    }

    /// Set a parameter by its string identifier
    ///
    /// Booleans use the 0.5 threshold convention; slopes take the
    /// choice index {0..3}.
    pub fn set(&self, name: &str, value: f32) -> Result<(), ParamError> {
        match name {
            names::LOW_CUT_FREQ => self.set_low_cut_freq(value),
            names::HIGH_CUT_FREQ => self.set_high_cut_freq(value),
            names::PEAK_FREQ => self.set_peak_freq(value),
            names::PEAK_GAIN => self.set_peak_gain_db(value),
            names::PEAK_QUALITY => self.set_peak_q(value),
            names::LOW_CUT_SLOPE => self.set_low_cut_slope(Slope::from_index(value as u8)),
            names::HIGH_CUT_SLOPE => self.set_high_cut_slope(Slope::from_index(value as u8)),
            names::LOW_CUT_BYPASSED => self.set_low_cut_bypassed(value > 0.5),
            names::PEAK_BYPASSED => self.set_peak_bypassed(value > 0.5),
            names::HIGH_CUT_BYPASSED => self.set_high_cut_bypassed(value > 0.5),
            other => {
                warn!(parameter = other, "rejected unknown parameter");
                return Err(ParamError::UnknownParameter(other.to_string()));
            }
        }
        Ok(())
    }

    /// Read a parameter's numeric representation by identifier
    pub fn get(&self, name: &str) -> Result<f32, ParamError> {
        let value = match name {
            names::LOW_CUT_FREQ => self.low_cut_freq.load(),
            names::HIGH_CUT_FREQ => self.high_cut_freq.load(),
            names::PEAK_FREQ => self.peak_freq.load(),
            names::PEAK_GAIN => self.peak_gain_db.load(),
            names::PEAK_QUALITY => self.peak_q.load(),
            names::LOW_CUT_SLOPE => self.low_cut_slope.load(Ordering::Relaxed) as f32,
            names::HIGH_CUT_SLOPE => self.high_cut_slope.load(Ordering::Relaxed) as f32,
            names::LOW_CUT_BYPASSED => bool_param(self.low_cut_bypassed.load(Ordering::Relaxed)),
            names::PEAK_BYPASSED => bool_param(self.peak_bypassed.load(Ordering::Relaxed)),
            names::HIGH_CUT_BYPASSED => bool_param(self.high_cut_bypassed.load(Ordering::Relaxed)),
            other => return Err(ParamError::UnknownParameter(other.to_string())),
        };
        Ok(value)
    }

    /// Build the per-block settings snapshot
    ///
    /// Each cell is read exactly once. This is the validation layer the
    /// filter-design functions rely on: every value is clamped into its
    /// documented range here, so out-of-range writes can never reach a
    /// design function.
    pub fn snapshot(&self) -> ChainSettings {
        let (freq_min, freq_max) = FREQ_RANGE_HZ;
        let (gain_min, gain_max) = GAIN_RANGE_DB;
        let (q_min, q_max) = Q_RANGE;

        ChainSettings {
            low_cut_freq: self.low_cut_freq.load().clamp(freq_min, freq_max),
            high_cut_freq: self.high_cut_freq.load().clamp(freq_min, freq_max),
            peak_freq: self.peak_freq.load().clamp(freq_min, freq_max),
            peak_gain_db: self.peak_gain_db.load().clamp(gain_min, gain_max),
            peak_q: self.peak_q.load().clamp(q_min, q_max),
            low_cut_slope: Slope::from_index(self.low_cut_slope.load(Ordering::Relaxed)),
            high_cut_slope: Slope::from_index(self.high_cut_slope.load(Ordering::Relaxed)),
            low_cut_bypassed: self.low_cut_bypassed.load(Ordering::Relaxed),
            peak_bypassed: self.peak_bypassed.load(Ordering::Relaxed),
            high_cut_bypassed: self.high_cut_bypassed.load(Ordering::Relaxed),
        }
    }
}

#[inline]
fn bool_param(value: bool) -> f32 {
    if value {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_default_snapshot_matches_reference_defaults() {
        let store = ParameterStore::new();
        let settings = store.snapshot();
        assert_eq!(settings, ChainSettings::default());
    }

    #[test]
    fn test_set_by_name() {
        let store = ParameterStore::new();
        store.set(names::LOW_CUT_FREQ, 150.0).unwrap();
        store.set(names::PEAK_GAIN, -6.0).unwrap();
        store.set(names::HIGH_CUT_SLOPE, 3.0).unwrap();
        store.set(names::PEAK_BYPASSED, 1.0).unwrap();

        let settings = store.snapshot();
        assert_eq!(settings.low_cut_freq, 150.0);
        assert_eq!(settings.peak_gain_db, -6.0);
        assert_eq!(settings.high_cut_slope, Slope::Db48);
        assert!(settings.peak_bypassed);
    }

    #[test]
    fn test_unknown_parameter_rejected() {
        let store = ParameterStore::new();
        assert!(matches!(
            store.set("Master Volume", 0.5),
            Err(ParamError::UnknownParameter(_))
        ));
        assert!(store.get("Master Volume").is_err());
    }

    #[test]
    fn test_get_round_trips() {
        let store = ParameterStore::new();
        store.set(names::PEAK_QUALITY, 2.5).unwrap();
        assert_eq!(store.get(names::PEAK_QUALITY).unwrap(), 2.5);

        store.set(names::LOW_CUT_BYPASSED, 1.0).unwrap();
        assert_eq!(store.get(names::LOW_CUT_BYPASSED).unwrap(), 1.0);
    }

    #[test]
    fn test_snapshot_clamps_out_of_range_values() {
        let store = ParameterStore::new();
        store.set_low_cut_freq(5.0);
        store.set_high_cut_freq(96_000.0);
        store.set_peak_gain_db(100.0);
        store.set_peak_q(0.001);

        let settings = store.snapshot();
        assert_eq!(settings.low_cut_freq, 20.0);
        assert_eq!(settings.high_cut_freq, 20_000.0);
        assert_eq!(settings.peak_gain_db, 24.0);
        assert_eq!(settings.peak_q, 0.1);
    }

    #[test]
    fn test_concurrent_writes_never_yield_invalid_snapshot() {
        let store = Arc::new(ParameterStore::new());
        let writer_store = Arc::clone(&store);

        let writer = std::thread::spawn(move || {
            for i in 0..20_000u32 {
                let wild = (i as f32 * 7919.0) % 100_000.0 - 30_000.0;
                writer_store.set_peak_freq(wild);
                writer_store.set_peak_gain_db(wild);
                writer_store.set_peak_q(wild);
            }
        });

        for _ in 0..20_000 {
            let s = store.snapshot();
            assert!((20.0..=20_000.0).contains(&s.peak_freq));
            assert!((-24.0..=24.0).contains(&s.peak_gain_db));
            assert!((0.1..=10.0).contains(&s.peak_q));
        }
        writer.join().unwrap();
    }
}
