//! Filter Coefficient Design
//!
//! Second-order IIR coefficient constructors based on the RBJ
//! (Robert Bristow-Johnson) Audio EQ Cookbook, plus the per-section Q
//! schedule for splitting a high-order Butterworth cut filter into
//! cascaded biquads.
//!
//! All results are normalized so a0 = 1 and come back as
//! `biquad::Coefficients<f32>`, ready to hot-swap into a running stage.
//!
//! # Contract
//!
//! Callers pre-validate input: frequencies must lie in [20, 20000] Hz
//! and below Nyquist for the given sample rate. The design functions
//! assume valid input and only `debug_assert!` it; they are on the
//! per-block recompute path and must never allocate or fail.

use biquad::Coefficients;

/// Lowest frequency any filter in the chain is designed for
pub const MIN_FREQ_HZ: f32 = 20.0;

/// Highest frequency any filter in the chain is designed for
pub const MAX_FREQ_HZ: f32 = 20_000.0;

/// Convert a decibel value to a linear amplitude ratio
///
/// Formula: amplitude = 10^(dB/20)
#[inline]
pub fn db_to_gain(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Cap a requested frequency just below Nyquist
///
/// Hosts may run below 40 kHz, where the upper end of the 20 Hz to
/// 20 kHz parameter range is not representable; callers of the design
/// functions apply this before every recompute.
#[inline]
pub fn clamp_to_nyquist(sample_rate: f32, freq: f32) -> f32 {
    freq.min(0.49 * sample_rate)
}

/// Unity pass-through coefficients (y[n] = x[n])
///
/// Used as the initial state of every stage before the first design
/// pass runs.
pub fn identity() -> Coefficients<f32> {
    Coefficients {
        a1: 0.0,
        a2: 0.0,
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
    }
}

#[inline]
fn angular(sample_rate: f32, freq: f32) -> (f32, f32) {
    debug_assert!(sample_rate > 0.0);
    debug_assert!(
        freq > 0.0 && freq < sample_rate * 0.5,
        "filter frequency {freq} Hz must be below Nyquist for fs {sample_rate} Hz"
    );
    let w0 = 2.0 * std::f32::consts::PI * freq / sample_rate;
    w0.sin_cos()
}

/// Second-order low-pass with the given Q
pub fn low_pass(sample_rate: f32, freq: f32, q: f32) -> Coefficients<f32> {
    let (sin_w0, cos_w0) = angular(sample_rate, freq);
    let alpha = sin_w0 / (2.0 * q);

    let b1 = 1.0 - cos_w0;
    let b0 = b1 * 0.5;
    let a0 = 1.0 + alpha;

    Coefficients {
        a1: (-2.0 * cos_w0) / a0,
        a2: (1.0 - alpha) / a0,
        b0: b0 / a0,
        b1: b1 / a0,
        b2: b0 / a0,
    }
}

/// Second-order high-pass with the given Q
pub fn high_pass(sample_rate: f32, freq: f32, q: f32) -> Coefficients<f32> {
    let (sin_w0, cos_w0) = angular(sample_rate, freq);
    let alpha = sin_w0 / (2.0 * q);

    let b1 = -(1.0 + cos_w0);
    let b0 = (1.0 + cos_w0) * 0.5;
    let a0 = 1.0 + alpha;

    Coefficients {
        a1: (-2.0 * cos_w0) / a0,
        a2: (1.0 - alpha) / a0,
        b0: b0 / a0,
        b1: b1 / a0,
        b2: b0 / a0,
    }
}

/// Parametric peaking filter
///
/// `gain` is a LINEAR amplitude ratio (see [`db_to_gain`]); internally
/// the cookbook uses A = sqrt(gain). A gain of 1.0 yields an exact
/// identity response.
pub fn peak(sample_rate: f32, freq: f32, q: f32, gain: f32) -> Coefficients<f32> {
    debug_assert!(gain > 0.0);
    let (sin_w0, cos_w0) = angular(sample_rate, freq);
    let a = gain.sqrt();
    let alpha = sin_w0 / (2.0 * q);

    let a0 = 1.0 + alpha / a;

    Coefficients {
        a1: (-2.0 * cos_w0) / a0,
        a2: (1.0 - alpha / a) / a0,
        b0: (1.0 + alpha * a) / a0,
        b1: (-2.0 * cos_w0) / a0,
        b2: (1.0 - alpha * a) / a0,
    }
}

/// Q for one second-order section of an even-order Butterworth filter
///
/// An order-N Butterworth (N even) factors into N/2 biquads whose pole
/// pairs sit at angles (2k+1)*pi/(2N); each section's Q is
/// 1 / (2 cos(theta_k)). Order 2 gives the familiar 0.7071.
pub fn butterworth_section_q(order: usize, section: usize) -> f32 {
    debug_assert!(order >= 2 && order % 2 == 0);
    debug_assert!(section < order / 2);
    let theta = std::f32::consts::PI * (2 * section + 1) as f32 / (2 * order) as f32;
    1.0 / (2.0 * theta.cos())
}
