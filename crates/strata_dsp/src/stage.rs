//! Biquad Filter Stage
//!
//! One second-order IIR section with hot-swappable coefficients and a
//! bypass flag. DirectForm2Transposed is used for its numerical
//! stability; swapping coefficients preserves the delay line so filter
//! parameters can change every block without clicks.

use biquad::{Biquad, Coefficients, DirectForm2Transposed};

use crate::design;

/// A single filter stage in a chain
///
/// Bypassed stages are exact identity transforms: samples pass through
/// untouched and the delay line is NOT advanced, so re-enabling a stage
/// resumes from its previous state.
pub struct BiquadStage {
    filter: DirectForm2Transposed<f32>,
    bypassed: bool,
}

impl BiquadStage {
    /// Create a stage with unity coefficients, active
    pub fn new() -> Self {
        Self {
            filter: DirectForm2Transposed::<f32>::new(design::identity()),
            bypassed: false,
        }
    }

    /// Replace the active coefficient set, keeping delay-line state
    ///
    /// The swap is complete before the next `process` call can read the
    /// coefficients; recompute and processing run on the same context
    /// within one block, so a partially-installed set is never observed.
    pub fn set_coefficients(&mut self, coefficients: Coefficients<f32>) {
        self.filter.update_coefficients(coefficients);
    }

    pub fn set_bypassed(&mut self, bypassed: bool) {
        self.bypassed = bypassed;
    }

    pub fn is_bypassed(&self) -> bool {
        self.bypassed
    }

    /// Filter one sample
    ///
    /// # Real-time Safety
    /// No allocations, no syscalls, O(1) time.
    #[inline]
    pub fn run(&mut self, sample: f32) -> f32 {
        if self.bypassed {
            sample
        } else {
            self.filter.run(sample)
        }
    }

    /// Filter a channel buffer in place
    ///
    /// # Real-time Safety
    /// No allocations. O(n) where n = buffer length.
    #[inline]
    pub fn process(&mut self, samples: &mut [f32]) {
        if self.bypassed {
            return;
        }
        for sample in samples.iter_mut() {
            *sample = self.filter.run(*sample);
        }
    }

    /// Zero the delay line
    ///
    /// Called on sample-rate change or transport discontinuity, never
    /// from the audio thread mid-block.
    pub fn reset(&mut self) {
        self.filter.reset_state();
    }
}

impl Default for BiquadStage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unity_stage_is_passthrough() {
        let mut stage = BiquadStage::new();
        let mut buffer = vec![1.0, -0.5, 0.25, 0.0];
        let original = buffer.clone();
        stage.process(&mut buffer);
        assert_eq!(buffer, original);
    }

    #[test]
    fn test_bypassed_stage_is_exact_identity() {
        let mut stage = BiquadStage::new();
        stage.set_coefficients(design::high_pass(48000.0, 1000.0, 0.707));
        stage.set_bypassed(true);

        let mut buffer = vec![1.0, 0.5, -0.5, 0.1];
        let original = buffer.clone();
        stage.process(&mut buffer);
        assert_eq!(buffer, original);
    }

    #[test]
    fn test_bypass_preserves_delay_line() {
        // A fresh stage and one that processed audio only while
        // bypassed must produce identical impulse responses.
        let coeffs = design::high_pass(48000.0, 500.0, 0.707);

        let mut idle = BiquadStage::new();
        idle.set_coefficients(coeffs);
        idle.set_bypassed(true);
        let mut noise = vec![0.3_f32; 64];
        idle.process(&mut noise);
        idle.set_bypassed(false);

        let mut fresh = BiquadStage::new();
        fresh.set_coefficients(coeffs);

        let mut a = vec![0.0_f32; 32];
        a[0] = 1.0;
        let mut b = a.clone();
        idle.process(&mut a);
        fresh.process(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_high_pass_attenuates_dc() {
        let mut stage = BiquadStage::new();
        stage.set_coefficients(design::high_pass(48000.0, 1000.0, 0.707));

        // Feed a long DC signal; output must decay toward zero
        let mut out = 0.0;
        for _ in 0..48000 {
            out = stage.run(1.0);
        }
        assert!(out.abs() < 1e-3, "DC leak: {out}");
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let coeffs = design::low_pass(48000.0, 2000.0, 0.707);
        let mut stage = BiquadStage::new();
        stage.set_coefficients(coeffs);

        let mut first = vec![0.0_f32; 16];
        first[0] = 1.0;
        let reference = {
            let mut buf = first.clone();
            stage.process(&mut buf);
            buf
        };

        stage.reset();
        stage.process(&mut first);
        assert_eq!(first, reference);
    }
}
