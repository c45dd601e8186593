//! Envelope Follower
//!
//! RMS level detection with attack/release ballistics, used per
//! crossover band to expose a level estimate for dynamics or
//! visualization. It observes the signal; it never modifies it.

/// Default ballistics used by the crossover bands (symmetric)
pub const DEFAULT_ATTACK_MS: f32 = 35.0;
pub const DEFAULT_RELEASE_MS: f32 = 35.0;

/// One-pole ballistics over the mean square of the input
pub struct EnvelopeFollower {
    attack_ms: f32,
    release_ms: f32,
    attack_coeff: f32,
    release_coeff: f32,
    mean_square: f32,
}

impl EnvelopeFollower {
    pub fn new(attack_ms: f32, release_ms: f32) -> Self {
        let mut follower = Self {
            attack_ms,
            release_ms,
            attack_coeff: 0.0,
            release_coeff: 0.0,
            mean_square: 0.0,
        };
        follower.prepare(48000.0);
        follower
    }

    /// Recompute the smoothing coefficients for a sample rate
    pub fn prepare(&mut self, sample_rate: f32) {
        self.attack_coeff = smoothing_coeff(self.attack_ms, sample_rate);
        self.release_coeff = smoothing_coeff(self.release_ms, sample_rate);
    }

    /// Track one sample
    ///
    /// # Real-time Safety
    /// No allocations, O(1) time.
    #[inline]
    pub fn push(&mut self, sample: f32) {
        let square = sample * sample;
        let coeff = if square > self.mean_square {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.mean_square = square + coeff * (self.mean_square - square);
    }

    /// Track a whole buffer without modifying it
    #[inline]
    pub fn process(&mut self, samples: &[f32]) {
        for &sample in samples {
            self.push(sample);
        }
    }

    /// Current RMS level estimate
    pub fn level(&self) -> f32 {
        self.mean_square.sqrt()
    }

    pub fn reset(&mut self) {
        self.mean_square = 0.0;
    }
}

impl Default for EnvelopeFollower {
    fn default() -> Self {
        Self::new(DEFAULT_ATTACK_MS, DEFAULT_RELEASE_MS)
    }
}

/// One-pole smoothing coefficient for a time constant in milliseconds
#[inline]
fn smoothing_coeff(time_ms: f32, sample_rate: f32) -> f32 {
    if time_ms <= 0.0 {
        return 0.0;
    }
    (-1.0 / (0.001 * time_ms * sample_rate)).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_silent() {
        let follower = EnvelopeFollower::default();
        assert_eq!(follower.level(), 0.0);
    }

    #[test]
    fn test_settles_near_sine_rms() {
        let mut follower = EnvelopeFollower::default();
        follower.prepare(48000.0);

        // 0.5 amplitude sine has RMS 0.3536
        for i in 0..48000 {
            let t = i as f32 / 48000.0;
            follower.push((2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5);
        }
        let expected = 0.5 * std::f32::consts::FRAC_1_SQRT_2;
        assert!(
            (follower.level() - expected).abs() < 0.05,
            "level {} vs expected {expected}",
            follower.level()
        );
    }

    #[test]
    fn test_decays_on_silence() {
        let mut follower = EnvelopeFollower::default();
        follower.prepare(48000.0);
        for _ in 0..4800 {
            follower.push(0.8);
        }
        let loud = follower.level();

        // 35 ms release: after 200 ms of silence the level is far down
        for _ in 0..9600 {
            follower.push(0.0);
        }
        assert!(follower.level() < loud * 0.1);
    }

    #[test]
    fn test_reset_clears_level() {
        let mut follower = EnvelopeFollower::default();
        for _ in 0..1000 {
            follower.push(1.0);
        }
        follower.reset();
        assert_eq!(follower.level(), 0.0);
    }

    #[test]
    fn test_zero_time_tracks_instantly() {
        let mut follower = EnvelopeFollower::new(0.0, 0.0);
        follower.prepare(48000.0);
        follower.push(0.5);
        assert!((follower.level() - 0.5).abs() < 1e-6);
    }
}
