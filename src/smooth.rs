//! Smoothed parameter values for zipper-free control changes.
//!
//! One-pole exponential smoothing toward a target value. Call
//! [`next_sample()`](ParamSmoother::next_sample) once per sample in the audio
//! callback.

/// Exponential parameter smoother.
///
/// Ramps the current value toward the target with a one-pole lowpass whose
/// time constant is given in seconds. Freshly constructed smoothers sit
/// exactly at their target, so there is no ramp at construction.
#[derive(Debug, Clone)]
pub struct ParamSmoother {
    current: f32,
    target: f32,
    coeff: f32,
    sample_rate: f32,
    time_constant: f32,
}

impl ParamSmoother {
    pub fn new(sample_rate: f32, time_constant_secs: f32) -> Self {
        let mut smoother = Self {
            current: 0.0,
            target: 0.0,
            coeff: 0.0,
            sample_rate,
            time_constant: time_constant_secs,
        };
        smoother.update_coeff();
        smoother
    }

    fn update_coeff(&mut self) {
        let samples = (self.time_constant * self.sample_rate).max(1.0);
        self.coeff = (-1.0 / samples).exp();
    }

    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Jumps the current value to the target without ramping.
    #[inline]
    pub fn snap_to_target(&mut self) {
        self.current = self.target;
    }

    /// Call once per sample in the audio callback.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        self.current = self.target + self.coeff * (self.current - self.target);
        self.current
    }

    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    #[inline]
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.update_coeff();
    }

    /// Takes effect immediately; the ramp in flight bends to the new rate.
    pub fn set_time_constant(&mut self, time_constant_secs: f32) {
        self.time_constant = time_constant_secs;
        self.update_coeff();
    }
}
