//! Exponential Moving Average
//!
//! Each new filtered value is a weighted blend of the previous filtered value
//! and the new raw sample. The accumulator persists for the lifetime of the
//! owning session, so smoothing carries across frames.

/// State for one EMA-smoothed channel.
///
/// The configured magnitude `tc` maps to the blend weight as
/// `alpha = 2 / (tc + 1)` (the classic period-to-alpha mapping). This mapping
/// is a documented tunable, not a physical constant: `tc = 0` yields
/// `alpha = 2`, which is clamped to `1.0` and degenerates to exact
/// passthrough.
///
/// # RT Safety
///
/// - No heap allocations
/// - O(1) time complexity
/// - Bounded execution time
#[derive(Debug, Clone, Copy)]
pub struct EmaState {
    /// Blend weight applied to the new sample, in `(0, 1]`.
    pub alpha: f32,
    /// Accumulated filtered value.
    pub accum: f32,
    /// Whether the accumulator has seen its first sample.
    pub primed: bool,
}

impl EmaState {
    /// Create a new EMA state from the configured smoothing magnitude.
    ///
    /// `time_constant <= 0` disables smoothing entirely.
    pub fn new(time_constant: f32) -> Self {
        let alpha = if time_constant > 0.0 {
            (2.0 / (time_constant + 1.0)).min(1.0)
        } else {
            1.0
        };
        Self {
            alpha,
            accum: 0.0,
            primed: false,
        }
    }

    /// Whether this state passes samples through unmodified.
    pub fn is_passthrough(&self) -> bool {
        self.alpha >= 1.0
    }

    /// Feed one raw sample and return the smoothed value.
    ///
    /// The first sample primes the accumulator so a session never starts from
    /// a phantom zero.
    #[inline]
    pub fn apply(&mut self, raw: f32) -> f32 {
        if self.primed {
            self.accum += self.alpha * (raw - self.accum);
        } else {
            self.accum = raw;
            self.primed = true;
        }
        self.accum
    }

    /// Reset to the unprimed state.
    pub fn reset(&mut self) {
        self.accum = 0.0;
        self.primed = false;
    }
}
