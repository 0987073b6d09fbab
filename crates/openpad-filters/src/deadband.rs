//! Deadband Gate
//!
//! A minimum-change threshold below which input noise is suppressed and the
//! previous filtered value is retained, so idle channels neither drift nor
//! produce spurious change events.

/// State for one deadband-gated channel.
///
/// Boundary policy: a delta **at** the threshold passes (inclusive pass).
/// With a threshold of 4, deltas of 3 or less hold the previous value and
/// deltas of 4 or more propagate. Applied after smoothing, per channel.
///
/// # RT Safety
///
/// - No heap allocations
/// - O(1) time complexity
/// - Bounded execution time
#[derive(Debug, Clone, Copy)]
pub struct DeadbandGate {
    /// Minimum delta that propagates. `0` disables the gate.
    pub threshold: f32,
    /// Last value that passed the gate.
    pub held: f32,
    /// Whether the gate has seen its first sample.
    pub primed: bool,
}

impl DeadbandGate {
    /// Create a gate with the given minimum-change threshold.
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            held: 0.0,
            primed: false,
        }
    }

    /// Feed one (already smoothed) sample and return the gated value.
    #[inline]
    pub fn apply(&mut self, value: f32) -> f32 {
        if !self.primed {
            self.held = value;
            self.primed = true;
        } else if (value - self.held).abs() >= self.threshold {
            self.held = value;
        }
        self.held
    }

    /// Reset to the unprimed state.
    pub fn reset(&mut self) {
        self.held = 0.0;
        self.primed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_small_deltas_hold() {
        let mut gate = DeadbandGate::new(4.0);
        assert_relative_eq!(gate.apply(100.0), 100.0);
        assert_relative_eq!(gate.apply(101.0), 100.0);
        assert_relative_eq!(gate.apply(103.0), 100.0);
        assert_relative_eq!(gate.apply(97.1), 100.0);
    }

    #[test]
    fn test_boundary_delta_passes() {
        // Inclusive-pass policy: exactly threshold propagates.
        let mut gate = DeadbandGate::new(4.0);
        gate.apply(100.0);
        assert_relative_eq!(gate.apply(104.0), 104.0);
        assert_relative_eq!(gate.apply(100.0), 100.0);
    }

    #[test]
    fn test_large_deltas_pass_both_directions() {
        let mut gate = DeadbandGate::new(4.0);
        gate.apply(100.0);
        assert_relative_eq!(gate.apply(105.0), 105.0);
        assert_relative_eq!(gate.apply(90.0), 90.0);
    }

    #[test]
    fn test_zero_threshold_disables_gate() {
        let mut gate = DeadbandGate::new(0.0);
        gate.apply(10.0);
        assert_relative_eq!(gate.apply(10.1), 10.1);
    }

    #[test]
    fn test_held_value_does_not_creep() {
        // Repeated sub-threshold nudges in one direction must not accumulate.
        let mut gate = DeadbandGate::new(4.0);
        gate.apply(100.0);
        for i in 0..100 {
            let nudged = 100.0 + 3.0 * ((i % 2) as f32);
            assert_relative_eq!(gate.apply(nudged), 100.0);
        }
    }
}
