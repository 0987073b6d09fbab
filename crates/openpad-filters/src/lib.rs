//! RT-safe temporal filters for the OpenPad input pipeline.
//!
//! Freshly decoded analog and motion channels are noisy: sticks jitter around
//! center, IMU axes drift by a count or two every frame. This crate smooths
//! and gates them per channel before change detection runs.
//!
//! The filter system includes:
//! - **EMA**: exponential moving average smoothing with a persistent
//!   per-channel accumulator
//! - **Deadband**: minimum-change gate that holds the previous filtered value
//!   until the input moves far enough
//! - **Channel banks**: fixed-size arrays of per-channel filters for the
//!   analog and motion sections of a snapshot
//!
//! # RT Safety Guarantees
//!
//! All filter implementations are RT-safe:
//! - No heap allocations in filter hot paths
//! - O(1) time complexity for all operations
//! - No syscalls or I/O in filter functions
//!
//! # Example
//!
//! ```
//! use openpad_filters::ChannelFilter;
//!
//! // smoothAnalog = 10, joyDeadband = 4
//! let mut filter = ChannelFilter::new(10.0, 4.0);
//! let settled = filter.apply(128.0);
//! assert!((settled - 128.0).abs() < f32::EPSILON); // first sample primes the state
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod bank;
pub mod deadband;
pub mod ema;

pub use bank::ChannelBank;
pub use deadband::DeadbandGate;
pub use ema::EmaState;

/// Per-channel smoothing + gating pipeline: EMA first, deadband after, so the
/// gate compares settled values rather than raw jitter.
#[derive(Debug, Clone, Copy)]
pub struct ChannelFilter {
    ema: EmaState,
    gate: DeadbandGate,
}

impl ChannelFilter {
    /// Create a filter from an EMA time constant (`0` disables smoothing) and
    /// a deadband threshold (`0` disables gating).
    pub fn new(time_constant: f32, deadband: f32) -> Self {
        Self {
            ema: EmaState::new(time_constant),
            gate: DeadbandGate::new(deadband),
        }
    }

    /// Feed one raw sample, returning the filtered value for this frame.
    #[inline]
    pub fn apply(&mut self, raw: f32) -> f32 {
        self.gate.apply(self.ema.apply(raw))
    }

    /// Reset accumulators; the next sample primes the state again.
    pub fn reset(&mut self) {
        self.ema.reset();
        self.gate.reset();
    }
}
