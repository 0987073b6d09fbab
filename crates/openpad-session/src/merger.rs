//! Output command merging.
//!
//! Rumble and LED commands arrive independently and faster than the device
//! should be written. The merger coalesces them into one pending output
//! state, bounds the flush rate, and retains the pending state as "last
//! sent" after a flush so a later single-field update never resets the
//! other field.

use openpad_hid_dualshock_protocol::{LedCommand, ReportLayout, RumbleOutput};
use std::time::{Duration, Instant};

/// Rumble duration meaning "until changed".
pub const RUMBLE_HOLD: u8 = 0xFF;

/// Per-motor rumble adjustment for [`OutputMerger::add_rumble`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RumbleDelta {
    /// Leave the motor exactly as it is, level and duration both.
    Keep,
    /// Stop the motor, discarding whatever was accumulated.
    ForceZero,
    /// Add to the motor's level, saturating at full power.
    Add(u8),
}

/// Coalesces rumble/LED commands and meters flushes.
///
/// Not thread-safe by itself; the session keeps it behind a short-lived
/// `parking_lot` lock and copies the pending state out before touching the
/// transport.
#[derive(Debug)]
pub struct OutputMerger {
    layout: ReportLayout,
    rumble: RumbleOutput,
    led: Option<LedCommand>,
    dirty: bool,
    min_interval: Duration,
    last_flush: Option<Instant>,
}

impl OutputMerger {
    pub fn new(layout: ReportLayout, min_interval: Duration) -> Self {
        Self {
            layout,
            rumble: RumbleOutput::default(),
            led: None,
            dirty: false,
            min_interval,
            last_flush: None,
        }
    }

    /// Layout flushes are encoded against.
    pub fn layout(&self) -> ReportLayout {
        self.layout
    }

    /// Set absolute motor levels, held until changed.
    pub fn set_rumble(&mut self, heavy: u8, light: u8) {
        self.rumble = RumbleOutput {
            heavy,
            light,
            heavy_duration: RUMBLE_HOLD,
            light_duration: RUMBLE_HOLD,
        };
        self.dirty = true;
    }

    /// Adjust motor levels relative to the pending state.
    ///
    /// Durations apply per motor and only when that motor's delta is not
    /// [`RumbleDelta::Keep`]; pass [`RUMBLE_HOLD`] to run until changed.
    /// Durations are encoded on the DualShock 3 and ignored by the
    /// DualShock 4, which has no duration field.
    pub fn add_rumble(
        &mut self,
        heavy: RumbleDelta,
        light: RumbleDelta,
        heavy_duration: u8,
        light_duration: u8,
    ) {
        match heavy {
            RumbleDelta::Keep => {}
            RumbleDelta::ForceZero => {
                self.rumble.heavy = 0;
                self.rumble.heavy_duration = heavy_duration;
                self.dirty = true;
            }
            RumbleDelta::Add(level) => {
                self.rumble.heavy = self.rumble.heavy.saturating_add(level);
                self.rumble.heavy_duration = heavy_duration;
                self.dirty = true;
            }
        }
        match light {
            RumbleDelta::Keep => {}
            RumbleDelta::ForceZero => {
                self.rumble.light = 0;
                self.rumble.light_duration = light_duration;
                self.dirty = true;
            }
            RumbleDelta::Add(level) => {
                self.rumble.light = self.rumble.light.saturating_add(level);
                self.rumble.light_duration = light_duration;
                self.dirty = true;
            }
        }
    }

    /// Set the LED state. A command kind the device cannot express still
    /// merges here; the encoder turns it into a no-op.
    pub fn set_led(&mut self, led: LedCommand) {
        self.led = Some(led);
        self.dirty = true;
    }

    /// Pending output state, flushed or not.
    pub fn pending(&self) -> (RumbleOutput, Option<LedCommand>) {
        (self.rumble, self.led)
    }

    /// Whether un-flushed state is pending.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Claim the pending state for a flush, if one is due.
    ///
    /// Returns `None` when nothing changed since the last flush, or when the
    /// minimum inter-flush interval has not yet elapsed (unless `force`).
    /// On `Some`, the caller owns the write; the merger records the flush
    /// and keeps the state as "last sent".
    pub fn take_due(
        &mut self,
        now: Instant,
        force: bool,
    ) -> Option<(RumbleOutput, Option<LedCommand>)> {
        if !self.dirty {
            return None;
        }
        if !force
            && self
                .last_flush
                .is_some_and(|t| now.saturating_duration_since(t) < self.min_interval)
        {
            return None;
        }
        self.dirty = false;
        self.last_flush = Some(now);
        Some((self.rumble, self.led))
    }

    /// Put the claimed state back into the pending set after a failed write.
    ///
    /// The state itself is still held (a flush never clears it), so marking
    /// it dirty again is enough for the next flush opportunity to retry the
    /// command instead of losing it.
    pub fn flush_failed(&mut self) {
        self.dirty = true;
    }
}
