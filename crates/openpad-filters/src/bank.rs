//! Fixed-size banks of per-channel filters.
//!
//! A snapshot's analog and motion sections are small fixed enumerations, so
//! their filter state lives in plain arrays indexed by channel discriminant —
//! no name lookup on the hot path.

use crate::ChannelFilter;

/// A bank of `N` independent channel filters sharing one configuration.
#[derive(Debug, Clone, Copy)]
pub struct ChannelBank<const N: usize> {
    channels: [ChannelFilter; N],
}

impl<const N: usize> ChannelBank<N> {
    /// Create a bank where every channel uses the same EMA time constant and
    /// deadband threshold.
    pub fn new(time_constant: f32, deadband: f32) -> Self {
        Self {
            channels: [ChannelFilter::new(time_constant, deadband); N],
        }
    }

    /// Filter one sample on the given channel, rounding back to `u8`.
    #[inline]
    pub fn apply_u8(&mut self, index: usize, raw: u8) -> u8 {
        self.channels[index].apply(f32::from(raw)).round().clamp(0.0, 255.0) as u8
    }

    /// Filter one sample on the given channel, rounding back to `i16`.
    #[inline]
    pub fn apply_i16(&mut self, index: usize, raw: i16) -> i16 {
        self.channels[index]
            .apply(f32::from(raw))
            .round()
            .clamp(f32::from(i16::MIN), f32::from(i16::MAX)) as i16
    }

    /// Reset every channel; the next sample per channel primes it again.
    pub fn reset(&mut self) {
        for channel in &mut self.channels {
            channel.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels_are_independent() {
        let mut bank: ChannelBank<4> = ChannelBank::new(0.0, 4.0);
        assert_eq!(bank.apply_u8(0, 100), 100);
        assert_eq!(bank.apply_u8(1, 200), 200);
        // Channel 0 holds under its own deadband; channel 1 is unaffected.
        assert_eq!(bank.apply_u8(0, 102), 100);
        assert_eq!(bank.apply_u8(1, 190), 190);
    }

    #[test]
    fn test_passthrough_matches_raw_exactly() {
        let mut bank: ChannelBank<6> = ChannelBank::new(0.0, 0.0);
        for value in 0..=255u8 {
            assert_eq!(bank.apply_u8(2, value), value);
        }
    }

    #[test]
    fn test_signed_rounding() {
        let mut bank: ChannelBank<6> = ChannelBank::new(1.0, 0.0);
        assert_eq!(bank.apply_i16(5, -512), -512);
        assert_eq!(bank.apply_i16(5, i16::MIN), i16::MIN);
        assert_eq!(bank.apply_i16(5, i16::MAX), i16::MAX);
    }
}
