//! Per-session configuration, immutable for the session's lifetime.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Options recognized at open time.
///
/// Smoothing magnitudes map to EMA blend weights inside
/// [`openpad_filters::EmaState`]; `0` disables smoothing for that group.
/// Deadbands are minimum deltas (in raw channel units) below which a channel
/// holds its previous filtered value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenConfig {
    /// EMA magnitude for joystick/trigger axes. `0` = raw passthrough.
    pub smooth_analog: f32,
    /// EMA magnitude for gyro/accelerometer axes. `0` = raw passthrough.
    pub smooth_motion: f32,
    /// Minimum delta registering as joystick/trigger movement.
    pub joy_deadband: f32,
    /// Minimum delta registering as motion-sensor movement.
    pub move_deadband: f32,
    /// Decode the motion block even without a motion callback.
    ///
    /// Registering a motion callback enables decoding regardless; without
    /// either, the motion bytes are never touched.
    pub parse_motion: bool,
    /// Decode the status block even without a status callback. Same rule.
    pub parse_status: bool,
    /// Minimum interval between output report flushes, bounding how fast
    /// command bursts can hit the transport. Deferred state is flushed by the
    /// read loop once the interval elapses.
    pub min_flush_interval: Duration,
}

impl Default for OpenConfig {
    fn default() -> Self {
        Self {
            smooth_analog: 0.0,
            smooth_motion: 0.0,
            joy_deadband: 0.0,
            move_deadband: 0.0,
            parse_motion: false,
            parse_status: false,
            min_flush_interval: Duration::from_millis(5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_passthrough() {
        let config = OpenConfig::default();
        assert_eq!(config.smooth_analog, 0.0);
        assert_eq!(config.joy_deadband, 0.0);
        assert!(!config.parse_motion);
        assert!(!config.parse_status);
    }

    #[test]
    fn test_config_round_trips_through_serde() {
        let config = OpenConfig {
            smooth_analog: 10.0,
            joy_deadband: 4.0,
            ..OpenConfig::default()
        };
        let json = serde_json::to_string(&config).expect("serialize");
        let back: OpenConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.smooth_analog, 10.0);
        assert_eq!(back.joy_deadband, 4.0);
    }
}
