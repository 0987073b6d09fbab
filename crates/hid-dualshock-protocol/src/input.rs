//! DualShock HID input report decoding.
//!
//! All functions are pure and allocation-free. Decoding of the motion and
//! status sub-sections is skipped entirely (not merely discarded) when the
//! corresponding [`DecodeOptions`] flag is off, to bound CPU cost on the
//! hot input path.

#![deny(static_mut_refs)]

use crate::channel::{Axis, Button};
use crate::types::{ConnectionKind, DualShockModel, ReportLayout};
use thiserror::Error;

/// Trigger pressure at or above which the trigger also registers as a
/// digital button press. Tunable; chosen to sit above resting-spring noise.
pub const TRIGGER_PRESS_THRESHOLD: u8 = 0x10;

/// Input report decode failures. Recovered locally by the session; a bad
/// report is dropped and the stream self-corrects on the next frame.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// Report length does not match the layout's fixed wire size.
    #[error("malformed report: expected {expected} bytes for {layout:?}, got {actual}")]
    MalformedReport {
        /// Layout the report was decoded against.
        layout: ReportLayout,
        /// Expected byte count including the report ID.
        expected: usize,
        /// Actual byte count received.
        actual: usize,
    },

    /// Leading report ID byte does not match the layout.
    #[error("unexpected report ID {actual:#04x}, expected {expected:#04x}")]
    UnexpectedReportId {
        /// Report ID the layout mandates.
        expected: u8,
        /// Report ID actually received.
        actual: u8,
    },
}

/// Which optional sub-sections of the report to decode.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeOptions {
    /// Decode the motion sensor block.
    pub motion: bool,
    /// Decode the battery/connection status block.
    pub status: bool,
}

/// Digital button states, bitmask-backed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DigitalState {
    bits: u32,
}

impl DigitalState {
    /// Whether a button is currently pressed.
    #[inline]
    pub fn pressed(&self, button: Button) -> bool {
        self.bits & (1 << button as u32) != 0
    }

    /// Set a button's pressed state.
    #[inline]
    pub fn set(&mut self, button: Button, pressed: bool) {
        if pressed {
            self.bits |= 1 << button as u32;
        } else {
            self.bits &= !(1 << button as u32);
        }
    }

    /// Raw bitmask (bit index = `Button` discriminant).
    #[inline]
    pub fn bits(&self) -> u32 {
        self.bits
    }
}

/// Analog axis values, indexed by [`Axis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalogState {
    values: [u8; Axis::COUNT],
}

impl Default for AnalogState {
    fn default() -> Self {
        // Sticks rest at center, triggers at zero.
        let mut values = [0x80; Axis::COUNT];
        values[Axis::L2 as usize] = 0;
        values[Axis::R2 as usize] = 0;
        Self { values }
    }
}

impl AnalogState {
    /// Current value of an axis (sticks: 0x80 = center; triggers: 0 = released).
    #[inline]
    pub fn get(&self, axis: Axis) -> u8 {
        self.values[axis as usize]
    }

    /// Set an axis value.
    #[inline]
    pub fn set(&mut self, axis: Axis, value: u8) {
        self.values[axis as usize] = value;
    }
}

/// Motion sensor values in raw device units, indexed by [`MotionAxis`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotionState {
    values: [i16; crate::channel::MotionAxis::COUNT],
}

impl MotionState {
    /// Current value of a motion axis.
    #[inline]
    pub fn get(&self, axis: crate::channel::MotionAxis) -> i16 {
        self.values[axis as usize]
    }

    /// Set a motion axis value.
    #[inline]
    pub fn set(&mut self, axis: crate::channel::MotionAxis, value: i16) {
        self.values[axis as usize] = value;
    }
}

/// Battery and connection status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusState {
    /// Battery level. DualShock 3: 0–5. DualShock 4: 0–10.
    pub battery: u8,
    /// Whether the battery is charging (cable present).
    pub charging: bool,
    /// Connection the status block reports.
    pub connection: ConnectionKind,
}

/// One fully decoded device frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Digital button states.
    pub digital: DigitalState,
    /// Analog axis values.
    pub analog: AnalogState,
    /// Motion sensor values; defaults when motion decoding is off.
    pub motion: MotionState,
    /// Battery/connection status; defaults when status decoding is off.
    pub status: StatusState,
}

/// Decode one raw input report into a [`Snapshot`].
///
/// Pure transform: no side effects, no allocation.
///
/// # Errors
///
/// Returns [`DecodeError::MalformedReport`] when the report length does not
/// match the layout's wire size, and [`DecodeError::UnexpectedReportId`] when
/// byte 0 is not the layout's input report ID.
pub fn decode(
    layout: ReportLayout,
    raw: &[u8],
    options: DecodeOptions,
) -> Result<Snapshot, DecodeError> {
    let expected = layout.input_report_len();
    // An unknown layout has no wire size; nothing can match it.
    if expected == 0 || raw.len() != expected {
        return Err(DecodeError::MalformedReport {
            layout,
            expected,
            actual: raw.len(),
        });
    }
    let expected_id = layout.input_report_id();
    if raw[0] != expected_id {
        return Err(DecodeError::UnexpectedReportId {
            expected: expected_id,
            actual: raw[0],
        });
    }
    match layout.model {
        DualShockModel::Ds3 => Ok(decode_ds3(layout, raw, options)),
        DualShockModel::Ds4 => Ok(decode_ds4(layout, raw, options)),
        DualShockModel::Unknown => Err(DecodeError::MalformedReport {
            layout,
            expected: 0,
            actual: raw.len(),
        }),
    }
}

/// DualShock 3 USB layout (49 bytes, report ID 0x01).
///
/// ```text
/// Byte 2: select 0x01, l3 0x02, r3 0x04, start 0x08,
///         up 0x10, right 0x20, down 0x40, left 0x80
/// Byte 3: l2 0x01, r2 0x02, l1 0x04, r1 0x08,
///         triangle 0x10, circle 0x20, cross 0x40, square 0x80
/// Byte 4: ps 0x01
/// Bytes 6–9: lStickX, lStickY, rStickX, rStickY
/// Bytes 18–19: l2, r2 pressure
/// Bytes 41–46: accel X/Y/Z, 10-bit big-endian, 512 = rest
/// Bytes 47–48: yaw gyro, 10-bit big-endian, 512 = rest
/// Byte 30: battery (0–5, or 0xEE while charging)
/// ```
fn decode_ds3(layout: ReportLayout, raw: &[u8], options: DecodeOptions) -> Snapshot {
    let mut snapshot = Snapshot::default();

    let b1 = raw[2];
    let b2 = raw[3];
    let digital = &mut snapshot.digital;
    digital.set(Button::Select, b1 & 0x01 != 0);
    digital.set(Button::L3, b1 & 0x02 != 0);
    digital.set(Button::R3, b1 & 0x04 != 0);
    digital.set(Button::Start, b1 & 0x08 != 0);
    digital.set(Button::Up, b1 & 0x10 != 0);
    digital.set(Button::Right, b1 & 0x20 != 0);
    digital.set(Button::Down, b1 & 0x40 != 0);
    digital.set(Button::Left, b1 & 0x80 != 0);
    digital.set(Button::L2, b2 & 0x01 != 0);
    digital.set(Button::R2, b2 & 0x02 != 0);
    digital.set(Button::L1, b2 & 0x04 != 0);
    digital.set(Button::R1, b2 & 0x08 != 0);
    digital.set(Button::Triangle, b2 & 0x10 != 0);
    digital.set(Button::Circle, b2 & 0x20 != 0);
    digital.set(Button::Cross, b2 & 0x40 != 0);
    digital.set(Button::Square, b2 & 0x80 != 0);
    digital.set(Button::Ps, raw[4] & 0x01 != 0);

    let analog = &mut snapshot.analog;
    analog.set(Axis::LeftStickX, raw[6]);
    analog.set(Axis::LeftStickY, raw[7]);
    analog.set(Axis::RightStickX, raw[8]);
    analog.set(Axis::RightStickY, raw[9]);
    analog.set(Axis::L2, raw[18]);
    analog.set(Axis::R2, raw[19]);
    fold_triggers(snapshot.analog, &mut snapshot.digital);

    if options.motion {
        use crate::channel::MotionAxis;
        let motion = &mut snapshot.motion;
        motion.set(MotionAxis::AccelX, be10_centered(raw[41], raw[42]));
        motion.set(MotionAxis::AccelY, be10_centered(raw[43], raw[44]));
        motion.set(MotionAxis::AccelZ, be10_centered(raw[45], raw[46]));
        // Single yaw gyro on this generation; X/Y stay zero.
        motion.set(MotionAxis::GyroZ, be10_centered(raw[47], raw[48]));
    }

    if options.status {
        let battery = raw[30];
        let charging = battery == 0xEE;
        snapshot.status = StatusState {
            battery: if charging { 0 } else { battery.min(5) },
            charging,
            connection: layout.connection,
        };
    }

    snapshot
}

/// DualShock 4 layout. USB: 64 bytes, report ID 0x01, fields from byte 1.
/// Bluetooth: 78 bytes, report ID 0x11, same fields shifted +2.
///
/// ```text
/// Bytes 1–4: lStickX, lStickY, rStickX, rStickY
/// Byte 5: D-pad hat nibble (0 = up, clockwise, 8 = released),
///         square 0x10, cross 0x20, circle 0x40, triangle 0x80
/// Byte 6: l1 0x01, r1 0x02, l2 0x04, r2 0x08,
///         share 0x10, options 0x20, l3 0x40, r3 0x80
/// Byte 7: ps 0x01, touchpad click 0x02
/// Bytes 8–9: l2, r2 pressure
/// Bytes 13–18: gyro X/Y/Z, i16 little-endian
/// Bytes 19–24: accel X/Y/Z, i16 little-endian
/// Byte 30: battery nibble (0–10), cable bit 0x10
/// ```
fn decode_ds4(layout: ReportLayout, raw: &[u8], options: DecodeOptions) -> Snapshot {
    let o = layout.ds4_base_offset();
    let mut snapshot = Snapshot::default();

    let analog = &mut snapshot.analog;
    analog.set(Axis::LeftStickX, raw[o + 1]);
    analog.set(Axis::LeftStickY, raw[o + 2]);
    analog.set(Axis::RightStickX, raw[o + 3]);
    analog.set(Axis::RightStickY, raw[o + 4]);
    analog.set(Axis::L2, raw[o + 8]);
    analog.set(Axis::R2, raw[o + 9]);

    let b5 = raw[o + 5];
    let b6 = raw[o + 6];
    let b7 = raw[o + 7];
    let digital = &mut snapshot.digital;
    digital.set(Button::Square, b5 & 0x10 != 0);
    digital.set(Button::Cross, b5 & 0x20 != 0);
    digital.set(Button::Circle, b5 & 0x40 != 0);
    digital.set(Button::Triangle, b5 & 0x80 != 0);
    let (up, right, down, left) = hat_to_dpad(b5 & 0x0F);
    digital.set(Button::Up, up);
    digital.set(Button::Right, right);
    digital.set(Button::Down, down);
    digital.set(Button::Left, left);
    digital.set(Button::L1, b6 & 0x01 != 0);
    digital.set(Button::R1, b6 & 0x02 != 0);
    digital.set(Button::L2, b6 & 0x04 != 0);
    digital.set(Button::R2, b6 & 0x08 != 0);
    digital.set(Button::Select, b6 & 0x10 != 0);
    digital.set(Button::Start, b6 & 0x20 != 0);
    digital.set(Button::L3, b6 & 0x40 != 0);
    digital.set(Button::R3, b6 & 0x80 != 0);
    digital.set(Button::Ps, b7 & 0x01 != 0);
    digital.set(Button::TouchPad, b7 & 0x02 != 0);
    fold_triggers(snapshot.analog, &mut snapshot.digital);

    if options.motion {
        use crate::channel::MotionAxis;
        let motion = &mut snapshot.motion;
        motion.set(MotionAxis::GyroX, i16::from_le_bytes([raw[o + 13], raw[o + 14]]));
        motion.set(MotionAxis::GyroY, i16::from_le_bytes([raw[o + 15], raw[o + 16]]));
        motion.set(MotionAxis::GyroZ, i16::from_le_bytes([raw[o + 17], raw[o + 18]]));
        motion.set(MotionAxis::AccelX, i16::from_le_bytes([raw[o + 19], raw[o + 20]]));
        motion.set(MotionAxis::AccelY, i16::from_le_bytes([raw[o + 21], raw[o + 22]]));
        motion.set(MotionAxis::AccelZ, i16::from_le_bytes([raw[o + 23], raw[o + 24]]));
    }

    if options.status {
        let sb = raw[o + 30];
        let cable = sb & 0x10 != 0;
        snapshot.status = StatusState {
            battery: (sb & 0x0F).min(10),
            charging: cable,
            connection: if cable {
                ConnectionKind::Usb
            } else {
                ConnectionKind::Bluetooth
            },
        };
    }

    snapshot
}

/// Fold trigger pressure into the matching digital button once it crosses
/// [`TRIGGER_PRESS_THRESHOLD`]. The wire bit stays authoritative; the fold
/// only ever adds a press.
fn fold_triggers(analog: AnalogState, digital: &mut DigitalState) {
    if analog.get(Axis::L2) >= TRIGGER_PRESS_THRESHOLD {
        digital.set(Button::L2, true);
    }
    if analog.get(Axis::R2) >= TRIGGER_PRESS_THRESHOLD {
        digital.set(Button::R2, true);
    }
}

/// Decode a USB HID hat nibble into D-pad direction flags (8 = neutral).
fn hat_to_dpad(hat: u8) -> (bool, bool, bool, bool) {
    match hat {
        0 => (true, false, false, false),
        1 => (true, true, false, false),
        2 => (false, true, false, false),
        3 => (false, true, true, false),
        4 => (false, false, true, false),
        5 => (false, false, true, true),
        6 => (false, false, false, true),
        7 => (true, false, false, true),
        _ => (false, false, false, false),
    }
}

/// Decode a 10-bit big-endian motion field centered on 512.
fn be10_centered(hi: u8, lo: u8) -> i16 {
    let raw = ((hi as u16 & 0x03) << 8) | lo as u16;
    raw as i16 - 512
}
