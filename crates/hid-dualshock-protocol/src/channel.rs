//! Closed channel enumerations for the logical input device.
//!
//! Channel names match the original DualShock conventions (`cross`, `l2`,
//! `lStickX`, …). The digital `l2`/`r2` buttons and the analog `l2`/`r2`
//! pressure axes deliberately share a name; [`Channel`] keeps them distinct.

#![deny(static_mut_refs)]

/// Digital buttons common to all supported DualShock generations.
///
/// `Select`/`Start` cover the DualShock 4's Share/Options pair, matching
/// their wire positions. `TouchPad` never fires on a DualShock 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Button {
    Cross = 0,
    Circle = 1,
    Square = 2,
    Triangle = 3,
    L1 = 4,
    R1 = 5,
    L2 = 6,
    R2 = 7,
    L3 = 8,
    R3 = 9,
    Select = 10,
    Start = 11,
    Ps = 12,
    TouchPad = 13,
    Up = 14,
    Down = 15,
    Left = 16,
    Right = 17,
}

impl Button {
    /// Number of digital channels.
    pub const COUNT: usize = 18;

    /// All buttons, in bit order.
    pub const ALL: [Button; Self::COUNT] = [
        Button::Cross,
        Button::Circle,
        Button::Square,
        Button::Triangle,
        Button::L1,
        Button::R1,
        Button::L2,
        Button::R2,
        Button::L3,
        Button::R3,
        Button::Select,
        Button::Start,
        Button::Ps,
        Button::TouchPad,
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
    ];

    /// Stable channel name.
    pub fn name(self) -> &'static str {
        match self {
            Button::Cross => "cross",
            Button::Circle => "circle",
            Button::Square => "square",
            Button::Triangle => "triangle",
            Button::L1 => "l1",
            Button::R1 => "r1",
            Button::L2 => "l2",
            Button::R2 => "r2",
            Button::L3 => "l3",
            Button::R3 => "r3",
            Button::Select => "select",
            Button::Start => "start",
            Button::Ps => "ps",
            Button::TouchPad => "touchpad",
            Button::Up => "up",
            Button::Down => "down",
            Button::Left => "left",
            Button::Right => "right",
        }
    }
}

/// Analog axes: stick X/Y pairs plus trigger pressures, all unsigned 8-bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Axis {
    LeftStickX = 0,
    LeftStickY = 1,
    RightStickX = 2,
    RightStickY = 3,
    L2 = 4,
    R2 = 5,
}

impl Axis {
    /// Number of analog channels.
    pub const COUNT: usize = 6;

    /// All axes, in index order.
    pub const ALL: [Axis; Self::COUNT] = [
        Axis::LeftStickX,
        Axis::LeftStickY,
        Axis::RightStickX,
        Axis::RightStickY,
        Axis::L2,
        Axis::R2,
    ];

    /// Stable channel name.
    pub fn name(self) -> &'static str {
        match self {
            Axis::LeftStickX => "lStickX",
            Axis::LeftStickY => "lStickY",
            Axis::RightStickX => "rStickX",
            Axis::RightStickY => "rStickY",
            Axis::L2 => "l2",
            Axis::R2 => "r2",
        }
    }
}

/// Motion sensor axes, signed 16-bit in device units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MotionAxis {
    AccelX = 0,
    AccelY = 1,
    AccelZ = 2,
    GyroX = 3,
    GyroY = 4,
    GyroZ = 5,
}

impl MotionAxis {
    /// Number of motion channels.
    pub const COUNT: usize = 6;

    /// All motion axes, in index order.
    pub const ALL: [MotionAxis; Self::COUNT] = [
        MotionAxis::AccelX,
        MotionAxis::AccelY,
        MotionAxis::AccelZ,
        MotionAxis::GyroX,
        MotionAxis::GyroY,
        MotionAxis::GyroZ,
    ];

    /// Stable channel name.
    pub fn name(self) -> &'static str {
        match self {
            MotionAxis::AccelX => "accelX",
            MotionAxis::AccelY => "accelY",
            MotionAxis::AccelZ => "accelZ",
            MotionAxis::GyroX => "gyroX",
            MotionAxis::GyroY => "gyroY",
            MotionAxis::GyroZ => "gyroZ",
        }
    }
}

/// Status fields, compared individually by the diff engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StatusField {
    Battery = 0,
    Charging = 1,
    Connection = 2,
}

impl StatusField {
    /// Number of status channels.
    pub const COUNT: usize = 3;

    /// All status fields.
    pub const ALL: [StatusField; Self::COUNT] =
        [StatusField::Battery, StatusField::Charging, StatusField::Connection];

    /// Stable channel name.
    pub fn name(self) -> &'static str {
        match self {
            StatusField::Battery => "battery",
            StatusField::Charging => "charging",
            StatusField::Connection => "connection",
        }
    }
}

/// Any channel of the logical device; the unit of change detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Digital(Button),
    Analog(Axis),
    Motion(MotionAxis),
    Status(StatusField),
}

impl Channel {
    /// Total number of distinct channels across all kinds.
    pub const COUNT: usize = Button::COUNT + Axis::COUNT + MotionAxis::COUNT + StatusField::COUNT;

    /// Dense bit index, unique across all channel kinds. Fits in a `u64` set.
    pub fn bit(self) -> u32 {
        match self {
            Channel::Digital(b) => b as u32,
            Channel::Analog(a) => Button::COUNT as u32 + a as u32,
            Channel::Motion(m) => (Button::COUNT + Axis::COUNT) as u32 + m as u32,
            Channel::Status(s) => {
                (Button::COUNT + Axis::COUNT + MotionAxis::COUNT) as u32 + s as u32
            }
        }
    }

    /// Stable channel name (shared between a trigger's button and axis).
    pub fn name(self) -> &'static str {
        match self {
            Channel::Digital(b) => b.name(),
            Channel::Analog(a) => a.name(),
            Channel::Motion(m) => m.name(),
            Channel::Status(s) => s.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_bits_unique() -> Result<(), Box<dyn std::error::Error>> {
        let mut seen = 0u64;
        let all = Button::ALL
            .iter()
            .map(|&b| Channel::Digital(b))
            .chain(Axis::ALL.iter().map(|&a| Channel::Analog(a)))
            .chain(MotionAxis::ALL.iter().map(|&m| Channel::Motion(m)))
            .chain(StatusField::ALL.iter().map(|&s| Channel::Status(s)));
        let mut count = 0usize;
        for ch in all {
            let bit = 1u64 << ch.bit();
            assert_eq!(seen & bit, 0, "duplicate bit for {}", ch.name());
            seen |= bit;
            count += 1;
        }
        assert_eq!(count, Channel::COUNT);
        Ok(())
    }

    #[test]
    fn test_trigger_names_shared_across_kinds() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!(Channel::Digital(Button::L2).name(), "l2");
        assert_eq!(Channel::Analog(Axis::L2).name(), "l2");
        assert_ne!(
            Channel::Digital(Button::L2).bit(),
            Channel::Analog(Axis::L2).bit()
        );
        Ok(())
    }
}
