//! Frame-to-frame change detection.
//!
//! The diff engine compares two [`Snapshot`]s channel by channel and reports
//! exactly which channels moved, so callbacks fire only on real change. The
//! comparison runs on *filtered* values: a channel suppressed by its deadband
//! never shows up here.

use openpad_hid_dualshock_protocol::{
    Axis, Button, Channel, DecodeOptions, MotionAxis, Snapshot, StatusField,
};

/// Set of channels that changed between two consecutive frames.
///
/// Backed by a `u64` bitmask over [`Channel::bit`]; `Copy`, allocation-free,
/// cheap to hand to every callback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeSet {
    bits: u64,
}

impl ChangeSet {
    /// The empty set.
    pub const EMPTY: ChangeSet = ChangeSet { bits: 0 };

    /// Add a channel to the set.
    #[inline]
    pub fn insert(&mut self, channel: Channel) {
        self.bits |= 1 << channel.bit();
    }

    /// Whether a channel is in the set.
    #[inline]
    pub fn contains(&self, channel: Channel) -> bool {
        self.bits & (1 << channel.bit()) != 0
    }

    /// Whether a digital button changed.
    #[inline]
    pub fn contains_button(&self, button: Button) -> bool {
        self.contains(Channel::Digital(button))
    }

    /// Whether an analog axis changed.
    #[inline]
    pub fn contains_axis(&self, axis: Axis) -> bool {
        self.contains(Channel::Analog(axis))
    }

    /// Whether a motion axis changed.
    #[inline]
    pub fn contains_motion(&self, axis: MotionAxis) -> bool {
        self.contains(Channel::Motion(axis))
    }

    /// Whether a status field changed.
    #[inline]
    pub fn contains_status(&self, field: StatusField) -> bool {
        self.contains(Channel::Status(field))
    }

    /// Whether any digital button changed.
    #[inline]
    pub fn any_digital(&self) -> bool {
        Button::ALL.iter().any(|&b| self.contains_button(b))
    }

    /// Whether any analog axis changed.
    #[inline]
    pub fn any_analog(&self) -> bool {
        Axis::ALL.iter().any(|&a| self.contains_axis(a))
    }

    /// Whether any motion axis changed.
    #[inline]
    pub fn any_motion(&self) -> bool {
        MotionAxis::ALL.iter().any(|&m| self.contains_motion(m))
    }

    /// Whether any status field changed.
    #[inline]
    pub fn any_status(&self) -> bool {
        StatusField::ALL.iter().any(|&s| self.contains_status(s))
    }

    /// True when nothing changed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Number of changed channels.
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Iterate the changed channels in bit order.
    pub fn iter(&self) -> impl Iterator<Item = Channel> + '_ {
        Button::ALL
            .iter()
            .map(|&b| Channel::Digital(b))
            .chain(Axis::ALL.iter().map(|&a| Channel::Analog(a)))
            .chain(MotionAxis::ALL.iter().map(|&m| Channel::Motion(m)))
            .chain(StatusField::ALL.iter().map(|&s| Channel::Status(s)))
            .filter(|&ch| self.contains(ch))
    }
}

/// Diff two consecutive frames.
///
/// With `prev == None` (the first frame of a session) every channel of every
/// *enabled* group is reported as changed, so subscribers get a complete
/// initial state instead of waiting for the user to touch something.
/// Disabled motion/status groups never contribute, even on the first frame.
pub fn diff(prev: Option<&Snapshot>, next: &Snapshot, options: DecodeOptions) -> ChangeSet {
    let mut changes = ChangeSet::EMPTY;
    match prev {
        None => {
            for &button in &Button::ALL {
                changes.insert(Channel::Digital(button));
            }
            for &axis in &Axis::ALL {
                changes.insert(Channel::Analog(axis));
            }
            if options.motion {
                for &axis in &MotionAxis::ALL {
                    changes.insert(Channel::Motion(axis));
                }
            }
            if options.status {
                for &field in &StatusField::ALL {
                    changes.insert(Channel::Status(field));
                }
            }
        }
        Some(prev) => {
            for &button in &Button::ALL {
                if prev.digital.pressed(button) != next.digital.pressed(button) {
                    changes.insert(Channel::Digital(button));
                }
            }
            for &axis in &Axis::ALL {
                if prev.analog.get(axis) != next.analog.get(axis) {
                    changes.insert(Channel::Analog(axis));
                }
            }
            if options.motion {
                for &axis in &MotionAxis::ALL {
                    if prev.motion.get(axis) != next.motion.get(axis) {
                        changes.insert(Channel::Motion(axis));
                    }
                }
            }
            if options.status {
                if prev.status.battery != next.status.battery {
                    changes.insert(Channel::Status(StatusField::Battery));
                }
                if prev.status.charging != next.status.charging {
                    changes.insert(Channel::Status(StatusField::Charging));
                }
                if prev.status.connection != next.status.connection {
                    changes.insert(Channel::Status(StatusField::Connection));
                }
            }
        }
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_options() -> DecodeOptions {
        DecodeOptions {
            motion: true,
            status: true,
        }
    }

    #[test]
    fn test_first_frame_reports_everything_enabled() -> Result<(), Box<dyn std::error::Error>> {
        let snap = Snapshot::default();
        let changes = diff(None, &snap, all_options());
        assert_eq!(changes.len(), Channel::COUNT);
        assert!(changes.contains_button(Button::Cross));
        assert!(changes.contains_status(StatusField::Battery));
        Ok(())
    }

    #[test]
    fn test_first_frame_skips_disabled_groups() -> Result<(), Box<dyn std::error::Error>> {
        let snap = Snapshot::default();
        let changes = diff(None, &snap, DecodeOptions::default());
        assert_eq!(changes.len(), Button::COUNT + Axis::COUNT);
        assert!(!changes.any_motion());
        assert!(!changes.any_status());
        Ok(())
    }

    #[test]
    fn test_identical_frames_diff_empty() -> Result<(), Box<dyn std::error::Error>> {
        let snap = Snapshot::default();
        let changes = diff(Some(&snap), &snap, all_options());
        assert!(changes.is_empty());
        assert_eq!(changes.iter().count(), 0);
        Ok(())
    }

    #[test]
    fn test_single_button_press() -> Result<(), Box<dyn std::error::Error>> {
        let prev = Snapshot::default();
        let mut next = prev;
        next.digital.set(Button::Triangle, true);
        let changes = diff(Some(&prev), &next, all_options());
        assert_eq!(changes.len(), 1);
        assert!(changes.contains_button(Button::Triangle));
        assert!(!changes.contains_button(Button::Cross));
        assert!(changes.any_digital());
        assert!(!changes.any_analog());
        Ok(())
    }

    #[test]
    fn test_axis_and_status_changes() -> Result<(), Box<dyn std::error::Error>> {
        let prev = Snapshot::default();
        let mut next = prev;
        next.analog.set(Axis::RightStickY, 0x90);
        next.status.battery = 4;
        next.status.charging = true;
        let changes = diff(Some(&prev), &next, all_options());
        assert_eq!(changes.len(), 3);
        assert!(changes.contains_axis(Axis::RightStickY));
        assert!(changes.contains_status(StatusField::Battery));
        assert!(changes.contains_status(StatusField::Charging));
        assert!(!changes.contains_status(StatusField::Connection));
        Ok(())
    }

    #[test]
    fn test_disabled_groups_ignored_even_when_values_differ(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let prev = Snapshot::default();
        let mut next = prev;
        next.motion.set(MotionAxis::GyroZ, 1000);
        next.status.battery = 9;
        let changes = diff(Some(&prev), &next, DecodeOptions::default());
        assert!(changes.is_empty());
        Ok(())
    }

    #[test]
    fn test_iter_matches_contains() -> Result<(), Box<dyn std::error::Error>> {
        let prev = Snapshot::default();
        let mut next = prev;
        next.digital.set(Button::L2, true);
        next.analog.set(Axis::L2, 0xC0);
        let changes = diff(Some(&prev), &next, DecodeOptions::default());
        let listed: Vec<Channel> = changes.iter().collect();
        assert_eq!(listed.len(), changes.len());
        assert!(listed.contains(&Channel::Digital(Button::L2)));
        assert!(listed.contains(&Channel::Analog(Axis::L2)));
        Ok(())
    }
}
